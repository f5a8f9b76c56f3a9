//! The built-in function library.

use tracing::warn;

use super::number::{parse_bool, parse_number, Number};
use super::text::strip_quotes;
use super::{EvalError, EvalResult};
use crate::ast::Value;

/// Every function callable from an attribute value.
///
/// The lowercase variant name is the name used in source text.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Builtin {
    Upper,
    Lower,
    Append,
    Concat,
    Contains,
    Length,
    Power,
    Floor,
    Remainder,
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Xnor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Family {
    String,
    Numeric,
    Gate,
}

impl Builtin {
    pub fn family(self) -> Family {
        match self {
            Builtin::Upper
            | Builtin::Lower
            | Builtin::Append
            | Builtin::Concat
            | Builtin::Contains
            | Builtin::Length => Family::String,
            Builtin::Power | Builtin::Floor | Builtin::Remainder => Family::Numeric,
            Builtin::And
            | Builtin::Or
            | Builtin::Nand
            | Builtin::Nor
            | Builtin::Xor
            | Builtin::Xnor => Family::Gate,
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Builtin::Upper | Builtin::Lower | Builtin::Length => 1,
            _ => 2,
        }
    }

    /// Applies the function to raw parameter texts.
    pub fn apply(self, params: &[&str]) -> EvalResult<Value> {
        if params.len() != self.arity() {
            return Err(EvalError::syntax(
                format!("{} expects {} parameter(s)", self, self.arity()),
                params.join(","),
            ));
        }

        match self.family() {
            Family::String => self.apply_string(params),
            Family::Numeric => self.apply_numeric(params),
            Family::Gate => self.apply_gate(params),
        }
    }

    fn apply_string(self, params: &[&str]) -> EvalResult<Value> {
        let params: Vec<&str> = params.iter().map(|p| strip_quotes(p)).collect();
        let value = match (self, params.as_slice()) {
            (Builtin::Upper, [s]) => Value::String(s.to_uppercase()),
            (Builtin::Lower, [s]) => Value::String(s.to_lowercase()),
            (Builtin::Length, [s]) => Value::Int(s.chars().count() as i64),
            (Builtin::Append, [a, b]) => Value::String(format!("{}{}", a, b)),
            (Builtin::Contains, [haystack, needle]) => Value::Bool(haystack.contains(needle)),
            (Builtin::Concat, _) => {
                warn!(params = ?params, "concat is not evaluated");
                Value::Unit
            }
            _ => return Err(EvalError::FunctionNotImplemented(self.to_string())),
        };
        Ok(value)
    }

    fn apply_numeric(self, params: &[&str]) -> EvalResult<Value> {
        let numbers = params
            .iter()
            .map(|p| {
                parse_number(p).ok_or_else(|| {
                    EvalError::type_error(format!("parameter of {} is not a number", self), *p)
                })
            })
            .collect::<EvalResult<Vec<Number>>>()?;
        let all_int = numbers.iter().all(|n| n.is_int());

        let (lhs, rhs) = match numbers.as_slice() {
            [lhs, rhs] => (lhs.as_f64(), rhs.as_f64()),
            _ => return Err(EvalError::FunctionNotImplemented(self.to_string())),
        };
        if matches!(self, Builtin::Floor | Builtin::Remainder) && rhs == 0.0 {
            return Err(EvalError::DivisionByZero {
                text: params.join(","),
            });
        }

        let result = match self {
            Builtin::Power => lhs.powf(rhs),
            Builtin::Floor => (lhs / rhs).floor(),
            Builtin::Remainder => lhs % rhs,
            _ => return Err(EvalError::FunctionNotImplemented(self.to_string())),
        };

        if all_int {
            Ok(Value::Int(result.trunc() as i64))
        } else {
            Ok(Value::Float(result))
        }
    }

    fn apply_gate(self, params: &[&str]) -> EvalResult<Value> {
        let bools = params
            .iter()
            .map(|p| {
                parse_bool(p.trim()).ok_or_else(|| {
                    EvalError::type_error(format!("parameter of {} is not a boolean", self), *p)
                })
            })
            .collect::<EvalResult<Vec<bool>>>()?;

        let (a, b) = match bools.as_slice() {
            [a, b] => (*a, *b),
            _ => return Err(EvalError::FunctionNotImplemented(self.to_string())),
        };
        let result = match self {
            Builtin::And => a && b,
            Builtin::Or => a || b,
            Builtin::Nand => !(a && b),
            Builtin::Nor => !(a || b),
            Builtin::Xor => a != b,
            Builtin::Xnor => a == b,
            _ => return Err(EvalError::FunctionNotImplemented(self.to_string())),
        };
        Ok(Value::Bool(result))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_names_parse_back() {
        for builtin in Builtin::iter() {
            assert_eq!(Builtin::from_str(builtin.as_ref()).unwrap(), builtin);
        }
        assert!(Builtin::from_str("Upper").is_err());
        assert!(Builtin::from_str("sqrt").is_err());
    }

    #[test]
    fn test_string_functions() {
        assert_eq!(
            Builtin::Upper.apply(&["\"test function\""]).unwrap(),
            Value::from("TEST FUNCTION")
        );
        assert_eq!(
            Builtin::Append.apply(&["\"test\"", " \" function\""]).unwrap(),
            Value::from("test function")
        );
        assert_eq!(
            Builtin::Contains.apply(&["\"haystack\"", "\"st\""]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            Builtin::Length.apply(&["\"héllo\""]).unwrap(),
            Value::Int(5)
        );
        assert_eq!(
            Builtin::Concat.apply(&["arr1", "\" \""]).unwrap(),
            Value::Unit
        );
    }

    #[test]
    fn test_numeric_functions() {
        assert_eq!(Builtin::Power.apply(&["5", " 2"]).unwrap(), Value::Int(25));
        assert_eq!(Builtin::Floor.apply(&["25", " 7"]).unwrap(), Value::Int(3));
        assert_eq!(
            Builtin::Remainder.apply(&["10", " 3"]).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            Builtin::Power.apply(&["2.5", "2"]).unwrap(),
            Value::Float(6.25)
        );
    }

    #[test]
    fn test_numeric_errors() {
        assert!(matches!(
            Builtin::Floor.apply(&["1", "0"]),
            Err(EvalError::DivisionByZero { .. })
        ));
        assert!(matches!(
            Builtin::Power.apply(&["two", "2"]),
            Err(EvalError::Type { .. })
        ));
    }

    #[test]
    fn test_gate_truth_tables() {
        let table = [
            (Builtin::And, [false, false, false, true]),
            (Builtin::Or, [false, true, true, true]),
            (Builtin::Nand, [true, true, true, false]),
            (Builtin::Nor, [true, false, false, false]),
            (Builtin::Xor, [false, true, true, false]),
            (Builtin::Xnor, [true, false, false, true]),
        ];
        let inputs = [("false", "false"), ("false", "true"), ("true", "false"), ("true", "true")];
        for (builtin, expected) in table {
            for ((a, b), want) in inputs.iter().zip(expected) {
                assert_eq!(
                    builtin.apply(&[*a, *b]).unwrap(),
                    Value::Bool(want),
                    "{builtin}({a}, {b})"
                );
            }
        }
    }

    #[test]
    fn test_gate_rejects_non_booleans() {
        assert!(matches!(
            Builtin::Xor.apply(&["true", "1"]),
            Err(EvalError::Type { .. })
        ));
    }

    #[test]
    fn test_arity_mismatch() {
        assert!(matches!(
            Builtin::Append.apply(&["\"one\""]),
            Err(EvalError::Syntax { .. })
        ));
    }

    #[test]
    fn test_families() {
        assert_eq!(Builtin::Length.family(), Family::String);
        assert_eq!(Builtin::Remainder.family(), Family::Numeric);
        assert_eq!(Builtin::Xnor.family(), Family::Gate);
    }
}
