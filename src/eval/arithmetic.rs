//! Two-pass arithmetic over numeric literals.
//!
//! `*`, `/` and `%` are folded first, then `+` and `-`, each left to right.
//! All math runs in `f64`; the result is an integer only when every operand
//! was written as one.

use nom::{
    branch::alt,
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{map, map_opt, opt, recognize},
    multi::many0,
    sequence::{delimited, pair},
    IResult,
};

use super::number::{parse_number, Number};
use super::{EvalError, EvalResult};
use crate::ast::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl Operator {
    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '%' => Some(Operator::Rem),
            _ => None,
        }
    }

    fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Mul | Operator::Div | Operator::Rem)
    }

    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Sub => lhs - rhs,
            Operator::Mul => lhs * rhs,
            Operator::Div => lhs / rhs,
            Operator::Rem => lhs % rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Piece {
    Operand(Number),
    Operator(Operator),
}

fn operator(input: &str) -> IResult<&str, Piece> {
    map(map_opt(one_of("+-*/%"), Operator::from_symbol), Piece::Operator)(input)
}

fn operand(input: &str) -> IResult<&str, Piece> {
    map(
        map_opt(recognize(pair(digit1, opt(pair(char('.'), digit1)))), parse_number),
        Piece::Operand,
    )(input)
}

fn pieces(input: &str) -> IResult<&str, Vec<Piece>> {
    many0(delimited(multispace0, alt((operator, operand)), multispace0))(input)
}

/// Checks that pieces alternate operand, operator, operand and splits them
/// into the leading operand plus `(operator, operand)` pairs.
fn validate(pieces: Vec<Piece>, text: &str) -> EvalResult<(Number, Vec<(Operator, Number)>)> {
    let mut first = None;
    let mut pairs = Vec::new();
    let mut pending = None;

    for piece in pieces {
        match (piece, pending.take()) {
            (Piece::Operand(number), None) if first.is_none() => first = Some(number),
            (Piece::Operand(_), None) => {
                return Err(EvalError::syntax(
                    "arithmetic operation value must be preceded by an operator",
                    text,
                ))
            }
            (Piece::Operand(number), Some(op)) => pairs.push((op, number)),
            (Piece::Operator(op), None) if first.is_some() => pending = Some(op),
            (Piece::Operator(_), _) => {
                return Err(EvalError::syntax(
                    "arithmetic operator must be preceded by a number",
                    text,
                ))
            }
        }
    }

    if pending.is_some() {
        return Err(EvalError::syntax(
            "arithmetic operation ends with an operator",
            text,
        ));
    }
    let first =
        first.ok_or_else(|| EvalError::syntax("arithmetic operation is missing values", text))?;
    Ok((first, pairs))
}

#[tracing::instrument(level = "trace")]
pub fn evaluate(text: &str) -> EvalResult<Value> {
    let (rest, pieces) = pieces(text)
        .map_err(|_| EvalError::syntax("malformed arithmetic operation", text))?;
    if !rest.trim().is_empty() {
        return Err(EvalError::type_error(
            "value in arithmetic operation is not a number",
            text,
        ));
    }

    let (first, pairs) = validate(pieces, text)?;
    let all_int = first.is_int() && pairs.iter().all(|(_, number)| number.is_int());

    // First pass: multiplicative operators collapse into the running term.
    let mut terms = vec![first.as_f64()];
    let mut additive = Vec::new();
    for (op, number) in pairs {
        let rhs = number.as_f64();
        if op.is_multiplicative() {
            if matches!(op, Operator::Div | Operator::Rem) && rhs == 0.0 {
                return Err(EvalError::DivisionByZero {
                    text: text.to_string(),
                });
            }
            if let Some(lhs) = terms.last_mut() {
                *lhs = op.apply(*lhs, rhs);
            }
        } else {
            additive.push(op);
            terms.push(rhs);
        }
    }

    // Second pass: additive operators over the reduced terms.
    let mut terms = terms.into_iter();
    let mut result = terms.next().unwrap_or_default();
    for (op, term) in additive.into_iter().zip(terms) {
        result = op.apply(result, term);
    }

    if all_int {
        Ok(Value::Int(result.trunc() as i64))
    } else {
        Ok(Value::Float(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn test_integer_operations() {
        assert_eq!(evaluate("10 + 10").unwrap(), Value::Int(20));
        assert_eq!(evaluate("10-8").unwrap(), Value::Int(2));
        assert_eq!(evaluate("1 * 4").unwrap(), Value::Int(4));
        assert_eq!(evaluate("10/ 10").unwrap(), Value::Int(1));
        assert_eq!(evaluate("10 % 4").unwrap(), Value::Int(2));
    }

    #[test]
    fn test_precedence() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), Value::Int(14));
        assert_eq!(evaluate("20 - 6 / 3 - 1").unwrap(), Value::Int(17));
        assert_eq!(evaluate("2 * 3 + 4 * 5").unwrap(), Value::Int(26));
        assert_eq!(evaluate("10 - 2 - 3").unwrap(), Value::Int(5));
    }

    #[test]
    fn test_float_operand_forces_float() {
        assert_eq!(evaluate("1.5 + 1").unwrap(), Value::Float(2.5));
        assert_eq!(evaluate("3.0 * 2").unwrap(), Value::Float(6.0));
    }

    #[test]
    fn test_integer_division_truncates() {
        assert_eq!(evaluate("7 / 2").unwrap(), Value::Int(3));
        assert_eq!(evaluate("7 / 2 * 2").unwrap(), Value::Int(7));
    }

    #[test]
    fn test_syntax_errors() {
        for text in ["+ 1", "1 +", "1 + * 2", "", "   "] {
            let err = evaluate(text).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Syntax, "{text:?}");
        }
        assert!(matches!(
            evaluate("1 2 + 3"),
            Err(EvalError::Syntax { .. })
        ));
    }

    #[test]
    fn test_non_number_operand() {
        let err = evaluate("2 + abc").unwrap_err();
        assert!(matches!(err, EvalError::Type { .. }));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(
            evaluate("1 / 0"),
            Err(EvalError::DivisionByZero { .. })
        ));
        assert!(matches!(
            evaluate("5 % 0.0"),
            Err(EvalError::DivisionByZero { .. })
        ));
    }
}
