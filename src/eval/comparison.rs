use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::take_till1,
    character::complete::{char, multispace0, one_of},
    combinator::{map, opt, recognize},
    multi::many0,
    sequence::{delimited, pair},
    IResult,
};

use super::number::{parse_bool, parse_number};
use super::{EvalError, EvalResult};
use crate::ast::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display, strum::EnumIter)]
pub enum Comparator {
    #[strum(serialize = "==")]
    Equal,
    #[strum(serialize = "!=")]
    NotEqual,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = ">=")]
    GreaterOrEqual,
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = "<=")]
    LessOrEqual,
}

impl Comparator {
    /// Only `==` and `!=` are defined for booleans.
    pub fn is_equality(self) -> bool {
        matches!(self, Comparator::Equal | Comparator::NotEqual)
    }

    pub fn compare<T: PartialOrd>(self, lhs: T, rhs: T) -> bool {
        match self {
            Comparator::Equal => lhs == rhs,
            Comparator::NotEqual => lhs != rhs,
            Comparator::Greater => lhs > rhs,
            Comparator::GreaterOrEqual => lhs >= rhs,
            Comparator::Less => lhs < rhs,
            Comparator::LessOrEqual => lhs <= rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Piece<'a> {
    Operand(&'a str),
    Comparator(&'a str),
}

fn is_comparator_symbol(c: char) -> bool {
    matches!(c, '=' | '!' | '<' | '>')
}

fn comparator(input: &str) -> IResult<&str, Piece> {
    map(recognize(pair(one_of("=!<>"), opt(char('=')))), Piece::Comparator)(input)
}

fn operand(input: &str) -> IResult<&str, Piece> {
    map(
        take_till1(|c: char| c.is_whitespace() || is_comparator_symbol(c)),
        Piece::Operand,
    )(input)
}

fn pieces(input: &str) -> IResult<&str, Vec<Piece>> {
    many0(delimited(multispace0, alt((comparator, operand)), multispace0))(input)
}

/// Evaluates `lhs <comparator> rhs` to a boolean.
///
/// Booleans may only be checked for (in)equality against other booleans; all
/// other operands must be numeric and are compared as `f64`.
#[tracing::instrument(level = "trace")]
pub fn evaluate(text: &str) -> EvalResult<Value> {
    let (_, pieces) =
        pieces(text).map_err(|_| EvalError::syntax("malformed comparison operation", text))?;

    let (lhs, symbol, rhs) = match pieces.as_slice() {
        [Piece::Operand(lhs), Piece::Comparator(symbol), Piece::Operand(rhs)] => {
            (*lhs, *symbol, *rhs)
        }
        pieces if pieces.len() > 3 => {
            return Err(EvalError::syntax(
                "comparison can only compare two values",
                text,
            ))
        }
        _ => {
            return Err(EvalError::syntax(
                "comparison operation is missing values",
                text,
            ))
        }
    };
    let comparator = Comparator::from_str(symbol)
        .map_err(|_| EvalError::syntax(format!("unknown comparator {}", symbol), text))?;

    let (lhs_bool, rhs_bool) = (parse_bool(lhs), parse_bool(rhs));
    if lhs_bool.is_some() || rhs_bool.is_some() {
        if !comparator.is_equality() {
            return Err(EvalError::type_error(
                format!("booleans cannot be compared by {}", comparator),
                text,
            ));
        }
        let (Some(lhs), Some(rhs)) = (lhs_bool, rhs_bool) else {
            return Err(EvalError::type_error(
                "cannot compare boolean value to numerical value",
                text,
            ));
        };
        return Ok(Value::Bool(comparator.compare(lhs, rhs)));
    }

    let (Some(lhs), Some(rhs)) = (parse_number(lhs), parse_number(rhs)) else {
        return Err(EvalError::type_error(
            "can only compare boolean or numerical values",
            text,
        ));
    };
    Ok(Value::Bool(comparator.compare(lhs.as_f64(), rhs.as_f64())))
}
