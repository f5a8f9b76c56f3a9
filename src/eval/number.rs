use nom::{
    character::complete::{digit1, one_of},
    combinator::{all_consuming, opt, recognize},
    number::complete::recognize_float,
    sequence::pair,
    IResult,
};

use crate::ast::Value;

/// Fraction digits beyond this are left as parsed; scaling by a larger power
/// of ten no longer round-trips through `f64`.
const MAX_ROUNDING_DIGITS: usize = 15;

/// A numeric literal that remembers whether it was written as an integer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_int(self) -> bool {
        matches!(self, Number::Int(_))
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Int(i) => Value::Int(i),
            Number::Float(f) => Value::Float(f),
        }
    }
}

fn integer_literal(input: &str) -> IResult<&str, &str> {
    recognize(pair(opt(one_of("+-")), digit1))(input)
}

fn float_literal(input: &str) -> IResult<&str, &str> {
    recognize_float(input)
}

pub fn parse_int(text: &str) -> Option<i64> {
    let (_, literal) = all_consuming(integer_literal)(text).ok()?;
    literal.parse().ok()
}

/// Parses a float literal and rounds it to the number of fraction digits
/// written in the source, so `10.10` comes back as exactly `10.1`.
pub fn parse_float(text: &str) -> Option<f64> {
    let (_, literal) = all_consuming(float_literal)(text).ok()?;
    let value: f64 = literal.parse().ok()?;
    Some(round_to_source_precision(value, literal))
}

pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Integer first, then float.
pub fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    parse_int(text)
        .map(Number::Int)
        .or_else(|| parse_float(text).map(Number::Float))
}

pub fn round_to_source_precision(value: f64, literal: &str) -> f64 {
    let mantissa = literal.split(['e', 'E']).next().unwrap_or(literal);
    let decimals = mantissa
        .split_once('.')
        .map(|(_, fraction)| fraction.chars().filter(char::is_ascii_digit).count())
        .unwrap_or(0);
    if decimals == 0 || decimals > MAX_ROUNDING_DIGITS {
        return value;
    }

    let scale = 10f64.powi(decimals as i32);
    let rounded = (value * scale).round() / scale;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}
