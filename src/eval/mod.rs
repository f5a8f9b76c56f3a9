//! # Value transformer
//!
//! Turns the raw text of a value token into a typed [`Value`]. Literal kinds
//! are parsed directly; expression kinds are handed to their evaluator:
//!
//! * [`arithmetic`]: `+ - * / %` over numeric literals
//! * [`comparison`]: a single `== != > >= < <=` between two operands
//! * [`function`]: calls into the [`builtin`] library
//!
//! Every failure is returned as an [`EvalError`]; nothing here falls back to
//! a default value.

pub mod arithmetic;
pub mod builtin;
pub mod comparison;
pub mod function;
pub mod number;
pub(crate) mod text;

use thiserror::Error;
use tracing::warn;

use crate::ast::Value;
use crate::error::ErrorCategory;
use crate::tokenizer::TokenKind;
use number::{parse_bool, parse_float, parse_int};
use text::{split_unquoted, strip_quotes};

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Syntax error: {message}: {text}")]
    Syntax { message: String, text: String },

    #[error("Type error: {message}: {text}")]
    Type { message: String, text: String },

    #[error("Division by zero: {text}")]
    DivisionByZero { text: String },

    #[error("Function {0} is not implemented")]
    FunctionNotImplemented(String),

    #[error("Token kind {0} does not produce an attribute value")]
    UnmappedTokenKind(TokenKind),
}

impl EvalError {
    pub fn syntax(message: impl Into<String>, text: impl Into<String>) -> Self {
        EvalError::Syntax {
            message: message.into(),
            text: text.into(),
        }
    }

    pub fn type_error(message: impl Into<String>, text: impl Into<String>) -> Self {
        EvalError::Type {
            message: message.into(),
            text: text.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EvalError::Syntax { .. } => ErrorCategory::Syntax,
            EvalError::Type { .. } | EvalError::DivisionByZero { .. } => ErrorCategory::Type,
            EvalError::FunctionNotImplemented(_) | EvalError::UnmappedTokenKind(_) => {
                ErrorCategory::Semantic
            }
        }
    }
}

/// Converts the raw text of a value token into its [`Value`].
///
/// For arrays, `text` is the bracketed, comma-joined list of element texts.
#[tracing::instrument(level = "trace")]
pub fn transform(text: &str, kind: TokenKind) -> EvalResult<Value> {
    match kind {
        TokenKind::String => Ok(Value::String(strip_quotes(text).to_string())),
        TokenKind::MultiString => Ok(Value::String(join_multi_string(text))),
        TokenKind::Int => parse_int(text.trim())
            .map(Value::Int)
            .ok_or_else(|| EvalError::type_error("value is not an integer", text)),
        TokenKind::Float => parse_float(text.trim())
            .map(Value::Float)
            .ok_or_else(|| EvalError::type_error("value is not a float", text)),
        TokenKind::Bool => parse_bool(text.trim())
            .map(Value::Bool)
            .ok_or_else(|| EvalError::type_error("value is not a boolean", text)),
        TokenKind::ArrayStart | TokenKind::ArrayElem => Ok(transform_array(text)),
        TokenKind::Arithmetic => arithmetic::evaluate(text),
        TokenKind::Comparison => comparison::evaluate(text),
        TokenKind::Condition => {
            warn!(condition = strip_quotes(text), "conditions are not evaluated");
            Ok(Value::Unit)
        }
        TokenKind::Function => function::call(text),
        other => Err(EvalError::UnmappedTokenKind(other)),
    }
}

/// Splits the tab-normalized lines of a multi-line string and joins the
/// unquoted pieces with single spaces.
fn join_multi_string(text: &str) -> String {
    split_unquoted(text, |c| c == '\t' || c == '\n')
        .into_iter()
        .map(|segment| segment.trim().trim_end_matches('\\').trim())
        .filter(|segment| !segment.is_empty())
        .map(strip_quotes)
        .collect::<Vec<_>>()
        .join(" ")
}

fn transform_array(text: &str) -> Value {
    let text = text.trim();
    let text = text.strip_prefix('[').unwrap_or(text);
    let inner = text.strip_suffix(']').unwrap_or(text);
    if inner.trim().is_empty() {
        return Value::Array(Vec::new());
    }

    Value::Array(
        split_unquoted(inner, |c| c == ',')
            .into_iter()
            .map(|element| array_element(element.trim()))
            .collect(),
    )
}

fn array_element(element: &str) -> Value {
    if let Some(i) = parse_int(element) {
        return Value::Int(i);
    }
    if let Some(f) = parse_float(element) {
        return Value::Float(f);
    }
    if let Some(b) = parse_bool(element) {
        return Value::Bool(b);
    }
    Value::String(strip_quotes(element).to_string())
}
