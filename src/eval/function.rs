use std::str::FromStr;

use tracing::debug;

use super::builtin::Builtin;
use super::text::split_once_unquoted;
use super::{EvalError, EvalResult};
use crate::ast::Value;

/// Evaluates a call such as `append("a", "b")`.
///
/// Single-parameter functions receive everything between the parentheses;
/// the others are split at the first comma that is not inside quotes.
#[tracing::instrument(level = "trace")]
pub fn call(text: &str) -> EvalResult<Value> {
    let text = text.trim();
    let (name, rest) = text
        .split_once('(')
        .ok_or_else(|| EvalError::syntax("function call is missing its parameter list", text))?;
    let name = name.trim();
    let builtin =
        Builtin::from_str(name).map_err(|_| EvalError::FunctionNotImplemented(name.to_string()))?;
    let inner = rest.strip_suffix(')').ok_or_else(|| {
        EvalError::syntax("function call is missing its closing parenthesis", text)
    })?;

    let params = if builtin.arity() == 1 {
        vec![inner]
    } else {
        let (first, second) = split_once_unquoted(inner, ',').ok_or_else(|| {
            EvalError::syntax(
                format!("{} expects {} parameters", builtin, builtin.arity()),
                text,
            )
        })?;
        vec![first, second]
    };

    debug!(function = %builtin, ?params, "calling builtin");
    builtin.apply(&params)
}
