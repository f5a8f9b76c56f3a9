//! Scanning rules, in the order they are tried.
//!
//! A rule inspects the input at the cursor and either declines (`None`) or
//! returns the [`Step`] the scanner takes. Order matters: quoted strings are
//! tried before numbers so `"2023"` stays a string, and expressions are tried
//! before plain literals so `10 + 10` is not read as the integer `10`.

use strum::IntoEnumIterator;

use super::scanner::{Scanner, Step};
use super::token::{TokenKind, TokenizerError, TokenizerResult};
use crate::eval::builtin::Builtin;
use crate::eval::number::{parse_bool, parse_float, parse_int};

pub(super) type Rule = fn(&Scanner) -> TokenizerResult<Option<Step>>;

pub(super) const RULES: &[(&str, Rule)] = &[
    ("end-of-input", end_of_input),
    ("tab", tab),
    ("end-of-line", end_of_line),
    ("whitespace", whitespace),
    ("line-comment", line_comment),
    ("attribute-definition", attribute_definition),
    ("block-start", block_start),
    ("block-end", block_end),
    ("function-call", function_call),
    ("array-start", array_start),
    ("array-end", array_end),
    ("array-element", array_element),
    ("multi-line-string", multi_line_string),
    ("string", string),
    ("condition", condition),
    ("arithmetic", arithmetic),
    ("comparison", comparison),
    ("integer", integer),
    ("float", float),
    ("boolean", boolean),
    ("attribute-call", attribute_call),
    ("unrecognized", unrecognized),
];

const TAB_WIDTH: usize = 4;

/// Where a value is expected, so structural rules stay quiet.
const VALUE_CONTEXT: &[TokenKind] = &[
    TokenKind::AttrDef,
    TokenKind::ArrayStart,
    TokenKind::ArrayElem,
];

const ARRAY_CONTEXT: &[TokenKind] = &[TokenKind::ArrayStart, TokenKind::ArrayElem];

const ARITHMETIC_SYMBOLS: &str = "+-*/%";
const COMPARISON_SYMBOLS: &str = "=<>";
const CONDITION_WORDS: &[&str] = &["if", "for"];

fn after_definition(s: &Scanner) -> bool {
    s.follows(&[TokenKind::AttrDef])
}

fn end_of_input(s: &Scanner) -> TokenizerResult<Option<Step>> {
    Ok((s.index >= s.input.len()).then_some(Step::Finish))
}

fn tab(s: &Scanner) -> TokenizerResult<Option<Step>> {
    let is_tab = (0..TAB_WIDTH).all(|offset| s.char_at(s.index + offset) == Some(' '));
    Ok(is_tab.then(|| Step::Skip {
        end: s.index + TAB_WIDTH,
    }))
}

fn end_of_line(s: &Scanner) -> TokenizerResult<Option<Step>> {
    Ok((s.current() == Some('\n')).then(|| Step::Skip { end: s.index + 1 }))
}

fn whitespace(s: &Scanner) -> TokenizerResult<Option<Step>> {
    let blank = matches!(s.current(), Some(' ' | '\t' | '\r'));
    Ok(blank.then(|| Step::Skip { end: s.index + 1 }))
}

fn line_comment(s: &Scanner) -> TokenizerResult<Option<Step>> {
    if s.current() != Some('/') || s.char_at(s.index + 1) != Some('/') {
        return Ok(None);
    }
    let end = s.line_end(s.index);
    let token = s.start(TokenKind::Comment).with_text(s.slice(s.index, end));
    Ok(Some(Step::emit(token, end)))
}

fn attribute_definition(s: &Scanner) -> TokenizerResult<Option<Step>> {
    if !s.at_line_start() || s.follows(VALUE_CONTEXT) {
        return Ok(None);
    }
    let Some(equals) = s.find_between(s.index, s.value_end(s.index), |c| c == '=') else {
        return Ok(None);
    };
    let name = s.slice(s.index, equals);
    if name.trim().is_empty() {
        return Ok(None);
    }
    let token = s.start(TokenKind::AttrDef).with_text(name);
    Ok(Some(Step::emit(token, equals + 1)))
}

fn block_start(s: &Scanner) -> TokenizerResult<Option<Step>> {
    brace(s, '{', TokenKind::BlockStart)
}

fn block_end(s: &Scanner) -> TokenizerResult<Option<Step>> {
    brace(s, '}', TokenKind::BlockEnd)
}

/// The token text is whatever precedes the brace on its line: the block
/// name for `{`, usually nothing for `}`.
fn brace(s: &Scanner, symbol: char, kind: TokenKind) -> TokenizerResult<Option<Step>> {
    if s.follows(VALUE_CONTEXT) {
        return Ok(None);
    }
    let Some(at) = s.find_between(s.index, s.value_end(s.index), |c| c == symbol) else {
        return Ok(None);
    };
    let token = s.start(kind).with_text(s.slice(s.index, at));
    Ok(Some(Step::emit(token, at + 1)))
}

fn function_call(s: &Scanner) -> TokenizerResult<Option<Step>> {
    if !after_definition(s) {
        return Ok(None);
    }
    let end = s.value_end(s.index);
    let region = s.slice(s.index, end);
    let call = region.trim_start();
    let is_builtin = Builtin::iter().any(|builtin| {
        call.strip_prefix(builtin.as_ref())
            .is_some_and(|rest| rest.starts_with('('))
    });
    if !is_builtin {
        return Ok(None);
    }
    let token = s.start(TokenKind::Function).with_text(region);
    Ok(Some(Step::emit(token, end)))
}

fn array_start(s: &Scanner) -> TokenizerResult<Option<Step>> {
    if !after_definition(s) || s.current() == Some('"') {
        return Ok(None);
    }
    let Some(bracket) = s.find_between(s.index, s.value_end(s.index), |c| c == '[') else {
        return Ok(None);
    };
    Ok(Some(Step::emit(s.start(TokenKind::ArrayStart), bracket + 1)))
}

fn array_end(s: &Scanner) -> TokenizerResult<Option<Step>> {
    if !s.follows(ARRAY_CONTEXT) || s.current() != Some(']') {
        return Ok(None);
    }
    Ok(Some(Step::emit(s.start(TokenKind::ArrayEnd), s.index + 1)))
}

/// An element runs to the next `,` (consumed), the next `]` (left for
/// [`array_end`]) or, on a line that continues the array, the end of the line.
fn array_element(s: &Scanner) -> TokenizerResult<Option<Step>> {
    if !s.follows(ARRAY_CONTEXT) {
        return Ok(None);
    }
    let (text_end, end) = match s.element_end(s.index) {
        Some(at) if s.char_at(at) == Some(',') => (at, at + 1),
        Some(at) => (at, at),
        None => {
            let end = s.value_end(s.index);
            (end, end)
        }
    };
    if end <= s.index {
        return Ok(None);
    }
    let token = s
        .start(TokenKind::ArrayElem)
        .with_text(s.slice(s.index, text_end));
    Ok(Some(Step::emit(token, end)))
}

fn continues_on_next_line(s: &Scanner, from: usize) -> bool {
    s.slice(from, s.value_end(from))
        .trim_end()
        .ends_with('\\')
}

/// Rewrites every run of four spaces outside quotes as a tab marker.
fn tabs_to_markers(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut quoted = false;
    let mut spaces = 0;
    for c in line.chars() {
        if c == ' ' && !quoted {
            spaces += 1;
            if spaces == TAB_WIDTH {
                out.push('\t');
                spaces = 0;
            }
            continue;
        }
        out.extend(std::iter::repeat(' ').take(spaces));
        spaces = 0;
        if c == '"' {
            quoted = !quoted;
        }
        out.push(c);
    }
    out.extend(std::iter::repeat(' ').take(spaces));
    out
}

fn multi_line_string(s: &Scanner) -> TokenizerResult<Option<Step>> {
    if !after_definition(s) || s.current() != Some('"') {
        return Ok(None);
    }
    let closed = s
        .find_between(s.index + 1, s.line_end(s.index), |c| c == '"')
        .is_some();
    if !closed || !continues_on_next_line(s, s.index) {
        return Ok(None);
    }

    let mut token = s.start(TokenKind::MultiString);
    let mut from = s.index;
    loop {
        let stop = s.value_end(from);
        token.push(tabs_to_markers(&s.slice(from, stop)));
        if !continues_on_next_line(s, from) {
            return Ok(Some(Step::emit(token, stop)));
        }

        // The closing line must hold something besides whitespace.
        let line_end = s.line_end(from);
        if s.slice(line_end, s.input.len()).trim().is_empty() {
            return Err(unterminated(s, line_end));
        }
        token.push("\n");
        from = line_end + 1;
    }
}

fn unterminated(s: &Scanner, end: usize) -> TokenizerError {
    let error = TokenizerError::UnterminatedMultiString {
        position: s.position(end - s.index),
    };
    tracing::error!("{}", error);
    error
}

fn string(s: &Scanner) -> TokenizerResult<Option<Step>> {
    if !after_definition(s) || s.current() != Some('"') {
        return Ok(None);
    }
    let Some(close) = s.find_between(s.index + 1, s.line_end(s.index), |c| c == '"') else {
        return Ok(None);
    };
    let token = s
        .start(TokenKind::String)
        .with_text(s.slice(s.index, close + 1));
    Ok(Some(Step::emit(token, close + 1)))
}

/// Claims the expression at the cursor up to the next comma, comment or
/// line break.
fn expression(s: &Scanner, kind: TokenKind) -> TokenizerResult<Option<Step>> {
    let end = s.expression_end(s.index);
    if end <= s.index {
        return Ok(None);
    }
    let token = s.start(kind).with_text(s.slice(s.index, end));
    Ok(Some(Step::emit(token, end)))
}

/// Looks for any of `symbols` after the first character of the value, so a
/// leading sign stays part of a number. The sign of an exponent such as
/// `1e-5` does not count.
fn has_operator(s: &Scanner, symbols: &str) -> bool {
    let end = s.value_end(s.index);
    (s.index + 1..end).any(|at| {
        let c = s.input[at];
        symbols.contains(c) && !is_exponent_sign(s, at)
    })
}

fn is_exponent_sign(s: &Scanner, at: usize) -> bool {
    let before = |back: usize| at.checked_sub(back).and_then(|i| s.char_at(i));
    matches!(s.char_at(at), Some('+' | '-'))
        && matches!(before(1), Some('e' | 'E'))
        && before(2).is_some_and(|c| c.is_ascii_digit() || c == '.')
}

fn condition(s: &Scanner) -> TokenizerResult<Option<Step>> {
    if !after_definition(s) {
        return Ok(None);
    }
    let region = s.slice(s.index, s.value_end(s.index));
    if !CONDITION_WORDS.iter().any(|word| region.contains(word)) {
        return Ok(None);
    }
    expression(s, TokenKind::Condition)
}

fn arithmetic(s: &Scanner) -> TokenizerResult<Option<Step>> {
    if !after_definition(s) || !has_operator(s, ARITHMETIC_SYMBOLS) {
        return Ok(None);
    }
    expression(s, TokenKind::Arithmetic)
}

fn comparison(s: &Scanner) -> TokenizerResult<Option<Step>> {
    if !after_definition(s) || !has_operator(s, COMPARISON_SYMBOLS) {
        return Ok(None);
    }
    expression(s, TokenKind::Comparison)
}

/// Claims the whitespace-delimited run at the cursor when `accepts` agrees.
fn literal(
    s: &Scanner,
    kind: TokenKind,
    accepts: fn(&str) -> bool,
) -> TokenizerResult<Option<Step>> {
    if !after_definition(s) {
        return Ok(None);
    }
    let end = s.word_end(s.index);
    let word = s.slice(s.index, end);
    if end <= s.index || !accepts(&word) {
        return Ok(None);
    }
    Ok(Some(Step::emit(s.start(kind).with_text(word), end)))
}

fn integer(s: &Scanner) -> TokenizerResult<Option<Step>> {
    literal(s, TokenKind::Int, |word| parse_int(word).is_some())
}

fn float(s: &Scanner) -> TokenizerResult<Option<Step>> {
    literal(s, TokenKind::Float, |word| parse_float(word).is_some())
}

fn boolean(s: &Scanner) -> TokenizerResult<Option<Step>> {
    literal(s, TokenKind::Bool, |word| parse_bool(word).is_some())
}

fn attribute_call(s: &Scanner) -> TokenizerResult<Option<Step>> {
    literal(s, TokenKind::AttrCall, |_| true)
}

fn unrecognized(s: &Scanner) -> TokenizerResult<Option<Step>> {
    let token = s
        .start(TokenKind::Error)
        .with_text(s.slice(s.index, s.index + 1));
    Ok(Some(Step::emit(token, s.index + 1)))
}
