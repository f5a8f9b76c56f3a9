use std::fmt;

use thiserror::Error;

/// Classification of a scanned span.
///
/// Whitespace, tabs and line ends only move the scanner forward, so they have
/// no kind of their own.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum TokenKind {
    Eof,
    Error,
    Comment,
    AttrDef,
    BlockStart,
    BlockEnd,
    AttrCall,
    String,
    MultiString,
    Int,
    Float,
    Bool,
    ArrayStart,
    ArrayEnd,
    ArrayElem,
    Arithmetic,
    Comparison,
    Condition,
    Function,
}

/// Location of a token in the source, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// 1-based line of the first character.
    pub line: usize,
    /// 0-based character offset of the first character.
    pub start: usize,
    /// Number of characters the token spans.
    pub length: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line: {}, start: {}, length: {}",
            self.line, self.start, self.length
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    pub(crate) fn eof(line: usize, start: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            text: String::new(),
            position: Position {
                line,
                start,
                length: 0,
            },
        }
    }
}

/// Accumulates the text of a token whose span may cover several physical
/// lines before it is frozen into a [`Token`].
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    kind: TokenKind,
    segments: Vec<String>,
    line: usize,
    start: usize,
}

impl TokenBuilder {
    pub fn new(kind: TokenKind, line: usize, start: usize) -> Self {
        Self {
            kind,
            segments: Vec::new(),
            line,
            start,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push(text);
        self
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// Freezes the builder. `end` is the exclusive character offset where the
    /// token's span stops.
    pub fn finish(self, end: usize) -> Token {
        Token {
            kind: self.kind,
            text: self.segments.concat().trim().to_string(),
            position: Position {
                line: self.line,
                start: self.start,
                length: end.saturating_sub(self.start),
            },
        }
    }
}

pub type TokenizerResult<T> = Result<T, TokenizerError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenizerError {
    #[error("No scanning rule matched {found:?} at {position}")]
    NoRuleMatched { found: String, position: Position },

    #[error("Multi-line string starting at {position} is never terminated")]
    UnterminatedMultiString { position: Position },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_trims_joined_segments() {
        let mut builder = TokenBuilder::new(TokenKind::MultiString, 3, 10);
        builder.push("  \"multi\" \\\n");
        builder.push("\t\"line\"  ");
        let token = builder.finish(30);

        assert_eq!(token.kind, TokenKind::MultiString);
        assert_eq!(token.text, "\"multi\" \\\n\t\"line\"");
        assert_eq!(
            token.position,
            Position {
                line: 3,
                start: 10,
                length: 20
            }
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(TokenKind::AttrDef.to_string(), "attr-def");
        assert_eq!(TokenKind::MultiString.to_string(), "multi-string");
        assert_eq!(TokenKind::Eof.as_ref(), "eof");
    }
}
