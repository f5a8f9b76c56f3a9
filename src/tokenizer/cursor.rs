//! Lookahead helpers over the scanner's character buffer.
//!
//! None of these move the scanner; rules use them to decide whether they
//! fire and where the span they claim ends. Offsets are character indices.

use super::scanner::Scanner;
use super::token::{Position, TokenKind};

impl Scanner {
    pub(super) fn current(&self) -> Option<char> {
        self.char_at(self.index)
    }

    pub(super) fn char_at(&self, at: usize) -> Option<char> {
        self.input.get(at).copied()
    }

    /// Kind of the most recent token that is not a comment.
    pub(super) fn previous_kind(&self) -> Option<TokenKind> {
        self.tokens
            .iter()
            .rev()
            .map(|token| token.kind)
            .find(|kind| *kind != TokenKind::Comment)
    }

    pub(super) fn follows(&self, kinds: &[TokenKind]) -> bool {
        self.previous_kind()
            .is_some_and(|kind| kinds.contains(&kind))
    }

    /// Offset of the next line break at or after `from`, or the end of input.
    pub(super) fn line_end(&self, from: usize) -> usize {
        self.find_between(from, self.input.len(), |c| c == '\n')
            .unwrap_or(self.input.len())
    }

    pub(super) fn find_between(
        &self,
        from: usize,
        to: usize,
        predicate: impl Fn(char) -> bool,
    ) -> Option<usize> {
        let to = to.min(self.input.len());
        (from..to).find(|&at| predicate(self.input[at]))
    }

    /// Start of a `//` comment on the line of `from` that is not inside a
    /// double-quoted section.
    pub(super) fn comment_start(&self, from: usize) -> Option<usize> {
        let end = self.line_end(from);
        let mut quoted = false;
        for at in from..end {
            match self.input[at] {
                '"' => quoted = !quoted,
                '/' if !quoted && self.char_at(at + 1) == Some('/') => return Some(at),
                _ => {}
            }
        }
        None
    }

    /// Where a value starting at `from` stops: a trailing comment or the
    /// line break.
    pub(super) fn value_end(&self, from: usize) -> usize {
        self.comment_start(from)
            .unwrap_or_else(|| self.line_end(from))
    }

    /// Like [`Scanner::value_end`], but an expression also stops at a comma.
    pub(super) fn expression_end(&self, from: usize) -> usize {
        let end = self.value_end(from);
        self.find_between(from, end, |c| c == ',').unwrap_or(end)
    }

    /// End of the non-whitespace run starting at `from`.
    pub(super) fn word_end(&self, from: usize) -> usize {
        let end = self.value_end(from);
        self.find_between(from, end, char::is_whitespace)
            .unwrap_or(end)
    }

    /// First `,` or `]` outside double quotes, searched within the value
    /// region that starts at `from`.
    pub(super) fn element_end(&self, from: usize) -> Option<usize> {
        let end = self.value_end(from);
        let mut quoted = false;
        for at in from..end {
            match self.input[at] {
                '"' => quoted = !quoted,
                ',' | ']' if !quoted => return Some(at),
                _ => {}
            }
        }
        None
    }

    /// True when only blanks separate the scanner from the start of its line.
    pub(super) fn at_line_start(&self) -> bool {
        self.input[self.line_start..self.index]
            .iter()
            .all(|c| *c == ' ' || *c == '\t')
    }

    pub(super) fn slice(&self, from: usize, to: usize) -> String {
        let to = to.min(self.input.len());
        let from = from.min(to);
        self.input[from..to].iter().collect()
    }

    pub(super) fn position(&self, length: usize) -> Position {
        Position {
            line: self.line,
            start: self.index,
            length,
        }
    }
}
