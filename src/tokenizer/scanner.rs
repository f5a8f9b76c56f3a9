use tracing::{debug, trace, warn};

use super::rules::RULES;
use super::token::{Token, TokenBuilder, TokenKind, TokenizerError, TokenizerResult};

/// What a rule decided to do with the input at the cursor.
#[derive(Debug)]
pub(super) enum Step {
    /// End of input; emit `Eof` and stop.
    Finish,
    /// Advance to `end` without emitting anything.
    Skip { end: usize },
    /// Emit `token` and advance to `end`.
    Emit { token: TokenBuilder, end: usize },
}

/// Character-level scanner.
///
/// Each step asks the rules in priority order whether they recognize the
/// input at the cursor; the first one that does decides the step.
#[derive(Debug, Clone)]
pub struct Scanner {
    pub(super) input: Vec<char>,
    pub(super) index: usize,
    pub(super) line: usize,
    pub(super) line_start: usize,
    pub(super) tokens: Vec<Token>,
    finished: bool,
}

impl Scanner {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            index: 0,
            line: 1, // 1-based
            line_start: 0,
            tokens: Vec::new(),
            finished: false,
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn scan(mut self) -> TokenizerResult<Vec<Token>> {
        while !self.finished {
            let step = self.next_step()?;
            self.apply(step);
        }
        debug!(tokens = self.tokens.len(), lines = self.line, "scan finished");
        Ok(self.tokens)
    }

    fn next_step(&self) -> TokenizerResult<Step> {
        for (name, rule) in RULES {
            if let Some(step) = rule(self)? {
                trace!(rule = *name, line = self.line, start = self.index, "rule fired");
                return Ok(step);
            }
        }

        let error = TokenizerError::NoRuleMatched {
            found: self.slice(self.index, self.index + 20),
            position: self.position(1),
        };
        tracing::error!("{}", error);
        Err(error)
    }

    fn apply(&mut self, step: Step) {
        match step {
            Step::Finish => {
                self.tokens.push(Token::eof(self.line, self.index));
                self.finished = true;
            }
            Step::Skip { end } => self.advance_to(end),
            Step::Emit { token, end } => {
                let token = token.finish(end);
                if token.kind == TokenKind::Error {
                    warn!(found = %token.text, position = %token.position, "unrecognized input");
                }
                self.tokens.push(token);
                self.advance_to(end);
            }
        }
    }

    fn advance_to(&mut self, end: usize) {
        debug_assert!(end > self.index, "scanner must make progress");
        let end = end.min(self.input.len());
        for at in self.index..end {
            if self.input[at] == '\n' {
                self.line += 1;
                self.line_start = at + 1;
            }
        }
        self.index = end;
    }

    /// A builder for a token that starts at the cursor.
    pub(super) fn start(&self, kind: TokenKind) -> TokenBuilder {
        TokenBuilder::new(kind, self.line, self.index)
    }
}

impl Step {
    pub(super) fn emit(token: TokenBuilder, end: usize) -> Self {
        Step::Emit { token, end }
    }
}
