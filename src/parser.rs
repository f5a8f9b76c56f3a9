//! # Tree builder
//!
//! Consumes the scanner's token stream and assembles the [`Document`].
//!
//! Blocks live in an arena while the stream is walked; the stack of open
//! blocks holds arena ids, so attaching an attribute to the innermost scope is
//! a single index lookup. Once the stream ends the arena is folded into the
//! owned, nested tree that callers receive.

use std::mem;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::ast::{AttrKind, Attribute, Block, Document};
use crate::config::DecoderConfig;
use crate::error::ErrorCategory;
use crate::eval::{transform, EvalError};
use crate::tokenizer::{Position, Token, TokenKind};

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Block {name:?} opened at {position} is never closed")]
    UnterminatedBlock { name: String, position: Position },

    #[error("Block end at {position} has no open block")]
    UnexpectedBlockEnd { position: Position },

    #[error("Array {name:?} defined at {position} is never closed")]
    UnterminatedArray { name: String, position: Position },

    #[error("Block {name:?} at {position} nests deeper than {depth} levels")]
    NestingTooDeep {
        name: String,
        depth: usize,
        position: Position,
    },

    #[error("Unrecognized input {text:?} at {position}")]
    Unrecognized { text: String, position: Position },

    #[error("Attribute {name:?} defined at {position}: {source}")]
    Attribute {
        name: String,
        position: Position,
        #[source]
        source: EvalError,
    },
}

impl ParseError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ParseError::UnterminatedBlock { .. }
            | ParseError::UnexpectedBlockEnd { .. }
            | ParseError::UnterminatedArray { .. }
            | ParseError::NestingTooDeep { .. } => ErrorCategory::Syntax,
            ParseError::Unrecognized { .. } => ErrorCategory::Lex,
            ParseError::Attribute { source, .. } => source.category(),
        }
    }
}

type BlockId = usize;

const ROOT: BlockId = 0;

#[derive(Debug, Default)]
struct BlockNode {
    name: String,
    attributes: IndexMap<String, Attribute>,
    children: IndexMap<String, BlockId>,
    opened_at: Position,
}

pub struct TreeBuilder<'a> {
    tokens: &'a [Token],
    index: usize,
    arena: Vec<BlockNode>,
    open: Vec<BlockId>,
    strict: bool,
    max_depth: usize,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self::with_config(tokens, &DecoderConfig::default())
    }

    pub fn with_config(tokens: &'a [Token], config: &DecoderConfig) -> Self {
        Self {
            tokens,
            index: 0,
            arena: vec![BlockNode::default()],
            open: Vec::new(),
            strict: config.strict,
            max_depth: config.max_depth,
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn build(mut self) -> ParseResult<Document> {
        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::AttrDef => self.attribute(token)?,
                TokenKind::BlockStart => self.open_block(token)?,
                TokenKind::BlockEnd => self.close_block(token)?,
                TokenKind::Error => self.unrecognized(token)?,
                // Comments, and values with no definition in front of them.
                _ => {}
            }
        }

        if let Some(&id) = self.open.last() {
            let node = &self.arena[id];
            return Err(fail(ParseError::UnterminatedBlock {
                name: node.name.clone(),
                position: node.opened_at,
            }));
        }

        debug!(blocks = self.arena.len() - 1, "document built");
        Ok(self.freeze())
    }

    fn next_token(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.index)?;
        self.index += 1;
        Some(token)
    }

    fn next_significant(&mut self) -> Option<&'a Token> {
        loop {
            let token = self.next_token()?;
            if token.kind != TokenKind::Comment {
                return Some(token);
            }
        }
    }

    fn current(&self) -> BlockId {
        self.open.last().copied().unwrap_or(ROOT)
    }

    fn attribute(&mut self, definition: &'a Token) -> ParseResult<()> {
        let name = definition.text.clone();
        let (kind, text) = match self.next_significant() {
            Some(token) if token.kind == TokenKind::ArrayStart => {
                (TokenKind::ArrayStart, self.collect_array(definition)?)
            }
            Some(token) => (token.kind, token.text.clone()),
            None => (TokenKind::Eof, String::new()),
        };

        let wrap = |source: EvalError| {
            fail(ParseError::Attribute {
                name: name.clone(),
                position: definition.position,
                source,
            })
        };
        let attr_kind = AttrKind::try_from(kind).map_err(wrap)?;
        let value = transform(&text, kind).map_err(wrap)?;

        debug!(name = %name, kind = %attr_kind, value = %value, "attribute");
        let scope = self.current();
        self.arena[scope].attributes.insert(
            name.clone(),
            Attribute {
                name,
                kind: attr_kind,
                value,
            },
        );
        Ok(())
    }

    /// Joins element texts up to the closing bracket into `[a, b, ...]`.
    fn collect_array(&mut self, definition: &Token) -> ParseResult<String> {
        let mut elements = Vec::new();
        loop {
            match self.next_token().map(|token| (token.kind, token)) {
                Some((TokenKind::ArrayEnd, _)) => break,
                Some((TokenKind::ArrayElem, token)) => elements.push(token.text.as_str()),
                Some((TokenKind::Comment, _)) => continue,
                _ => {
                    return Err(fail(ParseError::UnterminatedArray {
                        name: definition.text.clone(),
                        position: definition.position,
                    }))
                }
            }
        }
        Ok(format!("[{}]", elements.join(", ")))
    }

    fn open_block(&mut self, token: &Token) -> ParseResult<()> {
        if self.open.len() >= self.max_depth {
            return Err(fail(ParseError::NestingTooDeep {
                name: token.text.clone(),
                depth: self.max_depth,
                position: token.position,
            }));
        }

        let id = self.arena.len();
        self.arena.push(BlockNode {
            name: token.text.clone(),
            opened_at: token.position,
            ..Default::default()
        });
        let parent = self.current();
        if let Some(replaced) = self.arena[parent].children.insert(token.text.clone(), id) {
            warn!(block = %token.text, replaced, "block redefined, previous contents dropped");
        }
        self.open.push(id);
        Ok(())
    }

    fn close_block(&mut self, token: &Token) -> ParseResult<()> {
        match self.open.pop() {
            Some(_) => Ok(()),
            None => Err(fail(ParseError::UnexpectedBlockEnd {
                position: token.position,
            })),
        }
    }

    fn unrecognized(&self, token: &Token) -> ParseResult<()> {
        if self.strict {
            return Err(fail(ParseError::Unrecognized {
                text: token.text.clone(),
                position: token.position,
            }));
        }
        warn!(text = %token.text, position = %token.position, "skipping unrecognized input");
        Ok(())
    }

    fn freeze(mut self) -> Document {
        let root = mem::take(&mut self.arena[ROOT]);
        let blocks = self.freeze_children(root.children);
        Document {
            attributes: root.attributes,
            blocks,
        }
    }

    fn freeze_children(&mut self, children: IndexMap<String, BlockId>) -> IndexMap<String, Block> {
        children
            .into_iter()
            .map(|(name, id)| {
                let node = mem::take(&mut self.arena[id]);
                let blocks = self.freeze_children(node.children);
                let block = Block {
                    name: node.name,
                    attributes: node.attributes,
                    blocks,
                };
                (name, block)
            })
            .collect()
    }
}

fn fail(error: ParseError) -> ParseError {
    tracing::error!("{}", error);
    error
}
