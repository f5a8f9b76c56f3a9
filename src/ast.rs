use std::fmt;

use indexmap::IndexMap;

use crate::eval::EvalError;
use crate::tokenizer::TokenKind;

/// A fully evaluated attribute value.
///
/// Arithmetic, comparisons and function calls all collapse into one of these.
/// `Unit` marks constructs that are recognized but not evaluated (conditions
/// and `concat`).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Array(Vec<Value>),
    #[default]
    Unit,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match item {
                        Value::String(s) => write!(f, "{:?}", s)?,
                        other => write!(f, "{}", other)?,
                    }
                }
                write!(f, "]")
            }
            Value::Unit => write!(f, "()"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

/// How an attribute's value was written, independent of the value's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum AttrKind {
    String,
    Int,
    Float,
    Bool,
    Array,
    Arithmetic,
    Comparison,
    Condition,
    Function,
}

impl TryFrom<TokenKind> for AttrKind {
    type Error = EvalError;

    fn try_from(kind: TokenKind) -> Result<Self, Self::Error> {
        match kind {
            TokenKind::String | TokenKind::MultiString => Ok(AttrKind::String),
            TokenKind::Int => Ok(AttrKind::Int),
            TokenKind::Float => Ok(AttrKind::Float),
            TokenKind::Bool => Ok(AttrKind::Bool),
            TokenKind::ArrayStart | TokenKind::ArrayElem => Ok(AttrKind::Array),
            TokenKind::Arithmetic => Ok(AttrKind::Arithmetic),
            TokenKind::Comparison => Ok(AttrKind::Comparison),
            TokenKind::Condition => Ok(AttrKind::Condition),
            TokenKind::Function => Ok(AttrKind::Function),
            TokenKind::Eof
            | TokenKind::Error
            | TokenKind::Comment
            | TokenKind::AttrDef
            | TokenKind::BlockStart
            | TokenKind::BlockEnd
            | TokenKind::AttrCall
            | TokenKind::ArrayEnd => Err(EvalError::UnmappedTokenKind(kind)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub kind: AttrKind,
    pub value: Value,
}

/// A named scope. Owns its attributes and child blocks outright.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub name: String,
    pub attributes: IndexMap<String, Attribute>,
    pub blocks: IndexMap<String, Block>,
}

impl Block {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.get(name)
    }

    /// Resolves a dotted path such as `server.tls.port`; the last segment
    /// names the attribute.
    pub fn lookup(&self, path: &str) -> Option<&Attribute> {
        lookup(&self.attributes, &self.blocks, path)
    }
}

/// The unnamed root scope of a decoded file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub attributes: IndexMap<String, Attribute>,
    pub blocks: IndexMap<String, Block>,
}

impl Document {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.get(name)
    }

    pub fn lookup(&self, path: &str) -> Option<&Attribute> {
        lookup(&self.attributes, &self.blocks, path)
    }
}

fn lookup<'a>(
    attributes: &'a IndexMap<String, Attribute>,
    blocks: &'a IndexMap<String, Block>,
    path: &str,
) -> Option<&'a Attribute> {
    match path.split_once('.') {
        None => attributes.get(path),
        Some((head, rest)) => blocks.get(head).and_then(|block| block.lookup(rest)),
    }
}
