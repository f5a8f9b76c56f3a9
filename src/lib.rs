//! Decoder for CAFE, a small structured configuration language.
//!
//! A CAFE file holds `name = value` attributes and named `{ ... }` blocks
//! that nest. Values are typed literals (strings, multi-line strings,
//! integers, floats, booleans and arrays) or inline expressions that are
//! evaluated while decoding: arithmetic, comparisons and calls to built-in
//! functions.
//!
//! ```
//! let document = cafe::decode_str("port = 8000 + 80\nserver {\n    tls = true\n}\n").unwrap();
//! assert_eq!(document.lookup("port").unwrap().value, cafe::Value::Int(8080));
//! assert_eq!(document.lookup("server.tls").unwrap().value, cafe::Value::Bool(true));
//! ```

pub mod ast;
pub mod config;
pub mod decoder;
pub mod error;
pub mod eval;
pub mod parser;
pub mod tokenizer;

use std::path::Path;

// Re-exports
pub use ast::*;
pub use config::DecoderConfig;
pub use decoder::Decoder;
pub use error::*;
pub use parser::{ParseError, TreeBuilder};

/// Decodes a `.cafe` file with the default configuration.
pub fn decode<P: AsRef<Path>>(path: P) -> CafeResult<Document> {
    Decoder::default().decode_file(path)
}

/// Decodes CAFE source text with the default configuration.
pub fn decode_str(input: &str) -> CafeResult<Document> {
    Decoder::default().decode_str(input)
}
