use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseError;
use crate::tokenizer::TokenizerError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input error: {0}")]
    Input(#[from] InputError),
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Config error: {0}")]
    Config(String),
}

pub type CafeResult<T> = Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config(message.into())
    }

    /// Which class of failure this is, independent of the stage that hit it.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Input(_) => ErrorCategory::Input,
            Error::Tokenizer(_) => ErrorCategory::Lex,
            Error::Parse(error) => error.category(),
            Error::Config(_) => ErrorCategory::Config,
        }
    }
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("{path} does not have the .{expected} extension")]
    WrongExtension { path: PathBuf, expected: String },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorCategory {
    Input,
    Lex,
    Syntax,
    Type,
    Semantic,
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Position;

    #[test]
    fn test_categories() {
        let lex = Error::from(TokenizerError::UnterminatedMultiString {
            position: Position::default(),
        });
        assert_eq!(lex.category(), ErrorCategory::Lex);
        assert_eq!(Error::config("bad").category(), ErrorCategory::Config);

        let input = Error::from(InputError::WrongExtension {
            path: PathBuf::from("settings.toml"),
            expected: "cafe".to_string(),
        });
        assert_eq!(input.category(), ErrorCategory::Input);
        assert_eq!(
            input.to_string(),
            "Input error: settings.toml does not have the .cafe extension"
        );
    }
}
