use std::fs;
use std::path::Path;

use tracing::debug;

use crate::ast::Document;
use crate::config::DecoderConfig;
use crate::error::{CafeResult, Error, InputError};
use crate::parser::TreeBuilder;
use crate::tokenizer::tokenize;

/// Runs the full pipeline: read, scan, build.
///
/// A decoder holds only its configuration, so one instance can be shared
/// across threads and every call works on its own scanner and builder.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    #[tracing::instrument(level = "debug", skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> CafeResult<Document> {
        let path = path.as_ref();
        self.check_extension(path)?;

        let input = fs::read_to_string(path).map_err(|source| {
            fail(InputError::Io {
                path: path.to_path_buf(),
                source,
            })
        })?;
        debug!(chars = input.chars().count(), "read input");
        self.decode_str(&input)
    }

    #[tracing::instrument(level = "debug", skip(self, input))]
    pub fn decode_str(&self, input: &str) -> CafeResult<Document> {
        let tokens = tokenize(input)?;
        let document = TreeBuilder::with_config(&tokens, &self.config).build()?;
        debug!(
            attributes = document.attributes.len(),
            blocks = document.blocks.len(),
            "decoded"
        );
        Ok(document)
    }

    fn check_extension(&self, path: &Path) -> CafeResult<()> {
        if !self.config.check_extension {
            return Ok(());
        }
        let suffix = format!(".{}", self.config.extension);
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(&suffix));
        if matches {
            Ok(())
        } else {
            Err(fail(InputError::WrongExtension {
                path: path.to_path_buf(),
                expected: self.config.extension.clone(),
            }))
        }
    }
}

fn fail(error: InputError) -> Error {
    tracing::error!("{}", error);
    Error::Input(error)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn test_extension_check() {
        let decoder = Decoder::default();
        assert!(decoder.check_extension(Path::new("app.cafe")).is_ok());
        assert!(decoder.check_extension(Path::new("dir.v2/app.cafe")).is_ok());
        assert!(decoder.check_extension(Path::new("conf/.cafe")).is_ok());
        for path in ["app.json", "app", "app.CAFE", "app.cafe.bak", "appcafe", "cafe/"] {
            let err = decoder.check_extension(Path::new(path)).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Input, "{path}");
        }
    }

    #[test]
    fn test_extension_check_can_be_disabled() {
        let decoder = Decoder::new(DecoderConfig {
            check_extension: false,
            ..DecoderConfig::default()
        });
        assert!(decoder.check_extension(Path::new("app.conf")).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let path = PathBuf::from("/nonexistent/dir/app.cafe");
        let err = Decoder::default().decode_file(&path).unwrap_err();
        assert!(matches!(err, Error::Input(InputError::Io { .. })));
    }
}
