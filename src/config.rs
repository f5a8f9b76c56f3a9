use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{CafeResult, Error};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Extension a file must carry to be decoded, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default = "default_true")]
    pub check_extension: bool,

    /// Treat unrecognized characters as fatal instead of skipping them.
    #[serde(default)]
    pub strict: bool,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            check_extension: default_true(),
            strict: false,
            max_depth: default_max_depth(),
        }
    }
}

impl DecoderConfig {
    // Load from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> CafeResult<Self> {
        let file = File::open(path)
            .map_err(|e| Error::config(format!("Failed to open config file: {}", e)))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| Error::config(format!("Failed to parse config file: {}", e)))
    }

    pub fn from_str(s: &str) -> CafeResult<Self> {
        serde_json::from_str(s).map_err(|e| Error::config(format!("Failed to parse config: {}", e)))
    }
}

fn default_extension() -> String {
    "cafe".to_string()
}
fn default_true() -> bool {
    true
}
fn default_max_depth() -> usize {
    64
}
