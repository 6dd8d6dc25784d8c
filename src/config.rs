//! Codec configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::protocol::CallStyle;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read or written
    #[error("IO error on {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Config file is not valid JSON for [`CodecConfig`]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings for an [`Interactive`](crate::protocol::Interactive) driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Wire layout of outgoing calls
    pub call_style: CallStyle,

    /// Characters of each raw reply included in trace events
    pub reply_preview_len: usize,

    /// Emit a debug event for every call sent
    pub log_calls: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            call_style: CallStyle::Parenthesized,
            reply_preview_len: 200,
            log_calls: true,
        }
    }
}

impl CodecConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_slice(&data)?)
    }

    /// Write configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_vec_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Leading part of `reply`, cut on a character boundary
    pub fn preview<'a>(&self, reply: &'a str) -> &'a str {
        match reply.char_indices().nth(self.reply_preview_len) {
            Some((idx, _)) => &reply[..idx],
            None => reply,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("codec.json");

        let config = CodecConfig {
            call_style: CallStyle::Command,
            reply_preview_len: 16,
            log_calls: false,
        };
        config.save(&path).unwrap();

        assert_eq!(CodecConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: CodecConfig = serde_json::from_str(r#"{"call_style": "command"}"#).unwrap();
        assert_eq!(config.call_style, CallStyle::Command);
        assert_eq!(config.reply_preview_len, 200);
        assert!(config.log_calls);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = CodecConfig::load(&temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let config = CodecConfig {
            reply_preview_len: 3,
            ..CodecConfig::default()
        };
        assert_eq!(config.preview("ääää"), "äää");
        assert_eq!(config.preview("ab"), "ab");
    }
}
