//! Config errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    ReadFailed(#[from] std::io::Error),
    #[error("malformed JSON5 config: {0}")]
    ParseFailed(#[from] json5::Error),
    /// Merged layers do not match the config schema.
    #[error("config does not match schema: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
}
