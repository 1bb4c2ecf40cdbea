//! Error types for the core crate.

use crate::chat::ChatError;
use memoir_rs_config::ConfigError;
use memoir_rs_memory::MemoryError;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by agents and store setup.
#[derive(Debug, Error)]
pub enum MemoirCoreError {
    /// Memory or storage failure, passed through unchanged.
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),
    /// Chat model failure.
    #[error("chat error: {0}")]
    Chat(#[from] ChatError),
    /// The chat call did not finish in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// Config error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Context serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
