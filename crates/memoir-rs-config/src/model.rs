//! Configuration schema for Memoir.

use serde::{Deserialize, Serialize};

/// Placeholder replaced with the JSON-serialized user profile.
pub const PROFILE_PLACEHOLDER: &str = "{profile}";
/// Placeholder replaced with the JSON-serialized recent conversation.
pub const CONVERSATION_PLACEHOLDER: &str = "{conversation}";

/// Root config for Memoir.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MemoirConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

impl MemoirConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> MemoirConfigBuilder {
        MemoirConfigBuilder::new()
    }
}

/// Builder for assembling a `MemoirConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct MemoirConfigBuilder {
    config: MemoirConfig,
}

impl MemoirConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: MemoirConfig::default(),
        }
    }

    /// Replace the memory configuration.
    pub fn memory(mut self, memory: MemoryConfig) -> Self {
        self.config.memory = memory;
        self
    }

    /// Replace the assistant configuration.
    pub fn assistant(mut self, assistant: AssistantConfig) -> Self {
        self.config.assistant = assistant;
        self
    }

    /// Finalize and return the built `MemoirConfig`.
    pub fn build(self) -> MemoirConfig {
        self.config
    }
}

/// Storage backend for conversation memory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemoryBackend {
    /// Process-local, lost on exit.
    InMemory,
    /// Append-only JSONL directory.
    Jsonl,
    /// SQLite database file.
    #[default]
    Sqlite,
}

/// Conversation memory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default)]
    pub backend: MemoryBackend,
    /// File (sqlite) or directory (jsonl) path; relative paths resolve
    /// against the caller's base directory.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    /// Run the "my name is" profile heuristic on user messages.
    #[serde(default = "default_infer_profile")]
    pub infer_profile: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            backend: MemoryBackend::default(),
            path: None,
            recent_limit: default_recent_limit(),
            infer_profile: default_infer_profile(),
        }
    }
}

fn default_recent_limit() -> usize {
    5
}

fn default_infer_profile() -> bool {
    true
}

/// Settings for the chat-driven agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// System prompt template with `{profile}` and `{conversation}` slots.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Upper bound for a whole agent request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            system_prompt: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}
