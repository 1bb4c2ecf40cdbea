//! Conversational memory for Memoir.
//!
//! Per-user message history with recency-windowed reads, per-user profile
//! facts, and pluggable storage backends (in-process, JSONL, SQLite).

pub mod error;
pub mod memory;
pub mod model;
pub mod profile;
pub mod store;

/// Memory error type.
pub use error::MemoryError;
/// Conversation memory facade.
pub use memory::{ConversationMemory, validate_user_id};
/// Message and profile model.
pub use model::{DEFAULT_RECENT_LIMIT, Message, ProfileAttributes, Role};
/// Profile inference heuristic.
pub use profile::extract_name;
/// Storage interface and built-in backends.
pub use store::{ConversationStore, InMemoryStore, JsonlStore, SqliteStore};
