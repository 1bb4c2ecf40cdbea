//! Storage backends for conversation records and user profiles.

mod in_memory;
mod jsonl;
mod sqlite;

pub use in_memory::InMemoryStore;
pub use jsonl::JsonlStore;
pub use sqlite::SqliteStore;

use crate::error::MemoryError;
use crate::model::{Message, ProfileAttributes};

/// Persistent store abstraction for per-user messages and profiles.
///
/// Stores never validate user identifiers; the facade does that. Every
/// write must be committed before the call returns.
pub trait ConversationStore: Send + Sync {
    /// Append a message to the user's record, preserving insertion order.
    fn append_message(&self, user_id: &str, message: &Message) -> Result<(), MemoryError>;
    /// Return up to `limit` most recent messages for the user, oldest first.
    fn recent_messages(&self, user_id: &str, limit: usize) -> Result<Vec<Message>, MemoryError>;
    /// Merge attributes into the user's profile, overwriting existing keys.
    fn merge_profile(
        &self,
        user_id: &str,
        attributes: &ProfileAttributes,
    ) -> Result<(), MemoryError>;
    /// Load the user's profile, empty when none exists.
    fn load_profile(&self, user_id: &str) -> Result<ProfileAttributes, MemoryError>;
}
