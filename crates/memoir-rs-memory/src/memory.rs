//! Conversation memory facade with argument validation and per-user
//! write serialization.

use crate::error::MemoryError;
use crate::model::{DEFAULT_RECENT_LIMIT, Message, ProfileAttributes, Role};
use crate::profile::{NAME_KEY, extract_name};
use crate::store::{ConversationStore, InMemoryStore};
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-user message history and profile facts over a pluggable store.
///
/// Writes for one user identifier run inside that user's exclusive section;
/// writes for different users proceed independently.
#[derive(Clone)]
pub struct ConversationMemory {
    store: Arc<dyn ConversationStore>,
    user_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl ConversationMemory {
    /// Create memory over the given backing store.
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self {
            store,
            user_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create non-durable memory backed by an [`InMemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    /// Return the backing store handle.
    pub fn store(&self) -> Arc<dyn ConversationStore> {
        self.store.clone()
    }

    /// Append one message to the user's record and return it.
    pub fn append_message(
        &self,
        user_id: &str,
        role: Role,
        content: impl Into<String>,
    ) -> Result<Message, MemoryError> {
        validate_user_id(user_id)?;
        let lock = self.user_lock(user_id);
        let _guard = lock.lock();
        self.append_locked(user_id, Message::now(role, content))
    }

    /// Append with a role given as text (`user` or `assistant`).
    pub fn append_message_str(
        &self,
        user_id: &str,
        role: &str,
        content: impl Into<String>,
    ) -> Result<Message, MemoryError> {
        let role = role.parse::<Role>()?;
        self.append_message(user_id, role, content)
    }

    /// Append a user message followed by the assistant reply as one unit.
    pub fn record_turn(
        &self,
        user_id: &str,
        user_text: impl Into<String>,
        assistant_text: impl Into<String>,
    ) -> Result<(Message, Message), MemoryError> {
        validate_user_id(user_id)?;
        let lock = self.user_lock(user_id);
        let _guard = lock.lock();
        let user = self.append_locked(user_id, Message::now(Role::User, user_text))?;
        let assistant =
            self.append_locked(user_id, Message::now(Role::Assistant, assistant_text))?;
        Ok((user, assistant))
    }

    /// Return up to `limit` most recent messages, oldest first.
    pub fn recent_messages(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, MemoryError> {
        let messages = self.store.recent_messages(user_id, limit)?;
        debug!(
            "recent messages (user_id={}, limit={}, returned={})",
            user_id,
            limit,
            messages.len()
        );
        Ok(messages)
    }

    /// [`recent_messages`](Self::recent_messages) with the default window.
    pub fn recent_messages_default(&self, user_id: &str) -> Result<Vec<Message>, MemoryError> {
        self.recent_messages(user_id, DEFAULT_RECENT_LIMIT)
    }

    /// Merge attributes into the profile; unmentioned keys stay untouched.
    pub fn update_profile(
        &self,
        user_id: &str,
        attributes: &ProfileAttributes,
    ) -> Result<(), MemoryError> {
        validate_user_id(user_id)?;
        if attributes.is_empty() {
            return Ok(());
        }
        let lock = self.user_lock(user_id);
        let _guard = lock.lock();
        self.store.merge_profile(user_id, attributes)?;
        debug!(
            "profile updated (user_id={}, keys={})",
            user_id,
            attributes.len()
        );
        Ok(())
    }

    /// Return the full profile, empty when none exists.
    pub fn get_profile(&self, user_id: &str) -> Result<ProfileAttributes, MemoryError> {
        self.store.load_profile(user_id)
    }

    /// Apply the name heuristic to user text; stores and returns the name.
    pub fn observe_user_message(
        &self,
        user_id: &str,
        text: &str,
    ) -> Result<Option<String>, MemoryError> {
        let Some(name) = extract_name(text) else {
            return Ok(None);
        };
        let mut attributes = ProfileAttributes::new();
        attributes.insert(NAME_KEY.to_string(), name.clone());
        self.update_profile(user_id, &attributes)?;
        Ok(Some(name))
    }

    fn append_locked(&self, user_id: &str, message: Message) -> Result<Message, MemoryError> {
        self.store.append_message(user_id, &message)?;
        debug!(
            "appended message (user_id={}, role={}, content_len={})",
            user_id,
            message.role,
            message.content.len()
        );
        Ok(message)
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.user_locks
            .lock()
            .entry(user_id.to_string())
            .or_default()
            .clone()
    }
}

/// Reject identifiers that cannot name a user record.
pub fn validate_user_id(user_id: &str) -> Result<(), MemoryError> {
    if user_id.is_empty() {
        return Err(MemoryError::InvalidArgument(
            "user id must not be empty".to_string(),
        ));
    }
    Ok(())
}
