//! Process-local store with no durability.

use super::ConversationStore;
use crate::error::MemoryError;
use crate::model::{Message, ProfileAttributes, recent_window};
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-process store; contents are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    conversations: RwLock<HashMap<String, Vec<Message>>>,
    profiles: RwLock<HashMap<String, ProfileAttributes>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationStore for InMemoryStore {
    fn append_message(&self, user_id: &str, message: &Message) -> Result<(), MemoryError> {
        self.conversations
            .write()
            .entry(user_id.to_string())
            .or_default()
            .push(message.clone());
        Ok(())
    }

    fn recent_messages(&self, user_id: &str, limit: usize) -> Result<Vec<Message>, MemoryError> {
        Ok(self
            .conversations
            .read()
            .get(user_id)
            .map(|messages| recent_window(messages, limit))
            .unwrap_or_default())
    }

    fn merge_profile(
        &self,
        user_id: &str,
        attributes: &ProfileAttributes,
    ) -> Result<(), MemoryError> {
        self.profiles
            .write()
            .entry(user_id.to_string())
            .or_default()
            .extend(attributes.clone());
        Ok(())
    }

    fn load_profile(&self, user_id: &str) -> Result<ProfileAttributes, MemoryError> {
        Ok(self.profiles.read().get(user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryStore;
    use crate::model::{Message, ProfileAttributes, Role};
    use crate::store::ConversationStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_user_reads_empty() {
        let store = InMemoryStore::new();
        assert!(store.recent_messages("ghost", 5).expect("recent").is_empty());
        assert!(store.load_profile("ghost").expect("profile").is_empty());
    }

    #[test]
    fn users_are_isolated() {
        let store = InMemoryStore::new();
        store
            .append_message("a", &Message::now(Role::User, "from a"))
            .expect("append a");
        store
            .append_message("b", &Message::now(Role::User, "from b"))
            .expect("append b");

        let a = store.recent_messages("a", 5).expect("recent a");
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].content, "from a");

        let mut attrs = ProfileAttributes::new();
        attrs.insert("name".to_string(), "alice".to_string());
        store.merge_profile("a", &attrs).expect("merge");
        assert!(store.load_profile("b").expect("profile b").is_empty());
    }
}
