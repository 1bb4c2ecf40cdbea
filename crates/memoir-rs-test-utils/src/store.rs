use memoir_rs_memory::{ConversationStore, MemoryError, Message, ProfileAttributes};
use std::io;

/// Store whose every operation fails with an IO error.
#[derive(Debug, Clone, Default)]
pub struct FailingStore;

fn unavailable() -> MemoryError {
    MemoryError::Io(io::Error::other("store unavailable"))
}

impl ConversationStore for FailingStore {
    fn append_message(&self, _user_id: &str, _message: &Message) -> Result<(), MemoryError> {
        Err(unavailable())
    }

    fn recent_messages(&self, _user_id: &str, _limit: usize) -> Result<Vec<Message>, MemoryError> {
        Err(unavailable())
    }

    fn merge_profile(
        &self,
        _user_id: &str,
        _attributes: &ProfileAttributes,
    ) -> Result<(), MemoryError> {
        Err(unavailable())
    }

    fn load_profile(&self, _user_id: &str) -> Result<ProfileAttributes, MemoryError> {
        Err(unavailable())
    }
}
