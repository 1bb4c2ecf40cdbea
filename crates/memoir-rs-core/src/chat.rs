//! Chat model seam. Providers live outside this workspace.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Speaker role in a chat request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Instructions and injected memory context.
    System,
    /// End-user input.
    User,
    /// Model output.
    Assistant,
}

/// One message in a chat request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Speaker of the message.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Build an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Errors surfaced by chat providers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatError {
    /// Provider rejected or failed the request.
    #[error("provider error: {0}")]
    Provider(String),
    /// Provider returned no text.
    #[error("empty response")]
    EmptyResponse,
}

#[async_trait]
/// Chat completion provider used by the agents.
pub trait ChatModel: Send + Sync {
    /// Send the messages and return the assistant's text reply.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ChatError>;
}
