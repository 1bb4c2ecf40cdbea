use async_trait::async_trait;
use memoir_rs_core::{ChatError, ChatMessage, ChatModel};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Always answers with the same text.
#[derive(Debug, Clone)]
pub struct FixedChat {
    response: String,
}

impl FixedChat {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl ChatModel for FixedChat {
    async fn chat(&self, _messages: &[ChatMessage]) -> Result<String, ChatError> {
        Ok(self.response.clone())
    }
}

/// Answers with a fixed text and keeps every request it saw.
#[derive(Debug, Clone)]
pub struct RecordingChat {
    response: String,
    seen: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl RecordingChat {
    pub fn new(response: impl Into<String>) -> (Self, Arc<Mutex<Vec<Vec<ChatMessage>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                response: response.into(),
                seen: seen.clone(),
            },
            seen,
        )
    }
}

#[async_trait]
impl ChatModel for RecordingChat {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        self.seen.lock().push(messages.to_vec());
        Ok(self.response.clone())
    }
}

/// Replays queued responses in order and records requests.
///
/// Once the queue is empty every call fails with `EmptyResponse`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChat {
    responses: Arc<Mutex<VecDeque<String>>>,
    seen: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl ScriptedChat {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().map(Into::into).collect())),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        self.seen.lock().push(messages.to_vec());
        self.responses
            .lock()
            .pop_front()
            .ok_or(ChatError::EmptyResponse)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FailingChat;

#[async_trait]
impl ChatModel for FailingChat {
    async fn chat(&self, _messages: &[ChatMessage]) -> Result<String, ChatError> {
        Err(ChatError::Provider("boom".to_string()))
    }
}

/// Sleeps before answering, for timeout tests.
#[derive(Debug, Clone)]
pub struct SlowChat {
    delay: Duration,
    response: String,
}

impl SlowChat {
    pub fn new(delay: Duration, response: impl Into<String>) -> Self {
        Self {
            delay,
            response: response.into(),
        }
    }
}

#[async_trait]
impl ChatModel for SlowChat {
    async fn chat(&self, _messages: &[ChatMessage]) -> Result<String, ChatError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.response.clone())
    }
}
