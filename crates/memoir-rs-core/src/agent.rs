//! Memory-aware chat turn: read context, ask the model, record the turn.

use crate::chat::{ChatMessage, ChatModel};
use crate::context::{DEFAULT_SYSTEM_PROMPT, MemoryContext};
use crate::error::MemoirCoreError;
use log::{debug, info, warn};
use memoir_rs_config::MemoirConfig;
use memoir_rs_memory::{
    ConversationMemory, DEFAULT_RECENT_LIMIT, ProfileAttributes, validate_user_id,
};
use std::sync::Arc;
use std::time::Duration;

/// Default bound for one chat call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for [`MemoryAgent`].
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    /// Template with `{profile}` and `{conversation}` slots.
    pub system_prompt: String,
    /// Number of recent messages rendered into the prompt.
    pub recent_limit: usize,
    /// Run the name heuristic on each user message.
    pub infer_profile: bool,
    /// Bound for the chat call of one turn.
    pub request_timeout: Duration,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            infer_profile: true,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl AgentSettings {
    /// Derive settings from a validated config.
    pub fn from_config(config: &MemoirConfig) -> Self {
        Self {
            system_prompt: config
                .assistant
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            recent_limit: config.memory.recent_limit,
            infer_profile: config.memory.infer_profile,
            request_timeout: Duration::from_secs(config.assistant.request_timeout_secs),
        }
    }
}

/// Result of one [`MemoryAgent::respond`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// Model reply, also stored as the assistant message.
    pub reply: String,
    /// `Profile: {json}` after the turn.
    pub context: String,
    /// Profile after the turn, including any inferred name.
    pub profile: ProfileAttributes,
    /// Name found in the input this turn, if any.
    pub inferred_name: Option<String>,
}

/// Chat agent that reads and writes [`ConversationMemory`] around each turn.
pub struct MemoryAgent {
    memory: ConversationMemory,
    chat: Arc<dyn ChatModel>,
    settings: AgentSettings,
}

impl MemoryAgent {
    /// Create an agent with [`AgentSettings::default`].
    pub fn new(memory: ConversationMemory, chat: Arc<dyn ChatModel>) -> Self {
        Self::with_settings(memory, chat, AgentSettings::default())
    }

    /// Create an agent with explicit settings.
    pub fn with_settings(
        memory: ConversationMemory,
        chat: Arc<dyn ChatModel>,
        settings: AgentSettings,
    ) -> Self {
        Self {
            memory,
            chat,
            settings,
        }
    }

    /// Memory the agent reads and writes.
    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Active settings.
    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    /// Run one turn for `user_id`.
    ///
    /// Context is read before the model call. The user message and the reply
    /// are appended together only after the model answers, so a failed or
    /// timed out call leaves memory untouched.
    pub async fn respond(
        &self,
        user_id: &str,
        input: &str,
    ) -> Result<TurnOutcome, MemoirCoreError> {
        validate_user_id(user_id)?;
        let context = MemoryContext::gather(&self.memory, user_id, self.settings.recent_limit)?;
        let messages = vec![
            ChatMessage::system(context.render(&self.settings.system_prompt)?),
            ChatMessage::user(input),
        ];
        debug!(
            "memory agent request (user_id={}, recent={}, profile_keys={})",
            user_id,
            context.recent.len(),
            context.profile.len()
        );

        let reply = match tokio::time::timeout(
            self.settings.request_timeout,
            self.chat.chat(&messages),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    "memory agent timed out (user_id={}, timeout={:?})",
                    user_id, self.settings.request_timeout
                );
                return Err(MemoirCoreError::Timeout(self.settings.request_timeout));
            }
        };

        self.memory.record_turn(user_id, input, reply.as_str())?;
        let inferred_name = if self.settings.infer_profile {
            self.memory.observe_user_message(user_id, input)?
        } else {
            None
        };
        let after = MemoryContext {
            profile: self.memory.get_profile(user_id)?,
            recent: Vec::new(),
        };
        let summary = after.profile_summary()?;
        info!(
            "memory agent turn recorded (user_id={}, reply_len={}, inferred_name={})",
            user_id,
            reply.len(),
            inferred_name.is_some()
        );
        Ok(TurnOutcome {
            reply,
            context: summary,
            profile: after.profile,
            inferred_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AgentSettings, DEFAULT_REQUEST_TIMEOUT};
    use crate::context::DEFAULT_SYSTEM_PROMPT;
    use memoir_rs_config::MemoirConfig;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn settings_follow_config() {
        let defaults = AgentSettings::from_config(&MemoirConfig::default());
        assert_eq!(defaults, AgentSettings::default());
        assert_eq!(defaults.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(defaults.request_timeout, DEFAULT_REQUEST_TIMEOUT);

        let config = MemoirConfig::load_from_str(
            r#"{
                memory: { backend: "in_memory", recent_limit: 9, infer_profile: false },
                assistant: { system_prompt: "{profile} / {conversation}", request_timeout_secs: 4 },
            }"#,
        )
        .expect("config");
        let settings = AgentSettings::from_config(&config);
        assert_eq!(settings.system_prompt, "{profile} / {conversation}");
        assert_eq!(settings.recent_limit, 9);
        assert!(!settings.infer_profile);
        assert_eq!(settings.request_timeout, Duration::from_secs(4));
    }
}
