//! Message and profile model shared by the memory facade and stores.

use crate::error::MemoryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Window size used when a caller does not pick one.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Profile facts for a single user, keyed by attribute name.
pub type ProfileAttributes = BTreeMap<String, String>;

/// Speaker role for a stored message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User-authored message.
    User,
    /// Assistant-authored message.
    Assistant,
}

impl Role {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = MemoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(MemoryError::InvalidArgument(format!(
                "unknown role `{other}` (expected user or assistant)"
            ))),
        }
    }
}

/// One dialogue turn in a user's conversation record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role that produced the message.
    pub role: Role,
    /// Message content.
    pub content: String,
    /// Timestamp assigned when the message was appended.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Build a message stamped with the current wall-clock time.
    pub fn now(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Copy the last `limit` messages, oldest first.
pub(crate) fn recent_window(messages: &[Message], limit: usize) -> Vec<Message> {
    let start = messages.len().saturating_sub(limit);
    messages[start..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::{Message, Role, recent_window};
    use crate::MemoryError;
    use pretty_assertions::assert_eq;

    #[test]
    fn role_parses_known_values_only() {
        assert_eq!("user".parse::<Role>().expect("user"), Role::User);
        assert_eq!(
            "assistant".parse::<Role>().expect("assistant"),
            Role::Assistant
        );
        for bad in ["system", "User", ""] {
            match bad.parse::<Role>() {
                Err(MemoryError::InvalidArgument(_)) => {}
                other => panic!("unexpected result for {bad:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).expect("serialize");
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn recent_window_keeps_tail_in_order() {
        let messages: Vec<Message> = (0..4)
            .map(|idx| Message::now(Role::User, format!("m{idx}")))
            .collect();
        let window = recent_window(&messages, 2);
        let contents: Vec<&str> = window.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m3"]);
        assert_eq!(recent_window(&messages, 10).len(), 4);
        assert!(recent_window(&messages, 0).is_empty());
    }
}
