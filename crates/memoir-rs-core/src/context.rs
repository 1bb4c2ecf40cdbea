//! Memory context gathered for a single chat turn.

use memoir_rs_config::{CONVERSATION_PLACEHOLDER, PROFILE_PLACEHOLDER};
use memoir_rs_memory::{ConversationMemory, MemoryError, Message, ProfileAttributes};
use serde::Serialize;

/// System prompt used when config does not provide one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an AI assistant with memory.\n\
User Profile: {profile}\n\
Recent Conversation: {conversation}\n\
Respond naturally and use the context when appropriate.";

/// Profile and recent history for one user, read before a turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemoryContext {
    /// Profile attributes for the user.
    pub profile: ProfileAttributes,
    /// Recent messages, oldest first.
    pub recent: Vec<Message>,
}

impl MemoryContext {
    /// Read the profile and the last `limit` messages for `user_id`.
    pub fn gather(
        memory: &ConversationMemory,
        user_id: &str,
        limit: usize,
    ) -> Result<Self, MemoryError> {
        Ok(Self {
            profile: memory.get_profile(user_id)?,
            recent: memory.recent_messages(user_id, limit)?,
        })
    }

    /// Substitute `{profile}` and `{conversation}` in `template` with JSON.
    ///
    /// Substitution is single pass, so placeholder text inside stored values
    /// is left as is.
    pub fn render(&self, template: &str) -> Result<String, serde_json::Error> {
        let profile = serde_json::to_string(&self.profile)?;
        let conversation = serde_json::to_string(&self.recent)?;
        Ok(substitute(
            template,
            &[
                (PROFILE_PLACEHOLDER, profile.as_str()),
                (CONVERSATION_PLACEHOLDER, conversation.as_str()),
            ],
        ))
    }

    /// Short context string reported back to callers: `Profile: {json}`.
    pub fn profile_summary(&self) -> Result<String, serde_json::Error> {
        Ok(format!("Profile: {}", serde_json::to_string(&self.profile)?))
    }
}

fn substitute(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    'scan: while !rest.is_empty() {
        for (placeholder, value) in slots {
            if let Some(tail) = rest.strip_prefix(placeholder) {
                out.push_str(value);
                rest = tail;
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
        }
        rest = chars.as_str();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_SYSTEM_PROMPT, MemoryContext};
    use memoir_rs_memory::{ConversationMemory, ProfileAttributes, Role};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_context_renders_empty_json() {
        let context = MemoryContext::default();
        let prompt = context
            .render("P={profile} C={conversation}")
            .expect("render");
        assert_eq!(prompt, "P={} C=[]");
        assert_eq!(context.profile_summary().expect("summary"), "Profile: {}");
    }

    #[test]
    fn gather_reads_profile_and_window() {
        let memory = ConversationMemory::in_memory();
        for idx in 0..4 {
            memory
                .append_message("u", Role::User, format!("m{idx}"))
                .expect("append");
        }
        let mut profile = ProfileAttributes::new();
        profile.insert("name".to_string(), "dana".to_string());
        memory.update_profile("u", &profile).expect("profile");

        let context = MemoryContext::gather(&memory, "u", 2).expect("gather");
        assert_eq!(context.profile, profile);
        let texts: Vec<&str> = context.recent.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(texts, vec!["m2", "m3"]);
        assert_eq!(
            context.profile_summary().expect("summary"),
            r#"Profile: {"name":"dana"}"#
        );
    }

    #[test]
    fn default_prompt_embeds_conversation_json() {
        let memory = ConversationMemory::in_memory();
        memory.append_message("u", Role::User, "hello").expect("append");
        let context = MemoryContext::gather(&memory, "u", 5).expect("gather");
        let prompt = context.render(DEFAULT_SYSTEM_PROMPT).expect("render");
        assert!(prompt.starts_with("You are an AI assistant with memory.\nUser Profile: {}\n"));
        assert!(prompt.contains(r#""role":"user","content":"hello""#));
        assert!(prompt.ends_with("Respond naturally and use the context when appropriate."));
    }

    #[test]
    fn stored_placeholder_text_is_not_expanded() {
        let mut context = MemoryContext::default();
        context
            .profile
            .insert("note".to_string(), "{conversation}".to_string());
        let prompt = context.render("{profile}|{conversation}").expect("render");
        assert_eq!(prompt, r#"{"note":"{conversation}"}|[]"#);
    }
}
