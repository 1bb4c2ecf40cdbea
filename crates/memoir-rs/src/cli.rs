//! Command-line surface over conversation memory.
//!
//! Every command prints a JSON document so the tool composes with `jq`.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use log::debug;
use memoir_rs_config::MemoirConfig;
use memoir_rs_core::open_memory;
use memoir_rs_memory::ProfileAttributes;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

/// Command-line options for the `memoir` binary.
#[derive(Debug, Parser)]
#[command(name = "memoir", version, about = "Inspect and edit conversation memory")]
pub struct Cli {
    /// Optional path to a memoir.json5 config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Append a message (role is `user` or `assistant`)
    Append {
        user: String,
        role: String,
        content: String,
    },
    /// Print the most recent messages, oldest first
    Recent {
        user: String,
        /// Window size; defaults to `memory.recent_limit`
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the stored profile
    Profile { user: String },
    /// Merge `key=value` pairs into the profile
    SetProfile {
        user: String,
        #[arg(required = true)]
        pairs: Vec<String>,
    },
    /// Run the name heuristic on a user message and store the result
    Observe { user: String, text: String },
}

/// Execute `cli` with relative store paths resolved against `base_dir`.
pub fn run(cli: Cli, base_dir: &Path) -> anyhow::Result<Value> {
    let config = load_config(cli.config.as_deref(), base_dir)?;
    let memory =
        open_memory(&config.memory, base_dir).context("failed to open conversation store")?;

    let output = match cli.command {
        Command::Append {
            user,
            role,
            content,
        } => {
            let message = memory
                .append_message_str(&user, &role, content)
                .context("failed to append message")?;
            serde_json::to_value(message)?
        }
        Command::Recent { user, limit } => {
            let limit = limit.unwrap_or(config.memory.recent_limit);
            let messages = memory
                .recent_messages(&user, limit)
                .context("failed to read recent messages")?;
            serde_json::to_value(messages)?
        }
        Command::Profile { user } => {
            serde_json::to_value(memory.get_profile(&user).context("failed to read profile")?)?
        }
        Command::SetProfile { user, pairs } => {
            let attributes = parse_pairs(&pairs)?;
            memory
                .update_profile(&user, &attributes)
                .context("failed to update profile")?;
            serde_json::to_value(memory.get_profile(&user).context("failed to read profile")?)?
        }
        Command::Observe { user, text } => {
            let name = memory
                .observe_user_message(&user, &text)
                .context("failed to observe message")?;
            json!({ "name": name })
        }
    };
    Ok(output)
}

fn load_config(path: Option<&Path>, cwd: &Path) -> anyhow::Result<MemoirConfig> {
    if let Some(path) = path {
        return MemoirConfig::load_from_path(path).context("failed to load config");
    }
    let layered = MemoirConfig::load_layered(cwd).context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    Ok(layered.config)
}

/// Parse `key=value` arguments; values may contain `=`.
pub fn parse_pairs(pairs: &[String]) -> anyhow::Result<ProfileAttributes> {
    let mut attributes = ProfileAttributes::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("expected key=value, got `{pair}`");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("empty key in `{pair}`");
        }
        attributes.insert(key.to_string(), value.to_string());
    }
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::parse_pairs;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_pairs_and_keeps_equals_in_values() {
        let pairs = vec!["name=Alice".to_string(), "note=a=b".to_string()];
        let attributes = parse_pairs(&pairs).expect("pairs");
        assert_eq!(attributes.get("name").map(String::as_str), Some("Alice"));
        assert_eq!(attributes.get("note").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(parse_pairs(&["name".to_string()]).is_err());
        assert!(parse_pairs(&["=x".to_string()]).is_err());
    }
}
