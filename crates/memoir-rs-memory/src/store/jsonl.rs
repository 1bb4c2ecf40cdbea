//! JSONL-backed store: an append-only message log plus a profile snapshot.
//!
//! Layout under the root directory:
//! - `messages.jsonl`: one [`MessageLine`] per appended message
//! - `profiles.json`: user id -> [`ProfileEntry`], rewritten atomically
//!
//! Every acknowledged line ends in `\n`. A trailing fragment without one was
//! never acknowledged and is cut off on open, so later appends start on a
//! fresh line.

use super::ConversationStore;
use crate::error::MemoryError;
use crate::model::{Message, ProfileAttributes, Role, recent_window};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const MESSAGES_FILE: &str = "messages.jsonl";
const PROFILES_FILE: &str = "profiles.json";
const PROFILES_TEMP_FILE: &str = "profiles.json.tmp";

/// Persisted message line.
#[derive(Debug, Serialize, Deserialize)]
struct MessageLine {
    user_id: String,
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
}

/// Persisted profile entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileEntry {
    attributes: ProfileAttributes,
    last_updated: DateTime<Utc>,
}

/// File-backed store replayed into an in-process index on open.
#[derive(Debug)]
pub struct JsonlStore {
    root: PathBuf,
    conversations: RwLock<HashMap<String, Vec<Message>>>,
    profiles: RwLock<HashMap<String, ProfileEntry>>,
    /// Serialize write access to the files.
    write_lock: Mutex<()>,
}

impl JsonlStore {
    /// Open (or create) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        let conversations = load_messages(&root.join(MESSAGES_FILE))?;
        let profiles = load_profiles(&root.join(PROFILES_FILE))?;
        info!(
            "initialized JSONL conversation store (root={}, users={}, profiles={})",
            root.display(),
            conversations.len(),
            profiles.len()
        );
        Ok(Self {
            root,
            conversations: RwLock::new(conversations),
            profiles: RwLock::new(profiles),
            write_lock: Mutex::new(()),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rewrite the profile snapshot via a temp file and rename.
    fn write_profiles(&self, profiles: &HashMap<String, ProfileEntry>) -> Result<(), MemoryError> {
        let path = self.root.join(PROFILES_FILE);
        let temp_path = self.root.join(PROFILES_TEMP_FILE);
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            let serialized = serde_json::to_string_pretty(profiles)?;
            file.write_all(serialized.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(temp_path, path)?;
        Ok(())
    }
}

impl ConversationStore for JsonlStore {
    /// Append a message line and sync it before updating the index.
    ///
    /// If the write or the sync fails, the log is truncated back to its
    /// previous length so a failed append does not reappear after a restart.
    fn append_message(&self, user_id: &str, message: &Message) -> Result<(), MemoryError> {
        let _guard = self.write_lock.lock();
        let line = serde_json::to_string(&MessageLine {
            user_id: user_id.to_string(),
            role: message.role,
            content: message.content.clone(),
            created_at: message.created_at,
        })?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.root.join(MESSAGES_FILE))?;
        let committed = file.metadata()?.len();
        if let Err(err) = write_synced_line(&mut file, &line) {
            if let Err(rollback) = file.set_len(committed) {
                warn!(
                    "failed to roll back message log (user_id={}, len={}): {rollback}",
                    user_id, committed
                );
            }
            return Err(err);
        }
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
        let _guard = self.write_lock.lock();
        let mut next = self.profiles.read().clone();
        let entry = next
            .entry(user_id.to_string())
            .or_insert_with(|| ProfileEntry {
                attributes: ProfileAttributes::new(),
                last_updated: Utc::now(),
            });
        entry.attributes.extend(attributes.clone());
        entry.last_updated = Utc::now();
        self.write_profiles(&next)?;
        debug!(
            "profile snapshot written (user_id={}, profiles={})",
            user_id,
            next.len()
        );
        *self.profiles.write() = next;
        Ok(())
    }

    fn load_profile(&self, user_id: &str) -> Result<ProfileAttributes, MemoryError> {
        Ok(self
            .profiles
            .read()
            .get(user_id)
            .map(|entry| entry.attributes.clone())
            .unwrap_or_default())
    }
}

fn write_synced_line(file: &mut File, line: &str) -> Result<(), MemoryError> {
    writeln!(file, "{line}")?;
    file.sync_data()?;
    Ok(())
}

/// Replay the message log; lines that fail to parse are skipped.
///
/// An unterminated final fragment is truncated away before replay.
fn load_messages(path: &Path) -> Result<HashMap<String, Vec<Message>>, MemoryError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(err) => return Err(MemoryError::Io(err)),
    };
    let complete = bytes
        .iter()
        .rposition(|byte| *byte == b'\n')
        .map_or(0, |idx| idx + 1);
    if complete < bytes.len() {
        warn!(
            "truncating unterminated message log tail (path={}, bytes={})",
            path.display(),
            bytes.len() - complete
        );
        let file = OpenOptions::new().write(true).open(path)?;
        file.set_len(complete as u64)?;
        file.sync_all()?;
    }

    let mut conversations: HashMap<String, Vec<Message>> = HashMap::new();
    for (index, line) in bytes[..complete].split(|byte| *byte == b'\n').enumerate() {
        if line.trim_ascii().is_empty() {
            continue;
        }
        match serde_json::from_slice::<MessageLine>(line) {
            Ok(record) => conversations
                .entry(record.user_id)
                .or_default()
                .push(Message {
                    role: record.role,
                    content: record.content,
                    created_at: record.created_at,
                }),
            Err(err) => {
                warn!(
                    "invalid message line ignored (path={}, line={}): {err}",
                    path.display(),
                    index + 1
                );
            }
        }
    }
    Ok(conversations)
}

fn load_profiles(path: &Path) -> Result<HashMap<String, ProfileEntry>, MemoryError> {
    match fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(HashMap::new()),
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
        Err(err) => Err(MemoryError::Io(err)),
    }
}
