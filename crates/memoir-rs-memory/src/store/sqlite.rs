//! SQLite-backed store.
//!
//! # Tables
//!
//! - `messages(id, user_id, role, content, timestamp)`: append-only log, `id`
//!   is the insertion-ordered identity
//! - `profiles(user_id PRIMARY KEY, profile_data, last_updated)`:
//!   `profile_data` holds a JSON object

use super::ConversationStore;
use crate::error::MemoryError;
use crate::model::{Message, ProfileAttributes, Role};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    role TEXT NOT NULL,
    content TEXT NOT NULL,
    timestamp TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_messages_user ON messages(user_id, id);
CREATE TABLE IF NOT EXISTS profiles (
    user_id TEXT PRIMARY KEY,
    profile_data TEXT NOT NULL,
    last_updated TEXT NOT NULL
);
";

/// Thread-safe SQLite store; one connection guarded by a mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open or create a database file, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        let journal_mode: String =
            conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.pragma_update(None, "synchronous", "FULL")?;
        conn.execute_batch(SCHEMA)?;
        info!(
            "initialized SQLite conversation store (path={}, journal_mode={})",
            path.display(),
            journal_mode
        );
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, MemoryError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        debug!("initialized in-memory SQLite conversation store");
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Database file path, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl ConversationStore for SqliteStore {
    fn append_message(&self, user_id: &str, message: &Message) -> Result<(), MemoryError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO messages (user_id, role, content, timestamp) VALUES (?1, ?2, ?3, ?4)",
            params![
                user_id,
                message.role.as_str(),
                message.content,
                format_timestamp(message.created_at)
            ],
        )?;
        Ok(())
    }

    /// Select newest-first for the limit, then reverse to chronological.
    fn recent_messages(&self, user_id: &str, limit: usize) -> Result<Vec<Message>, MemoryError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT role, content, timestamp FROM messages
             WHERE user_id = ?1
             ORDER BY id DESC
             LIMIT ?2",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![user_id, limit], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut messages = rows
            .into_iter()
            .map(|(role, content, timestamp)| {
                let role = role
                    .parse::<Role>()
                    .map_err(|_| MemoryError::InvalidRecord(format!("unknown role `{role}`")))?;
                Ok(Message {
                    role,
                    content,
                    created_at: parse_timestamp(&timestamp)?,
                })
            })
            .collect::<Result<Vec<_>, MemoryError>>()?;
        messages.reverse();
        Ok(messages)
    }

    /// Read, merge, and upsert the profile inside one transaction.
    fn merge_profile(
        &self,
        user_id: &str,
        attributes: &ProfileAttributes,
    ) -> Result<(), MemoryError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let mut profile = read_profile(&tx, user_id)?;
        profile.extend(attributes.clone());
        tx.execute(
            "INSERT INTO profiles (user_id, profile_data, last_updated) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET
                profile_data = excluded.profile_data,
                last_updated = excluded.last_updated",
            params![
                user_id,
                serde_json::to_string(&profile)?,
                format_timestamp(Utc::now())
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn load_profile(&self, user_id: &str) -> Result<ProfileAttributes, MemoryError> {
        let conn = self.conn.lock();
        read_profile(&conn, user_id)
    }
}

fn read_profile(conn: &Connection, user_id: &str) -> Result<ProfileAttributes, MemoryError> {
    let data: Option<String> = conn
        .query_row(
            "SELECT profile_data FROM profiles WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )
        .optional()?;
    match data {
        Some(data) => Ok(serde_json::from_str(&data)?),
        None => Ok(ProfileAttributes::new()),
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, MemoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|err| MemoryError::InvalidRecord(format!("bad timestamp `{value}`: {err}")))
}
