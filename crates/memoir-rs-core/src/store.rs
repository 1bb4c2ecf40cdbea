//! Build a conversation store from `MemoryConfig`.

use crate::error::MemoirCoreError;
use log::info;
use memoir_rs_config::{MemoryBackend, MemoryConfig};
use memoir_rs_memory::{
    ConversationMemory, ConversationStore, InMemoryStore, JsonlStore, SqliteStore,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// SQLite file name used when `memory.path` is unset.
pub const DEFAULT_SQLITE_PATH: &str = "memory.db";
/// JSONL directory name used when `memory.path` is unset.
pub const DEFAULT_JSONL_DIR: &str = "chat_history";

/// Open the configured backend. Relative paths resolve against `base_dir`.
pub fn open_store(
    config: &MemoryConfig,
    base_dir: &Path,
) -> Result<Arc<dyn ConversationStore>, MemoirCoreError> {
    let store: Arc<dyn ConversationStore> = match config.backend {
        MemoryBackend::InMemory => {
            info!("opening in-memory conversation store");
            Arc::new(InMemoryStore::new())
        }
        MemoryBackend::Jsonl => {
            let path = resolve(config, base_dir, DEFAULT_JSONL_DIR);
            info!("opening jsonl conversation store (path={})", path.display());
            Arc::new(JsonlStore::open(path)?)
        }
        MemoryBackend::Sqlite => {
            let path = resolve(config, base_dir, DEFAULT_SQLITE_PATH);
            info!("opening sqlite conversation store (path={})", path.display());
            Arc::new(SqliteStore::open(path)?)
        }
    };
    Ok(store)
}

/// [`open_store`] wrapped in a [`ConversationMemory`].
pub fn open_memory(
    config: &MemoryConfig,
    base_dir: &Path,
) -> Result<ConversationMemory, MemoirCoreError> {
    Ok(ConversationMemory::new(open_store(config, base_dir)?))
}

fn resolve(config: &MemoryConfig, base_dir: &Path, fallback: &str) -> PathBuf {
    let path = PathBuf::from(config.path.as_deref().unwrap_or(fallback));
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_JSONL_DIR, DEFAULT_SQLITE_PATH, open_memory};
    use memoir_rs_config::{MemoryBackend, MemoryConfig};
    use memoir_rs_memory::Role;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn config(backend: MemoryBackend, path: Option<&str>) -> MemoryConfig {
        MemoryConfig {
            backend,
            path: path.map(str::to_string),
            ..MemoryConfig::default()
        }
    }

    #[test]
    fn default_paths_land_under_base_dir() {
        let temp = tempdir().expect("tempdir");
        let memory =
            open_memory(&config(MemoryBackend::Sqlite, None), temp.path()).expect("sqlite");
        memory.append_message("u", Role::User, "hi").expect("append");
        assert!(temp.path().join(DEFAULT_SQLITE_PATH).exists());

        open_memory(&config(MemoryBackend::Jsonl, None), temp.path()).expect("jsonl");
        assert!(temp.path().join(DEFAULT_JSONL_DIR).is_dir());
    }

    #[test]
    fn explicit_paths_are_honored() {
        let temp = tempdir().expect("tempdir");
        let absolute = temp.path().join("abs").join("chat.db");
        let absolute_str = absolute.to_string_lossy().to_string();
        open_memory(
            &config(MemoryBackend::Sqlite, Some(&absolute_str)),
            temp.path(),
        )
        .expect("absolute");
        assert!(absolute.exists());

        open_memory(&config(MemoryBackend::Jsonl, Some("nested/log")), temp.path())
            .expect("relative");
        assert!(temp.path().join("nested").join("log").is_dir());
    }

    #[test]
    fn in_memory_backend_touches_nothing() {
        let temp = tempdir().expect("tempdir");
        let memory =
            open_memory(&config(MemoryBackend::InMemory, None), temp.path()).expect("memory");
        memory.append_message("u", Role::User, "hi").expect("append");
        assert_eq!(
            std::fs::read_dir(temp.path()).expect("read dir").count(),
            0
        );
    }
}
