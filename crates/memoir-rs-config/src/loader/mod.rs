//! Layered configuration loader.
//!
//! Discovers configuration layers (system/user/cwd/runtime), merges them in
//! precedence order, and produces a validated `MemoirConfig`.

mod layer_io;
mod merge;
mod utils;


use crate::{
    CONVERSATION_PLACEHOLDER, ConfigError, MemoirConfig, MemoryBackend, PROFILE_PLACEHOLDER,
};
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config filename in local layers.
const DEFAULT_CONFIG_FILE: &str = "memoir.json5";
/// Default config directory under the user's home.
const DEFAULT_CONFIG_DIR: &str = ".memoir";

#[cfg(unix)]
/// Default system config path on Unix.
const SYSTEM_CONFIG_PATH: &str = "/etc/memoir/memoir.json5";
#[cfg(windows)]
/// Default system config path on Windows.
const SYSTEM_CONFIG_PATH: &str = "C:\\ProgramData\\memoir\\memoir.json5";

/// Effective config plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated config.
    pub config: MemoirConfig,
    /// Metadata for each layer that was loaded.
    pub layers: Vec<ConfigLayer>,
}

/// Origin for a single config layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// System-wide configuration.
    System,
    /// User-specific configuration.
    User,
    /// Current working directory configuration.
    Cwd,
    /// Runtime overrides (highest precedence).
    Runtime,
}

/// Metadata about a loaded config layer.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    /// Layer origin.
    pub source: ConfigLayerSource,
    /// Location on disk.
    pub path: PathBuf,
}

/// Options controlling layered config discovery and overrides.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Working directory used to find the cwd layer.
    pub cwd: PathBuf,
    /// Optional system config path (defaults to `/etc/memoir/memoir.json5` on Unix).
    pub system_config_path: Option<PathBuf>,
    /// Optional user config path (defaults to `~/.memoir/memoir.json5`).
    pub user_config_path: Option<PathBuf>,
    /// Runtime override config paths applied last.
    pub runtime_paths: Vec<PathBuf>,
}

impl LayeredConfigOptions {
    /// Create options with default layer locations for the provided cwd.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            system_config_path: layer_io::default_system_config_path(),
            user_config_path: layer_io::default_user_config_path(),
            runtime_paths: Vec::new(),
        }
    }

    /// Add a runtime override config path that is applied last.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl MemoirConfig {
    /// Load a single config from a path (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        let value: Value = json5::from_str(&contents)?;
        config_from_value(value)
    }

    /// Load a single config from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        config_from_value(value)
    }

    /// Load a layered config stack using the default layer locations.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        info!(
            "loading layered config with defaults (cwd={})",
            cwd.as_ref().display()
        );
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Load a layered config stack using explicit layer locations.
    ///
    /// Layer precedence (low -> high): system, user, cwd, runtime overrides.
    /// Missing optional layers are skipped; runtime layers must exist.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let cwd = utils::normalize_path(&options.cwd)?;
        debug!("normalized cwd for config load: {}", cwd.display());
        let mut layers = Vec::new();
        let mut merged = Value::Object(serde_json::Map::new());
        let mut seen_paths = HashSet::new();

        let optional_layers = [
            (
                ConfigLayerSource::System,
                options.system_config_path.clone(),
            ),
            (ConfigLayerSource::User, options.user_config_path.clone()),
            (ConfigLayerSource::Cwd, Some(cwd.join(DEFAULT_CONFIG_FILE))),
        ];
        for (source, path) in optional_layers {
            let Some(path) = path else {
                continue;
            };
            if !seen_paths.insert(utils::dedup_key(&path)) {
                debug!(
                    "skipping duplicate layer (source={:?}, path={})",
                    source,
                    path.display()
                );
                continue;
            }
            if let Some(value) = layer_io::load_optional_layer(source, &path)? {
                merge::merge_json_values(&mut merged, &value);
                layers.push(ConfigLayer { source, path });
            }
        }

        for runtime_path in &options.runtime_paths {
            let value = layer_io::load_required_layer(ConfigLayerSource::Runtime, runtime_path)?;
            merge::merge_json_values(&mut merged, &value);
            layers.push(ConfigLayer {
                source: ConfigLayerSource::Runtime,
                path: runtime_path.clone(),
            });
        }

        let config = config_from_value(merged)?;
        info!("layered config loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory.recent_limit == 0 {
            return Err(invalid("memory.recent_limit", "must be greater than zero"));
        }
        if self.memory.backend == MemoryBackend::InMemory && self.memory.path.is_some() {
            return Err(invalid(
                "memory.path",
                "in_memory backend does not take a path",
            ));
        }
        if self
            .memory
            .path
            .as_deref()
            .is_some_and(|path| path.trim().is_empty())
        {
            return Err(invalid("memory.path", "must not be empty"));
        }
        if self.assistant.request_timeout_secs == 0 {
            return Err(invalid(
                "assistant.request_timeout_secs",
                "must be greater than zero",
            ));
        }
        if let Some(template) = &self.assistant.system_prompt {
            for placeholder in [PROFILE_PLACEHOLDER, CONVERSATION_PLACEHOLDER] {
                if !template.contains(placeholder) {
                    return Err(invalid(
                        "assistant.system_prompt",
                        &format!("missing {placeholder} placeholder"),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn invalid(path: &str, message: &str) -> ConfigError {
    ConfigError::InvalidField {
        path: path.to_string(),
        message: message.to_string(),
    }
}

fn config_from_value(value: Value) -> Result<MemoirConfig, ConfigError> {
    let config: MemoirConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
