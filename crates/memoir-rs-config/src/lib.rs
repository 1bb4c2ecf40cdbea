//! `memoir.json5` schema and layered loading.
//!
//! Layers (system, user, cwd, runtime) are merged as JSON values and then
//! decoded and validated as one [`MemoirConfig`].

mod error;
mod loader;
mod model;

pub use error::ConfigError;
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
pub use model::*;
