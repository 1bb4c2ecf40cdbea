//! Test helpers shared across Memoir crates.

pub mod chat;
pub mod store;

pub use chat::{FailingChat, FixedChat, RecordingChat, ScriptedChat, SlowChat};
pub use store::FailingStore;
