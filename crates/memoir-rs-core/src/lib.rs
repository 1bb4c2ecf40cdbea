//! Core conversation primitives for Memoir.
//!
//! This crate wires conversation memory to a chat model: context rendering,
//! the memory-aware turn, the task assistant pipeline, and store selection
//! from config.

pub mod agent;
pub mod assistant;
pub mod chat;
pub mod context;
pub mod error;
pub mod store;
pub mod tasks;

pub use agent::{AgentSettings, MemoryAgent, TurnOutcome};
pub use assistant::{AssistantOutcome, RunStatus, Task, TaskAssistant, TaskStatus};
/// Chat model seam implemented by LLM providers.
pub use chat::{ChatError, ChatMessage, ChatModel, ChatRole};
pub use context::{DEFAULT_SYSTEM_PROMPT, MemoryContext};
pub use error::MemoirCoreError;
pub use store::{open_memory, open_store};
pub use tasks::parse_task_list;
