//! Three-phase task assistant: analyze a request into tasks, execute each
//! task with the chat model, then summarize the results.

use crate::chat::{ChatMessage, ChatModel};
use crate::error::MemoirCoreError;
use crate::tasks::parse_task_list;
use log::{debug, info, warn};
use memoir_rs_config::MemoirConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Reply returned when the whole request exceeds its time bound.
pub const TIMEOUT_REPLY: &str = "Request timed out. Please try again.";

const ANALYZE_PROMPT: &str = "You are a task analyzer.\n\
Determine what tasks need to be done to fulfill this request.\n\
Return tasks in this format: task1|task2|task3";

const SUMMARIZE_PROMPT: &str = "Summarize these task results into a coherent response:";

/// Progress of a single [`Task`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Extracted by the analyzer, not yet executed.
    Pending,
    /// Executed; `result` holds the model's output.
    Completed,
}

/// One unit of work extracted from a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Task label as returned by the analyzer.
    pub name: String,
    /// Current progress.
    pub status: TaskStatus,
    /// Execution output, set once the task completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl Task {
    fn pending(name: String) -> Self {
        Self {
            name,
            status: TaskStatus::Pending,
            result: None,
        }
    }
}

/// How a [`TaskAssistant::process_request`] run ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// All three phases finished.
    Completed,
    /// The time bound elapsed; tasks are dropped and the reply is
    /// [`TIMEOUT_REPLY`].
    TimedOut,
}

/// Outcome of [`TaskAssistant::process_request`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssistantOutcome {
    /// The request as received.
    pub request: String,
    /// Tasks in analyzer order; empty on timeout.
    pub tasks: Vec<Task>,
    /// Summary reply, or [`TIMEOUT_REPLY`].
    pub reply: String,
    /// Whether the run finished or timed out.
    pub status: RunStatus,
}

/// Stateless assistant that decomposes a request before answering.
pub struct TaskAssistant {
    chat: Arc<dyn ChatModel>,
    timeout: Duration,
}

impl TaskAssistant {
    /// Create an assistant whose whole run is bounded by `timeout`.
    pub fn new(chat: Arc<dyn ChatModel>, timeout: Duration) -> Self {
        Self { chat, timeout }
    }

    /// Create an assistant bounded by `assistant.request_timeout_secs`.
    pub fn from_config(chat: Arc<dyn ChatModel>, config: &MemoirConfig) -> Self {
        Self::new(chat, Duration::from_secs(config.assistant.request_timeout_secs))
    }

    /// Time bound applied to a whole request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run analyze, execute and summarize under one time bound.
    ///
    /// A timeout is reported in the outcome, not as an error. Chat failures
    /// are returned as errors.
    pub async fn process_request(
        &self,
        request: &str,
    ) -> Result<AssistantOutcome, MemoirCoreError> {
        info!("task assistant request (len={})", request.len());
        match tokio::time::timeout(self.timeout, self.run(request)).await {
            Ok(result) => {
                let (tasks, reply) = result?;
                Ok(AssistantOutcome {
                    request: request.to_string(),
                    tasks,
                    reply,
                    status: RunStatus::Completed,
                })
            }
            Err(_) => {
                warn!("task assistant timed out after {:?}", self.timeout);
                Ok(AssistantOutcome {
                    request: request.to_string(),
                    tasks: Vec::new(),
                    reply: TIMEOUT_REPLY.to_string(),
                    status: RunStatus::TimedOut,
                })
            }
        }
    }

    async fn run(&self, request: &str) -> Result<(Vec<Task>, String), MemoirCoreError> {
        let mut tasks = self.analyze(request).await?;
        debug!("task assistant analyzed (tasks={})", tasks.len());
        for task in &mut tasks {
            self.execute(request, task).await?;
        }
        let reply = self.summarize(&tasks).await?;
        Ok((tasks, reply))
    }

    async fn analyze(&self, request: &str) -> Result<Vec<Task>, MemoirCoreError> {
        let text = self
            .chat
            .chat(&[ChatMessage::system(ANALYZE_PROMPT), ChatMessage::user(request)])
            .await?;
        Ok(parse_task_list(&text)
            .into_iter()
            .map(Task::pending)
            .collect())
    }

    /// Run one task; the model sees the task in the system prompt and the
    /// original request as the user message.
    async fn execute(&self, request: &str, task: &mut Task) -> Result<(), MemoirCoreError> {
        let prompt = format!(
            "You are executing this task: {}\nProvide the result of executing this task.",
            task.name
        );
        let result = self
            .chat
            .chat(&[ChatMessage::system(prompt), ChatMessage::user(request)])
            .await?;
        task.result = Some(result);
        task.status = TaskStatus::Completed;
        Ok(())
    }

    async fn summarize(&self, tasks: &[Task]) -> Result<String, MemoirCoreError> {
        let results = tasks
            .iter()
            .map(|task| {
                format!(
                    "Task: {}\nResult: {}",
                    task.name,
                    task.result.as_deref().unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(self
            .chat
            .chat(&[ChatMessage::system(SUMMARIZE_PROMPT), ChatMessage::user(results)])
            .await?)
    }
}
