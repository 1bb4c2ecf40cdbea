//! Task assistant pipeline tests.

use memoir_rs_core::assistant::TIMEOUT_REPLY;
use memoir_rs_config::MemoirConfig;
use memoir_rs_core::{ChatRole, MemoirCoreError, RunStatus, TaskAssistant, TaskStatus};
use memoir_rs_test_utils::{FailingChat, FixedChat, ScriptedChat, SlowChat};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn analyzes_executes_and_summarizes() {
    let chat = ScriptedChat::new([
        "book a table | buy flowers",
        "table booked for 7pm",
        "roses bought",
        "All set for tonight.",
    ]);
    let assistant = TaskAssistant::new(Arc::new(chat.clone()), Duration::from_secs(5));

    let outcome = assistant
        .process_request("Plan a date night")
        .await
        .expect("process");

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.reply, "All set for tonight.");
    assert_eq!(outcome.request, "Plan a date night");
    let tasks: Vec<(&str, TaskStatus, Option<&str>)> = outcome
        .tasks
        .iter()
        .map(|task| (task.name.as_str(), task.status, task.result.as_deref()))
        .collect();
    assert_eq!(
        tasks,
        vec![
            ("book a table", TaskStatus::Completed, Some("table booked for 7pm")),
            ("buy flowers", TaskStatus::Completed, Some("roses bought")),
        ]
    );

    let requests = chat.requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[0][1].content, "Plan a date night");
    assert!(requests[1][0].content.contains("book a table"));
    assert_eq!(requests[1][1].content, "Plan a date night");
    assert!(requests[2][0].content.contains("buy flowers"));
    assert_eq!(requests[2][1].content, "Plan a date night");
    assert_eq!(requests[3][1].role, ChatRole::User);
    assert_eq!(
        requests[3][1].content,
        "Task: book a table\nResult: table booked for 7pm\nTask: buy flowers\nResult: roses bought"
    );
}

#[tokio::test]
async fn blank_analysis_goes_straight_to_summary() {
    let chat = ScriptedChat::new(["  ", "Nothing to do."]);
    let assistant = TaskAssistant::new(Arc::new(chat.clone()), Duration::from_secs(5));
    let outcome = assistant.process_request("hm").await.expect("process");
    assert!(outcome.tasks.is_empty());
    assert_eq!(outcome.reply, "Nothing to do.");
    assert_eq!(chat.requests().len(), 2);
}

#[tokio::test]
async fn timeout_returns_fallback_reply() {
    let chat = SlowChat::new(Duration::from_millis(500), "late");
    let assistant = TaskAssistant::new(Arc::new(chat), Duration::from_millis(20));
    let outcome = assistant.process_request("anything").await.expect("process");
    assert_eq!(outcome.status, RunStatus::TimedOut);
    assert_eq!(outcome.reply, TIMEOUT_REPLY);
    assert!(outcome.tasks.is_empty());
}

#[tokio::test]
async fn chat_failure_is_an_error() {
    let assistant = TaskAssistant::new(Arc::new(FailingChat), Duration::from_secs(5));
    let err = assistant
        .process_request("anything")
        .await
        .expect_err("fails");
    assert!(matches!(err, MemoirCoreError::Chat(_)));
}

#[tokio::test]
async fn config_sets_request_bound() {
    let config = MemoirConfig::load_from_str("{ assistant: { request_timeout_secs: 1 } }")
        .expect("config");
    let chat = SlowChat::new(Duration::from_secs(3), "late");
    let assistant = TaskAssistant::from_config(Arc::new(chat), &config);
    assert_eq!(assistant.timeout(), Duration::from_secs(1));

    let outcome = assistant.process_request("anything").await.expect("process");
    assert_eq!(outcome.status, RunStatus::TimedOut);

    let defaults =
        TaskAssistant::from_config(Arc::new(FixedChat::new("x")), &MemoirConfig::default());
    assert_eq!(defaults.timeout(), Duration::from_secs(30));
}
