//! Parsing for `task1|task2|task3` task lists produced by the analyzer.

/// Delimiter the analyzer prompt asks the model to use.
pub const TASK_DELIMITER: char = '|';

/// Split a task list on `|`, trimming entries and dropping empty ones.
pub fn parse_task_list(text: &str) -> Vec<String> {
    text.split(TASK_DELIMITER)
        .map(str::trim)
        .filter(|task| !task.is_empty())
        .map(str::to_string)
        .collect()
}
