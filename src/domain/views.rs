use super::dates;
use super::task::Task;
use chrono::NaiveDate;

/// A flattened row for rendering a task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRow {
    /// Depth in the tree (0 = task, 1 = subtask)
    pub depth: usize,
    /// Whether this is the last subtask of its parent
    pub is_last: bool,
    /// Index into the slice that was flattened
    pub task_index: usize,
    /// Subtask index (None for the task row itself)
    pub subtask_index: Option<usize>,
}

/// Counters and flags shown on the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HomeSummary {
    pub completed_count: usize,
    pub uncompleted_count: usize,
    /// Some task for today is still open
    pub has_pending_today: bool,
    /// An incomplete task is left over from yesterday
    pub has_leftovers: bool,
    /// "Delete all completed" has something to remove
    pub can_clear_completed: bool,
}

/// Tasks dated exactly `today`
pub fn today_tasks(tasks: &[Task], today: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|t| t.date == today).collect()
}

/// Incomplete tasks dated the calendar day before `today`
pub fn leftover_tasks(tasks: &[Task], today: NaiveDate) -> Vec<&Task> {
    let Some(yesterday) = dates::yesterday(today) else {
        return Vec::new();
    };
    tasks
        .iter()
        .filter(|t| t.date == yesterday && !t.completed)
        .collect()
}

/// Tasks dated strictly after `today`
pub fn future_tasks(tasks: &[Task], today: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|t| t.date > today).collect()
}

/// "done/total" for tasks with subtasks
pub fn progress_label(task: &Task) -> Option<String> {
    if task.subtasks.is_empty() {
        return None;
    }
    Some(format!(
        "{}/{}",
        task.completed_subtask_count(),
        task.subtasks.len()
    ))
}

/// Task text with the progress label appended, e.g. "Buy milk (1/2)"
pub fn display_title(task: &Task) -> String {
    match progress_label(task) {
        Some(progress) => format!("{} ({})", task.text, progress),
        None => task.text.clone(),
    }
}

pub fn uncompleted<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
    tasks.into_iter().filter(|t| !t.completed).collect()
}

pub fn completed<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
    tasks.into_iter().filter(|t| t.completed).collect()
}

/// Summarize today's tasks for the home screen
pub fn home_summary(tasks: &[Task], today: NaiveDate) -> HomeSummary {
    let todays = today_tasks(tasks, today);
    let completed_count = todays.iter().filter(|t| t.completed).count();
    let uncompleted_count = todays.len() - completed_count;

    HomeSummary {
        completed_count,
        uncompleted_count,
        has_pending_today: uncompleted_count > 0,
        has_leftovers: !leftover_tasks(tasks, today).is_empty(),
        can_clear_completed: completed_count > 0,
    }
}

/// Flatten tasks and their subtasks into rows, parents first
pub fn flatten_tasks(tasks: &[&Task]) -> Vec<FlatRow> {
    let mut rows = Vec::new();

    for (task_idx, task) in tasks.iter().enumerate() {
        rows.push(FlatRow {
            depth: 0,
            is_last: false,
            task_index: task_idx,
            subtask_index: None,
        });

        let subtask_count = task.subtasks.len();
        for st_idx in 0..subtask_count {
            rows.push(FlatRow {
                depth: 1,
                is_last: st_idx == subtask_count - 1,
                task_index: task_idx,
                subtask_index: Some(st_idx),
            });
        }
    }

    rows
}

/// Checkbox marker for a completion flag
pub fn check_mark(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Get tree connector for subtasks
pub fn tree_connector(is_last: bool) -> &'static str {
    if is_last {
        "└─"
    } else {
        "├─"
    }
}
