use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A dated to-do item, optionally broken into subtasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique id assigned by the repository
    pub id: i64,
    /// Trimmed, non-empty description
    pub text: String,
    /// Calendar day the task belongs to ("YYYY-MM-DD" when serialized)
    pub date: NaiveDate,
    /// Set directly for leaf tasks, derived from subtasks otherwise
    pub completed: bool,
    /// Owned subtasks, ordered by id
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    pub fn new(id: i64, text: String, date: NaiveDate) -> Self {
        Self {
            id,
            text,
            date,
            completed: false,
            subtasks: Vec::new(),
        }
    }

    pub fn has_subtasks(&self) -> bool {
        !self.subtasks.is_empty()
    }

    /// Number of subtasks marked complete
    pub fn completed_subtask_count(&self) -> usize {
        self.subtasks.iter().filter(|st| st.completed).count()
    }

    /// Completion implied by the subtasks, or None for a leaf task
    pub fn derived_completion(&self) -> Option<bool> {
        if self.subtasks.is_empty() {
            None
        } else {
            Some(self.subtasks.iter().all(|st| st.completed))
        }
    }

    pub fn subtask(&self, id: i64) -> Option<&Subtask> {
        self.subtasks.iter().find(|st| st.id == id)
    }
}

/// A child item of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: i64,
    /// Id of the owning task
    pub task_id: i64,
    pub text: String,
    pub completed: bool,
}

impl Subtask {
    pub fn new(id: i64, task_id: i64, text: String) -> Self {
        Self {
            id,
            task_id,
            text,
            completed: false,
        }
    }
}

/// Partial update for a task; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub date: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn date(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none() && self.date.is_none()
    }
}

/// Partial update for a subtask
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtaskPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl SubtaskPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }
}
