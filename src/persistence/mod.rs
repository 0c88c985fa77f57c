pub mod files;
pub mod json;
pub mod memory;
pub mod sqlite;

#[cfg(test)]
mod conformance;

pub use files::{atomic_write, ensure_dir, get_data_dir, init_local_data_dir, read_file};
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::domain::{Subtask, Task};
use crate::error::StoreResult;
use chrono::NaiveDate;

/// Date predicate for selecting tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    All,
    On(NaiveDate),
    After(NaiveDate),
}

impl DateFilter {
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            DateFilter::All => true,
            DateFilter::On(d) => date == *d,
            DateFilter::After(d) => date > *d,
        }
    }
}

/// Persistent collection of tasks and subtasks.
///
/// Reads return tasks ordered by id with their subtasks nested, also ordered
/// by id. Update and delete methods report whether a record matched.
/// Deleting a task removes its subtasks.
pub trait EntityStore {
    fn load_tasks(&self, filter: DateFilter) -> StoreResult<Vec<Task>>;

    fn find_task(&self, id: i64) -> StoreResult<Option<Task>>;

    /// Insert the task row; `task.subtasks` is ignored
    fn insert_task(&mut self, task: &Task) -> StoreResult<()>;

    /// Overwrite text, date and completion; `task.subtasks` is ignored
    fn update_task(&mut self, task: &Task) -> StoreResult<bool>;

    fn delete_task(&mut self, id: i64) -> StoreResult<bool>;

    fn find_subtask(&self, id: i64) -> StoreResult<Option<Subtask>>;

    /// Returns false when the owning task does not exist
    fn insert_subtask(&mut self, subtask: &Subtask) -> StoreResult<bool>;

    fn update_subtask(&mut self, subtask: &Subtask) -> StoreResult<bool>;

    fn delete_subtask(&mut self, id: i64) -> StoreResult<bool>;

    /// Set every subtask of a task to `completed`, returning how many matched
    fn set_all_subtasks_completed(&mut self, task_id: i64, completed: bool) -> StoreResult<usize>;

    /// Largest task or subtask id ever stored, if any
    fn max_id(&self) -> StoreResult<Option<i64>>;

    /// Cheap read proving the store is reachable
    fn health_check(&self) -> StoreResult<()> {
        self.max_id().map(|_| ())
    }
}

impl<S: EntityStore + ?Sized> EntityStore for Box<S> {
    fn load_tasks(&self, filter: DateFilter) -> StoreResult<Vec<Task>> {
        (**self).load_tasks(filter)
    }

    fn find_task(&self, id: i64) -> StoreResult<Option<Task>> {
        (**self).find_task(id)
    }

    fn insert_task(&mut self, task: &Task) -> StoreResult<()> {
        (**self).insert_task(task)
    }

    fn update_task(&mut self, task: &Task) -> StoreResult<bool> {
        (**self).update_task(task)
    }

    fn delete_task(&mut self, id: i64) -> StoreResult<bool> {
        (**self).delete_task(id)
    }

    fn find_subtask(&self, id: i64) -> StoreResult<Option<Subtask>> {
        (**self).find_subtask(id)
    }

    fn insert_subtask(&mut self, subtask: &Subtask) -> StoreResult<bool> {
        (**self).insert_subtask(subtask)
    }

    fn update_subtask(&mut self, subtask: &Subtask) -> StoreResult<bool> {
        (**self).update_subtask(subtask)
    }

    fn delete_subtask(&mut self, id: i64) -> StoreResult<bool> {
        (**self).delete_subtask(id)
    }

    fn set_all_subtasks_completed(&mut self, task_id: i64, completed: bool) -> StoreResult<usize> {
        (**self).set_all_subtasks_completed(task_id, completed)
    }

    fn max_id(&self) -> StoreResult<Option<i64>> {
        (**self).max_id()
    }

    fn health_check(&self) -> StoreResult<()> {
        (**self).health_check()
    }
}
