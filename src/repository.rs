use crate::domain::{Subtask, SubtaskPatch, Task, TaskPatch};
use crate::error::{StoreError, TaskError, TaskResult};
use crate::persistence::{DateFilter, EntityStore};
use chrono::{NaiveDate, Utc};
use tracing::debug;

/// Hands out timestamp-based ids that never repeat within a store
#[derive(Debug)]
struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    fn starting_after(last: Option<i64>) -> Self {
        Self {
            last: last.unwrap_or(0),
        }
    }

    fn next(&mut self) -> TaskResult<i64> {
        let following = self
            .last
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted(self.last))?;
        let id = Utc::now().timestamp_millis().max(following);
        self.last = id;
        Ok(id)
    }
}

/// Trim `text`, rejecting it if nothing remains
fn validated_text(text: &str, what: &str) -> TaskResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TaskError::Validation(format!("{} text must not be empty", what)));
    }
    Ok(trimmed.to_string())
}

/// Task and subtask operations over an entity store.
///
/// The repository is the single source of truth: every mutation is written
/// through to the store before it returns, and parent completion is kept
/// equal to the AND of its subtasks wherever the operation implies it.
/// `update_subtask` is the exception, its callers follow up with
/// [`TaskRepository::recompute_parent_completion`] (or use
/// [`TaskRepository::set_subtask_completed`], which does both).
pub struct TaskRepository<S: EntityStore> {
    store: S,
    ids: IdGenerator,
}

impl<S: EntityStore> TaskRepository<S> {
    pub fn new(store: S) -> TaskResult<Self> {
        let ids = IdGenerator::starting_after(store.max_id()?);
        Ok(Self { store, ids })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ----- Queries -----

    /// Every task in creation order, with subtasks nested
    pub fn list_all_tasks(&self) -> TaskResult<Vec<Task>> {
        Ok(self.store.load_tasks(DateFilter::All)?)
    }

    pub fn get_task(&self, id: i64) -> TaskResult<Task> {
        self.store
            .find_task(id)?
            .ok_or_else(|| TaskError::task_not_found(id))
    }

    pub fn get_subtask(&self, id: i64) -> TaskResult<Subtask> {
        self.store
            .find_subtask(id)?
            .ok_or_else(|| TaskError::subtask_not_found(id))
    }

    pub fn tasks_on(&self, date: NaiveDate) -> TaskResult<Vec<Task>> {
        Ok(self.store.load_tasks(DateFilter::On(date))?)
    }

    pub fn tasks_after(&self, date: NaiveDate) -> TaskResult<Vec<Task>> {
        Ok(self.store.load_tasks(DateFilter::After(date))?)
    }

    pub fn health_check(&self) -> TaskResult<()> {
        Ok(self.store.health_check()?)
    }

    // ----- Tasks -----

    pub fn create_task(&mut self, text: &str, date: NaiveDate) -> TaskResult<Task> {
        let text = validated_text(text, "task")?;
        let task = Task::new(self.ids.next()?, text, date);
        self.store.insert_task(&task)?;
        debug!(id = task.id, %date, "created task");
        Ok(task)
    }

    /// Apply a partial update. Setting `completed` on a task with subtasks
    /// forces every subtask to the same value.
    pub fn update_task(&mut self, id: i64, patch: TaskPatch) -> TaskResult<Task> {
        let text = patch
            .text
            .as_deref()
            .map(|t| validated_text(t, "task"))
            .transpose()?;
        let mut task = self.get_task(id)?;

        if let Some(text) = text {
            task.text = text;
        }
        if let Some(date) = patch.date {
            task.date = date;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }

        if !self.store.update_task(&task)? {
            return Err(TaskError::task_not_found(id));
        }

        if let Some(completed) = patch.completed {
            if task.has_subtasks() {
                let count = self.store.set_all_subtasks_completed(id, completed)?;
                for subtask in &mut task.subtasks {
                    subtask.completed = completed;
                }
                debug!(id, completed, subtasks = count, "propagated completion to subtasks");
            }
        }

        debug!(id, "updated task");
        Ok(task)
    }

    /// Delete a task and its subtasks. Unknown ids are `NotFound`.
    pub fn delete_task(&mut self, id: i64) -> TaskResult<()> {
        if !self.store.delete_task(id)? {
            return Err(TaskError::task_not_found(id));
        }
        debug!(id, "deleted task");
        Ok(())
    }

    /// Remove every completed task dated `date`, returning how many went
    pub fn delete_completed_tasks(&mut self, date: NaiveDate) -> TaskResult<usize> {
        let mut removed = 0;
        for task in self.store.load_tasks(DateFilter::On(date))? {
            if task.completed && self.store.delete_task(task.id)? {
                removed += 1;
            }
        }
        debug!(%date, removed, "deleted completed tasks");
        Ok(removed)
    }

    // ----- Subtasks -----

    /// Add an incomplete subtask; the parent becomes incomplete with it
    pub fn create_subtask(&mut self, task_id: i64, text: &str) -> TaskResult<Subtask> {
        let text = validated_text(text, "subtask")?;
        let subtask = Subtask::new(self.ids.next()?, task_id, text);

        if !self.store.insert_subtask(&subtask)? {
            return Err(TaskError::task_not_found(task_id));
        }
        debug!(id = subtask.id, task_id, "created subtask");

        self.recompute_parent_completion(task_id)?;
        Ok(subtask)
    }

    /// Apply a partial update without touching the parent
    pub fn update_subtask(&mut self, id: i64, patch: SubtaskPatch) -> TaskResult<Subtask> {
        let text = patch
            .text
            .as_deref()
            .map(|t| validated_text(t, "subtask"))
            .transpose()?;
        let mut subtask = self.get_subtask(id)?;

        if let Some(text) = text {
            subtask.text = text;
        }
        if let Some(completed) = patch.completed {
            subtask.completed = completed;
        }

        if !self.store.update_subtask(&subtask)? {
            return Err(TaskError::subtask_not_found(id));
        }
        debug!(id, task_id = subtask.task_id, "updated subtask");
        Ok(subtask)
    }

    /// Toggle a subtask and then re-derive its parent's completion
    pub fn set_subtask_completed(&mut self, id: i64, completed: bool) -> TaskResult<Task> {
        let subtask = self.update_subtask(id, SubtaskPatch::completed(completed))?;
        self.recompute_parent_completion(subtask.task_id)
    }

    /// Remove a subtask and return its parent with completion re-derived
    pub fn delete_subtask(&mut self, id: i64) -> TaskResult<Task> {
        let subtask = self.get_subtask(id)?;
        if !self.store.delete_subtask(id)? {
            return Err(TaskError::subtask_not_found(id));
        }
        debug!(id, task_id = subtask.task_id, "deleted subtask");

        self.recompute_parent_completion(subtask.task_id)
    }

    /// Set a parent's completion to the AND of its subtasks. Tasks without
    /// subtasks keep whatever was last set directly.
    pub fn recompute_parent_completion(&mut self, task_id: i64) -> TaskResult<Task> {
        let mut task = self.get_task(task_id)?;

        if let Some(all_done) = task.derived_completion() {
            if task.completed != all_done {
                task.completed = all_done;
                self.store.update_task(&task)?;
                debug!(id = task_id, completed = all_done, "re-derived task completion");
            }
        }

        Ok(task)
    }
}
