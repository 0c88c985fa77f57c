use super::{DateFilter, EntityStore};
use crate::domain::{Subtask, Task};
use crate::error::StoreResult;

/// Volatile store keeping tasks with their subtasks nested
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    tasks: Vec<Task>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from previously saved tasks, restoring id order
    pub fn from_tasks(mut tasks: Vec<Task>) -> Self {
        tasks.sort_by_key(|t| t.id);
        for task in &mut tasks {
            task.subtasks.sort_by_key(|st| st.id);
        }
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn task_mut(&mut self, id: i64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    fn subtask_mut(&mut self, id: i64) -> Option<&mut Subtask> {
        self.tasks
            .iter_mut()
            .flat_map(|t| t.subtasks.iter_mut())
            .find(|st| st.id == id)
    }
}

impl EntityStore for MemoryStore {
    fn load_tasks(&self, filter: DateFilter) -> StoreResult<Vec<Task>> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| filter.matches(t.date))
            .cloned()
            .collect())
    }

    fn find_task(&self, id: i64) -> StoreResult<Option<Task>> {
        Ok(self.tasks.iter().find(|t| t.id == id).cloned())
    }

    fn insert_task(&mut self, task: &Task) -> StoreResult<()> {
        let row = Task {
            subtasks: Vec::new(),
            ..task.clone()
        };
        // Ids are monotonic, so pushing keeps the list sorted
        if self.tasks.last().map_or(false, |last| last.id > row.id) {
            let pos = self.tasks.partition_point(|t| t.id < row.id);
            self.tasks.insert(pos, row);
        } else {
            self.tasks.push(row);
        }
        Ok(())
    }

    fn update_task(&mut self, task: &Task) -> StoreResult<bool> {
        match self.task_mut(task.id) {
            Some(existing) => {
                existing.text = task.text.clone();
                existing.date = task.date;
                existing.completed = task.completed;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_task(&mut self, id: i64) -> StoreResult<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        Ok(self.tasks.len() != before)
    }

    fn find_subtask(&self, id: i64) -> StoreResult<Option<Subtask>> {
        Ok(self
            .tasks
            .iter()
            .flat_map(|t| t.subtasks.iter())
            .find(|st| st.id == id)
            .cloned())
    }

    fn insert_subtask(&mut self, subtask: &Subtask) -> StoreResult<bool> {
        match self.task_mut(subtask.task_id) {
            Some(task) => {
                let pos = task.subtasks.partition_point(|st| st.id < subtask.id);
                task.subtasks.insert(pos, subtask.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn update_subtask(&mut self, subtask: &Subtask) -> StoreResult<bool> {
        match self.subtask_mut(subtask.id) {
            Some(existing) => {
                existing.text = subtask.text.clone();
                existing.completed = subtask.completed;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_subtask(&mut self, id: i64) -> StoreResult<bool> {
        for task in &mut self.tasks {
            if let Some(pos) = task.subtasks.iter().position(|st| st.id == id) {
                task.subtasks.remove(pos);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn set_all_subtasks_completed(&mut self, task_id: i64, completed: bool) -> StoreResult<usize> {
        match self.task_mut(task_id) {
            Some(task) => {
                for st in &mut task.subtasks {
                    st.completed = completed;
                }
                Ok(task.subtasks.len())
            }
            None => Ok(0),
        }
    }

    fn max_id(&self) -> StoreResult<Option<i64>> {
        Ok(self
            .tasks
            .iter()
            .flat_map(|t| std::iter::once(t.id).chain(t.subtasks.iter().map(|st| st.id)))
            .max())
    }
}
