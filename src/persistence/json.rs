use super::files::{atomic_write, read_file};
use super::{DateFilter, EntityStore, MemoryStore};
use crate::domain::{Subtask, Task};
use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// On-disk layout of the JSON store
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    tasks: Vec<Task>,
}

fn parse_document(path: &Path, content: &str) -> StoreResult<Document> {
    if content.trim().is_empty() {
        return Ok(Document::default());
    }
    serde_json::from_str(content).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Single JSON document holding every task with its subtasks nested.
///
/// The whole document is held in memory. Each mutation runs on a copy,
/// and the copy replaces the held document only after it was written.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonStore {
    /// Open the store at `path`; a missing or empty file is an empty store
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let document = parse_document(&path, &read_file(&path)?)?;

        info!(path = %path.display(), tasks = document.tasks.len(), "opened json store");
        Ok(Self {
            path,
            inner: MemoryStore::from_tasks(document.tasks),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, store: &MemoryStore) -> StoreResult<()> {
        let document = Document {
            tasks: store.tasks().to_vec(),
        };
        let json = serde_json::to_string_pretty(&document).map_err(StoreError::Encode)?;
        atomic_write(&self.path, &json)?;
        debug!(path = %self.path.display(), "saved json store");
        Ok(())
    }

    /// Apply `op` to a copy and keep it if `changed` says there is
    /// something to write and the write succeeds
    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut MemoryStore) -> StoreResult<T>,
        changed: impl FnOnce(&T) -> bool,
    ) -> StoreResult<T> {
        let mut next = self.inner.clone();
        let outcome = op(&mut next)?;
        if changed(&outcome) {
            self.save(&next)?;
            self.inner = next;
        }
        Ok(outcome)
    }
}

impl EntityStore for JsonStore {
    fn load_tasks(&self, filter: DateFilter) -> StoreResult<Vec<Task>> {
        self.inner.load_tasks(filter)
    }

    fn find_task(&self, id: i64) -> StoreResult<Option<Task>> {
        self.inner.find_task(id)
    }

    fn insert_task(&mut self, task: &Task) -> StoreResult<()> {
        self.commit(|store| store.insert_task(task), |_| true)
    }

    fn update_task(&mut self, task: &Task) -> StoreResult<bool> {
        self.commit(|store| store.update_task(task), |changed| *changed)
    }

    fn delete_task(&mut self, id: i64) -> StoreResult<bool> {
        self.commit(|store| store.delete_task(id), |changed| *changed)
    }

    fn find_subtask(&self, id: i64) -> StoreResult<Option<Subtask>> {
        self.inner.find_subtask(id)
    }

    fn insert_subtask(&mut self, subtask: &Subtask) -> StoreResult<bool> {
        self.commit(|store| store.insert_subtask(subtask), |changed| *changed)
    }

    fn update_subtask(&mut self, subtask: &Subtask) -> StoreResult<bool> {
        self.commit(|store| store.update_subtask(subtask), |changed| *changed)
    }

    fn delete_subtask(&mut self, id: i64) -> StoreResult<bool> {
        self.commit(|store| store.delete_subtask(id), |changed| *changed)
    }

    fn set_all_subtasks_completed(&mut self, task_id: i64, completed: bool) -> StoreResult<usize> {
        self.commit(
            |store| store.set_all_subtasks_completed(task_id, completed),
            |count| *count > 0,
        )
    }

    fn max_id(&self) -> StoreResult<Option<i64>> {
        self.inner.max_id()
    }

    /// Confirms the backing file is still readable and parses
    fn health_check(&self) -> StoreResult<()> {
        parse_document(&self.path, &read_file(&self.path)?)?;
        Ok(())
    }
}
