//! Local to-do list core: dated tasks with subtasks, derived completion,
//! and the selectors the home, all-tasks and future-tasks views render from.

pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod repository;

pub use config::{Backend, Config};
pub use domain::{Subtask, SubtaskPatch, Task, TaskPatch};
pub use error::{EntityKind, StoreError, TaskError, TaskResult};
pub use persistence::{DateFilter, EntityStore, JsonStore, MemoryStore, SqliteStore};
pub use repository::TaskRepository;
