use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which kind of record an id referred to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Task,
    Subtask,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Task => write!(f, "task"),
            EntityKind::Subtask => write!(f, "subtask"),
        }
    }
}

/// Failures raised by an entity store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store file {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode store contents: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("no ids left after {0}")]
    IdsExhausted(i64),
}

/// Errors returned by repository operations
#[derive(Debug, Error)]
pub enum TaskError {
    /// Input rejected before anything was written
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl TaskError {
    pub fn task_not_found(id: i64) -> Self {
        TaskError::NotFound {
            kind: EntityKind::Task,
            id,
        }
    }

    pub fn subtask_not_found(id: i64) -> Self {
        TaskError::NotFound {
            kind: EntityKind::Subtask,
            id,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskError::NotFound { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
pub type TaskResult<T> = Result<T, TaskError>;
