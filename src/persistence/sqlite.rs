use super::{DateFilter, EntityStore};
use crate::domain::{Subtask, Task};
use crate::error::StoreResult;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use std::path::Path;
use tracing::info;

const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS tasks (
        id          INTEGER PRIMARY KEY NOT NULL,
        text        TEXT NOT NULL,
        date        TEXT NOT NULL,
        completed   INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS subtasks (
        id          INTEGER PRIMARY KEY NOT NULL,
        task_id     INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
        text        TEXT NOT NULL,
        completed   INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS subtasks_task_id ON subtasks (task_id);
    CREATE INDEX IF NOT EXISTS tasks_date ON tasks (date);
";

/// Device-local database with `tasks` and `subtasks` tables.
///
/// Subtask rows are removed by the `ON DELETE CASCADE` foreign key when
/// their task is deleted.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database file at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened sqlite store");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn query_tasks<P: Params>(&self, sql: &str, params: P) -> StoreResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, task_from_row)?;

        let mut tasks = Vec::new();
        for task in rows {
            let mut task = task?;
            task.subtasks = self.subtasks_of(task.id)?;
            tasks.push(task);
        }
        Ok(tasks)
    }

    fn subtasks_of(&self, task_id: i64) -> StoreResult<Vec<Subtask>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, task_id, text, completed FROM subtasks WHERE task_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![task_id], subtask_from_row)?;

        let mut subtasks = Vec::new();
        for subtask in rows {
            subtasks.push(subtask?);
        }
        Ok(subtasks)
    }
}

fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        text: row.get(1)?,
        date: row.get(2)?,
        completed: row.get(3)?,
        subtasks: Vec::new(),
    })
}

fn subtask_from_row(row: &Row) -> rusqlite::Result<Subtask> {
    Ok(Subtask {
        id: row.get(0)?,
        task_id: row.get(1)?,
        text: row.get(2)?,
        completed: row.get(3)?,
    })
}

impl EntityStore for SqliteStore {
    fn load_tasks(&self, filter: DateFilter) -> StoreResult<Vec<Task>> {
        match filter {
            DateFilter::All => self.query_tasks(
                "SELECT id, text, date, completed FROM tasks ORDER BY id",
                [],
            ),
            DateFilter::On(date) => self.query_tasks(
                "SELECT id, text, date, completed FROM tasks WHERE date = ?1 ORDER BY id",
                params![date],
            ),
            DateFilter::After(date) => self.query_tasks(
                "SELECT id, text, date, completed FROM tasks WHERE date > ?1 ORDER BY id",
                params![date],
            ),
        }
    }

    fn find_task(&self, id: i64) -> StoreResult<Option<Task>> {
        let task = self
            .conn
            .query_row(
                "SELECT id, text, date, completed FROM tasks WHERE id = ?1",
                params![id],
                task_from_row,
            )
            .optional()?;

        match task {
            Some(mut task) => {
                task.subtasks = self.subtasks_of(task.id)?;
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }

    fn insert_task(&mut self, task: &Task) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO tasks (id, text, date, completed) VALUES (?1, ?2, ?3, ?4)",
            params![task.id, task.text, task.date, task.completed],
        )?;
        Ok(())
    }

    fn update_task(&mut self, task: &Task) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE tasks SET text = ?2, date = ?3, completed = ?4 WHERE id = ?1",
            params![task.id, task.text, task.date, task.completed],
        )?;
        Ok(changed > 0)
    }

    fn delete_task(&mut self, id: i64) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn find_subtask(&self, id: i64) -> StoreResult<Option<Subtask>> {
        let subtask = self
            .conn
            .query_row(
                "SELECT id, task_id, text, completed FROM subtasks WHERE id = ?1",
                params![id],
                subtask_from_row,
            )
            .optional()?;
        Ok(subtask)
    }

    fn insert_subtask(&mut self, subtask: &Subtask) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "INSERT INTO subtasks (id, task_id, text, completed)
             SELECT ?1, ?2, ?3, ?4 WHERE EXISTS (SELECT 1 FROM tasks WHERE id = ?2)",
            params![subtask.id, subtask.task_id, subtask.text, subtask.completed],
        )?;
        Ok(changed > 0)
    }

    fn update_subtask(&mut self, subtask: &Subtask) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE subtasks SET text = ?2, completed = ?3 WHERE id = ?1",
            params![subtask.id, subtask.text, subtask.completed],
        )?;
        Ok(changed > 0)
    }

    fn delete_subtask(&mut self, id: i64) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM subtasks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn set_all_subtasks_completed(&mut self, task_id: i64, completed: bool) -> StoreResult<usize> {
        let changed = self.conn.execute(
            "UPDATE subtasks SET completed = ?2 WHERE task_id = ?1",
            params![task_id, completed],
        )?;
        Ok(changed)
    }

    fn max_id(&self) -> StoreResult<Option<i64>> {
        let max = self.conn.query_row(
            "SELECT MAX(id) FROM (SELECT id FROM tasks UNION ALL SELECT id FROM subtasks)",
            [],
            |row| row.get::<_, Option<i64>>(0),
        )?;
        Ok(max)
    }

    fn health_check(&self) -> StoreResult<()> {
        self.conn
            .query_row("SELECT 1 FROM tasks LIMIT 1", [], |_| Ok(()))
            .optional()?;
        Ok(())
    }
}
