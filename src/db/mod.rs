//! Task store for the taskboard service.
//!
//! [`TaskSet`] is the in-memory snapshot: an ordered list of tasks plus the
//! creation counter. [`Database`] owns the shared snapshot and its backing
//! [`Storage`], and runs every operation as one critical section:
//! lock, reload, work on a draft, flush, commit.

pub mod deps;
pub mod query;
pub mod stats;
pub mod storage;
pub mod tasks;
pub mod tree;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::error::{TaskError, TaskResult};
use crate::types::Task;
use storage::{JsonFileStorage, MemoryStorage, Storage};

/// Ordered task collection as persisted in the store file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSet {
    #[serde(default)]
    pub(crate) tasks: Vec<Task>,
    /// Number of tasks ever created, plus one.
    #[serde(default = "default_next_id")]
    pub next_id: u64,
}

fn default_next_id() -> u64 {
    1
}

impl Default for TaskSet {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: default_next_id(),
        }
    }
}

impl TaskSet {
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            next_id: tasks.len() as u64 + 1,
            tasks,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// First task with the given id.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Tasks whose `subtasks` list contains `id`.
    pub fn referrers<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks
            .iter()
            .filter(move |t| t.subtasks.iter().any(|s| s == id))
    }
}

/// Shared task store handle.
#[derive(Clone)]
pub struct Database {
    state: Arc<Mutex<TaskSet>>,
    storage: Arc<dyn Storage>,
}

impl Database {
    /// Open the JSON store at the given path. A missing file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> TaskResult<Self> {
        Self::with_storage(Arc::new(JsonFileStorage::new(path.as_ref())))
    }

    /// Open a volatile store (for testing).
    pub fn open_in_memory() -> Self {
        Self {
            state: Arc::new(Mutex::new(TaskSet::default())),
            storage: Arc::new(MemoryStorage::new()),
        }
    }

    /// Open over any storage backend, loading its current snapshot.
    pub fn with_storage(storage: Arc<dyn Storage>) -> TaskResult<Self> {
        let snapshot = storage.read()?;
        debug!(store = %storage.describe(), tasks = snapshot.len(), "Task store opened");
        Ok(Self {
            state: Arc::new(Mutex::new(snapshot)),
            storage,
        })
    }

    /// Where the store lives, for logs.
    pub fn location(&self) -> String {
        self.storage.describe()
    }

    /// Run a read-only operation against a freshly reloaded snapshot.
    pub fn read<F, T>(&self, f: F) -> TaskResult<T>
    where
        F: FnOnce(&TaskSet) -> TaskResult<T>,
    {
        let mut state = self.lock()?;
        *state = self.storage.read()?;
        f(&state)
    }

    /// Run a mutation atomically.
    ///
    /// The closure works on a draft copy. The draft replaces the shared
    /// snapshot only after it has been flushed; on any error the snapshot
    /// and the store file are left as they were.
    pub fn mutate<F, T>(&self, f: F) -> TaskResult<T>
    where
        F: FnOnce(&mut TaskSet) -> TaskResult<T>,
    {
        let mut state = self.lock()?;
        *state = self.storage.read()?;

        let mut draft = state.clone();
        let out = f(&mut draft)?;

        self.storage.write(&draft)?;
        *state = draft;
        Ok(out)
    }

    /// Copy of the current snapshot, reloaded from storage.
    pub fn snapshot(&self) -> TaskResult<TaskSet> {
        self.read(|tasks| Ok(tasks.clone()))
    }

    fn lock(&self) -> TaskResult<std::sync::MutexGuard<'_, TaskSet>> {
        self.state
            .lock()
            .map_err(|_| TaskError::internal("task store lock poisoned"))
    }
}

/// Current time for task timestamps.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
