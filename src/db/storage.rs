//! Durable backing for the task set.
//!
//! The store file is a single JSON document, `{ "tasks": [...], "nextId": n }`.
//! Writes go to a temp file first and are renamed into place, so a failed
//! flush never leaves a half-written store behind.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;

use super::TaskSet;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse task store {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize task store: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Read/write access to a persisted [`TaskSet`].
pub trait Storage: Send + Sync {
    /// Load the current snapshot.
    fn read(&self) -> Result<TaskSet, StorageError>;

    /// Durably replace the stored snapshot.
    fn write(&self, tasks: &TaskSet) -> Result<(), StorageError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Store backed by a JSON file on disk.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    fn io_err(path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Storage for JsonFileStorage {
    fn read(&self) -> Result<TaskSet, StorageError> {
        if !self.path.exists() {
            return Ok(TaskSet::default());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| Self::io_err(&self.path, e))?;
        if content.trim().is_empty() {
            return Ok(TaskSet::default());
        }

        serde_json::from_str(&content).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, tasks: &TaskSet) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Self::io_err(parent, e))?;
        }

        let temp_path = self.temp_path();
        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| Self::io_err(&temp_path, e))?;

            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, tasks)?;
            writer.flush().map_err(|e| Self::io_err(&temp_path, e))?;
            drop(writer);
            file.sync_all().map_err(|e| Self::io_err(&temp_path, e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| Self::io_err(&self.path, e))?;
        debug!(path = %self.path.display(), tasks = tasks.len(), "Task store flushed");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Volatile store, used by tests and `Database::open_in_memory`.
#[derive(Default)]
pub struct MemoryStorage {
    data: Mutex<TaskSet>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: TaskSet) -> Self {
        Self {
            data: Mutex::new(tasks),
        }
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> Result<TaskSet, StorageError> {
        let data = self
            .data
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))?;
        Ok(data.clone())
    }

    fn write(&self, tasks: &TaskSet) -> Result<(), StorageError> {
        let mut data = self
            .data
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))?;
        *data = tasks.clone();
        Ok(())
    }

    fn describe(&self) -> String {
        ":memory:".to_string()
    }
}
