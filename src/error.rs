//! Structured error types for task operations.

use serde::Serialize;
use std::fmt;

use crate::db::storage::StorageError;

/// Message returned when a mutation would make the subtask graph cyclic.
pub const CIRCULAR_DEPENDENCY_MESSAGE: &str = "Dependencia circular detectada.";

/// Message returned when deleting a task that another task still references.
pub const TASK_REFERENCED_MESSAGE: &str = "task is a subtask of another";

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    MissingRequiredField,
    InvalidFieldValue,
    DependencyCycle,

    // Not found errors
    TaskNotFound,

    // Referential integrity
    TaskReferenced,

    // Internal errors
    PersistenceError,
    InternalError,
}

/// Broad category of an [`ErrorCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    ReferentialIntegrity,
    Persistence,
}

impl ErrorCode {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::MissingRequiredField
            | ErrorCode::InvalidFieldValue
            | ErrorCode::DependencyCycle => ErrorKind::Validation,
            ErrorCode::TaskNotFound => ErrorKind::NotFound,
            ErrorCode::TaskReferenced => ErrorKind::ReferentialIntegrity,
            ErrorCode::PersistenceError | ErrorCode::InternalError => ErrorKind::Persistence,
        }
    }
}

/// Structured error returned by every store operation.
#[derive(Debug, Clone, Serialize)]
pub struct TaskError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl TaskError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    // Convenience constructors

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("{} is required", field),
        )
        .with_field(field)
    }

    pub fn invalid_value(field: &str, reason: &str) -> Self {
        Self::new(ErrorCode::InvalidFieldValue, reason).with_field(field)
    }

    pub fn dependency_cycle() -> Self {
        Self::new(ErrorCode::DependencyCycle, CIRCULAR_DEPENDENCY_MESSAGE).with_field("subtasks")
    }

    pub fn task_not_found(task_id: &str) -> Self {
        Self::new(
            ErrorCode::TaskNotFound,
            format!("Task not found: {}", task_id),
        )
    }

    pub fn task_referenced() -> Self {
        Self::new(ErrorCode::TaskReferenced, TASK_REFERENCED_MESSAGE)
    }

    pub fn persistence(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::PersistenceError, err.to_string())
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TaskError {}

impl From<StorageError> for TaskError {
    fn from(err: StorageError) -> Self {
        TaskError::persistence(err)
    }
}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for TaskError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<TaskError>() {
            Ok(task_err) => task_err,
            Err(err) => TaskError::persistence(format!("{:#}", err)),
        }
    }
}

/// Result type for task operations.
pub type TaskResult<T> = std::result::Result<T, TaskError>;
