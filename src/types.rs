//! Core types for the taskboard service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::Add;

use crate::error::TaskError;

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Backlog,
    Unstarted,
    Started,
    Completed,
    Canceled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Backlog,
        TaskStatus::Unstarted,
        TaskStatus::Started,
        TaskStatus::Completed,
        TaskStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Backlog => "Backlog",
            TaskStatus::Unstarted => "Unstarted",
            TaskStatus::Started => "Started",
            TaskStatus::Completed => "Completed",
            TaskStatus::Canceled => "Canceled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == s)
    }

    /// Work not yet picked up.
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskStatus::Backlog | TaskStatus::Unstarted)
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, TaskStatus::Started)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creation and last-modification timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDates {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored task. `subtasks` holds ids of referenced tasks, not owned children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f64>,
    #[serde(default)]
    pub subtasks: Vec<String>,
    pub dates: TaskDates,
}

impl Task {
    /// Estimate with an absent value counted as zero.
    pub fn effort(&self) -> f64 {
        self.estimate.unwrap_or(0.0)
    }
}

/// A task whose subtask ids have been replaced by the referenced tasks,
/// recursively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTask {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f64>,
    #[serde(default)]
    pub subtasks: Vec<ResolvedTask>,
    pub dates: TaskDates,
}

impl ResolvedTask {
    pub fn from_task(task: &Task, subtasks: Vec<ResolvedTask>) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            status: task.status,
            estimate: task.estimate,
            subtasks,
            dates: task.dates,
        }
    }

    pub fn effort(&self) -> f64 {
        self.estimate.unwrap_or(0.0)
    }
}

/// Effort rolled up over a resolved subtask tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateSummary {
    pub pending: f64,
    pub in_progress: f64,
    pub total: f64,
}

impl Add for EstimateSummary {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            pending: self.pending + rhs.pending,
            in_progress: self.in_progress + rhs.in_progress,
            total: self.total + rhs.total,
        }
    }
}

/// What reads return: the task, its resolved subtree and the rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTask {
    #[serde(flatten)]
    pub task: ResolvedTask,
    pub estimates: EstimateSummary,
}

/// One page of the task listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPage {
    pub data: Vec<EnrichedTask>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

/// Request body for creating or replacing a task.
///
/// Fields stay loosely typed here so that [`TaskInput::validate`] can report
/// which field is wrong instead of a generic parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub estimate: Option<f64>,
    /// Accepts plain ids or resolved subtask objects carrying an `id`.
    #[serde(default, deserialize_with = "deserialize_subtask_refs")]
    pub subtasks: Option<Vec<String>>,
}

/// Validated task fields, ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub priority: Option<Priority>,
    pub status: TaskStatus,
    pub estimate: Option<f64>,
    pub subtasks: Vec<String>,
}

impl TaskInput {
    /// Schema check: required text fields, enum membership, non-negative estimate.
    pub fn validate(self) -> Result<TaskFields, TaskError> {
        let title = self.title.ok_or_else(|| TaskError::missing_field("title"))?;
        let description = self
            .description
            .ok_or_else(|| TaskError::missing_field("description"))?;

        let status = match self.status {
            Some(s) => TaskStatus::from_str(&s).ok_or_else(|| {
                TaskError::invalid_value("status", &format!("Invalid status: {}", s))
            })?,
            None => return Err(TaskError::missing_field("status")),
        };

        let priority = match self.priority {
            Some(p) => Some(Priority::from_str(&p).ok_or_else(|| {
                TaskError::invalid_value("priority", &format!("Invalid priority: {}", p))
            })?),
            None => None,
        };

        if let Some(estimate) = self.estimate
            && !(estimate.is_finite() && estimate >= 0.0)
        {
            return Err(TaskError::invalid_value(
                "estimate",
                "estimate must be a non-negative number",
            ));
        }

        Ok(TaskFields {
            title,
            description,
            priority,
            status,
            estimate: self.estimate,
            subtasks: self.subtasks.unwrap_or_default(),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SubtaskRef {
    Id(String),
    Node { id: String },
}

fn deserialize_subtask_refs<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let refs: Option<Vec<SubtaskRef>> = Option::deserialize(deserializer)?;
    Ok(refs.map(|refs| {
        refs.into_iter()
            .map(|r| match r {
                SubtaskRef::Id(id) | SubtaskRef::Node { id } => id,
            })
            .collect()
    }))
}
