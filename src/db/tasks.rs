//! Task CRUD with graph guards.
//!
//! The `TaskSet` methods hold the rules: creates and updates are rejected when
//! the proposed references would close a cycle, deletes are rejected while
//! another task still references the target. The `Database` methods wrap them
//! in a reload/flush critical section.

use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

use super::deps::would_create_cycle;
use super::stats::aggregate_estimates;
use super::tree::{index_tasks, resolve_ids};
use super::{Database, TaskSet, now};
use crate::error::{TaskError, TaskResult};
use crate::types::{EnrichedTask, ResolvedTask, Task, TaskDates, TaskFields};

/// Resolve the subtree of `task` within `all_tasks` and roll up its estimates.
pub fn enrich(task: &Task, all_tasks: &[Task]) -> EnrichedTask {
    enrich_with(task, &index_tasks(all_tasks))
}

fn enrich_with(task: &Task, index: &HashMap<&str, &Task>) -> EnrichedTask {
    let subtasks = resolve_ids(&task.subtasks, index, 0);
    let estimates = aggregate_estimates(&subtasks);
    EnrichedTask {
        task: ResolvedTask::from_task(task, subtasks),
        estimates,
    }
}

impl TaskSet {
    /// Every stored task, enriched, in store order.
    pub fn list_enriched(&self) -> Vec<EnrichedTask> {
        self.enrich_all(self.tasks.iter())
    }

    pub(crate) fn enrich_all<'a>(&'a self, tasks: impl Iterator<Item = &'a Task>) -> Vec<EnrichedTask> {
        let index = index_tasks(&self.tasks);
        tasks.map(|task| enrich_with(task, &index)).collect()
    }

    pub fn get_enriched(&self, id: &str) -> TaskResult<EnrichedTask> {
        let task = self.get(id).ok_or_else(|| TaskError::task_not_found(id))?;
        Ok(enrich(task, &self.tasks))
    }

    /// Insert a new task under a fresh id.
    pub fn create(&mut self, fields: TaskFields) -> TaskResult<EnrichedTask> {
        let id = self.fresh_id();

        if would_create_cycle(&id, &fields.subtasks, &self.tasks) {
            warn!(task_id = %id, "Rejected create: circular subtask reference");
            return Err(TaskError::dependency_cycle());
        }

        let now = now();
        let task = Task {
            id,
            title: fields.title,
            description: fields.description,
            priority: fields.priority,
            status: fields.status,
            estimate: fields.estimate,
            subtasks: fields.subtasks,
            dates: TaskDates {
                created_at: now,
                updated_at: now,
            },
        };

        let enriched = enrich(&task, &self.tasks);
        self.tasks.push(task);
        self.next_id += 1;
        Ok(enriched)
    }

    /// Replace the task `id` with `fields`, keeping its id and creation date.
    pub fn update(&mut self, id: &str, fields: TaskFields) -> TaskResult<EnrichedTask> {
        let pos = self
            .position(id)
            .ok_or_else(|| TaskError::task_not_found(id))?;

        if would_create_cycle(id, &fields.subtasks, &self.tasks) {
            warn!(task_id = %id, "Rejected update: circular subtask reference");
            return Err(TaskError::dependency_cycle());
        }

        let existing = &self.tasks[pos];
        let updated = Task {
            id: existing.id.clone(),
            title: fields.title,
            description: fields.description,
            priority: fields.priority,
            status: fields.status,
            estimate: fields.estimate,
            subtasks: fields.subtasks,
            dates: TaskDates {
                created_at: existing.dates.created_at,
                updated_at: now(),
            },
        };

        self.tasks[pos] = updated;
        Ok(enrich(&self.tasks[pos], &self.tasks))
    }

    /// Remove task `id` unless some task still lists it as a subtask.
    pub fn remove(&mut self, id: &str) -> TaskResult<Task> {
        let pos = self
            .position(id)
            .ok_or_else(|| TaskError::task_not_found(id))?;

        if let Some(referrer) = self.referrers(id).next() {
            warn!(task_id = %id, referenced_by = %referrer.id, "Rejected delete: task is referenced");
            return Err(TaskError::task_referenced());
        }

        Ok(self.tasks.remove(pos))
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

impl Database {
    /// Fetch a task with its resolved subtree and estimates.
    pub fn get_task(&self, id: &str) -> TaskResult<EnrichedTask> {
        self.read(|tasks| tasks.get_enriched(id))
    }

    /// Every stored task, enriched.
    pub fn list_all_tasks(&self) -> TaskResult<Vec<EnrichedTask>> {
        self.read(|tasks| Ok(tasks.list_enriched()))
    }

    pub fn create_task(&self, fields: TaskFields) -> TaskResult<EnrichedTask> {
        let created = self.mutate(|tasks| tasks.create(fields))?;
        info!(task_id = %created.task.id, title = %created.task.title, "Task created");
        Ok(created)
    }

    pub fn update_task(&self, id: &str, fields: TaskFields) -> TaskResult<EnrichedTask> {
        let updated = self.mutate(|tasks| tasks.update(id, fields))?;
        info!(task_id = %id, status = %updated.task.status, "Task updated");
        Ok(updated)
    }

    pub fn delete_task(&self, id: &str) -> TaskResult<Task> {
        let deleted = self.mutate(|tasks| tasks.remove(id))?;
        info!(task_id = %id, "Task deleted");
        Ok(deleted)
    }
}
