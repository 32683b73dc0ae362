//! Check subcommand for taskboard CLI
//!
//! Scans the store for problems the API cannot create but a hand-edited or
//! older store file may contain: references to missing tasks, subtask cycles,
//! and trees deeper than the resolver expands.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::fmt::Write as _;

use crate::db::deps::SubtaskGraph;
use crate::db::tree::{MAX_RESOLVE_DEPTH, is_truncated};
use crate::db::{Database, TaskSet};

/// Arguments for the check subcommand
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Output format: markdown or json
    #[arg(short, long, default_value = "markdown")]
    pub format: String,

    /// Exit with an error when any problem is found
    #[arg(long)]
    pub strict: bool,
}

/// A subtask id with no matching task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingRef {
    pub task_id: String,
    pub missing_id: String,
}

/// Problems found in a store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub task_count: usize,
    pub dangling: Vec<DanglingRef>,
    /// Each cycle starts and ends with the same id.
    pub cycles: Vec<Vec<String>>,
    /// Tasks whose subtree is cut off by the resolver.
    pub truncated: Vec<String>,
}

impl CheckReport {
    pub fn from_tasks(set: &TaskSet) -> Self {
        let tasks = set.tasks();
        let graph = SubtaskGraph::from_tasks(tasks);

        let mut dangling = Vec::new();
        for task in tasks {
            for id in &task.subtasks {
                if !graph.contains(id) {
                    dangling.push(DanglingRef {
                        task_id: task.id.clone(),
                        missing_id: id.clone(),
                    });
                }
            }
        }

        let truncated = tasks
            .iter()
            .filter(|task| is_truncated(task, tasks))
            .map(|task| task.id.clone())
            .collect();

        Self {
            task_count: tasks.len(),
            dangling,
            cycles: graph.cycles(),
            truncated,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty() && self.cycles.is_empty() && self.truncated.is_empty()
    }

    pub fn problem_count(&self) -> usize {
        self.dangling.len() + self.cycles.len() + self.truncated.len()
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let _ = writeln!(md, "# Store check ({} tasks)\n", self.task_count);

        if self.is_clean() {
            md.push_str("No problems found.\n");
            return md;
        }

        if !self.dangling.is_empty() {
            let _ = writeln!(md, "## Dangling references ({})", self.dangling.len());
            for d in &self.dangling {
                let _ = writeln!(md, "- `{}` -> `{}`", d.task_id, d.missing_id);
            }
            md.push('\n');
        }

        if !self.cycles.is_empty() {
            let _ = writeln!(md, "## Cycles ({})", self.cycles.len());
            for cycle in &self.cycles {
                let path: Vec<String> = cycle.iter().map(|id| format!("`{}`", id)).collect();
                let _ = writeln!(md, "- {}", path.join(" -> "));
            }
            md.push('\n');
        }

        if !self.truncated.is_empty() {
            let _ = writeln!(
                md,
                "## Deeper than {} levels ({})",
                MAX_RESOLVE_DEPTH + 1,
                self.truncated.len()
            );
            for id in &self.truncated {
                let _ = writeln!(md, "- `{}`", id);
            }
        }

        md
    }
}

/// Load the store and build the report.
pub fn run_check(db: &Database) -> Result<CheckReport> {
    let set = db.snapshot()?;
    Ok(CheckReport::from_tasks(&set))
}
