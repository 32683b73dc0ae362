//! Filtered, sorted and paginated task listing.

use super::{Database, TaskSet};
use crate::error::TaskResult;
use crate::types::{Priority, TaskPage, TaskStatus};

/// Sort direction on creation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortOrder {
    /// `"asc"` sorts oldest first; anything else sorts newest first.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

/// Parameters for [`TaskSet::query`].
#[derive(Debug, Clone, PartialEq)]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub sort: SortOrder,
    /// 1-based page number.
    pub page: usize,
    pub limit: usize,
}

impl Default for TaskListQuery {
    fn default() -> Self {
        Self {
            status: None,
            priority: None,
            sort: SortOrder::default(),
            page: 1,
            limit: 10,
        }
    }
}

impl TaskSet {
    /// Filter by status and priority, sort by creation date, then cut one page.
    ///
    /// `total` counts every match, not just the returned page. Subtask trees
    /// are resolved against the whole store, not the filtered view.
    pub fn query(&self, query: &TaskListQuery) -> TaskPage {
        let mut matches: Vec<_> = self
            .tasks
            .iter()
            .filter(|t| query.status.is_none_or(|s| t.status == s))
            .filter(|t| query.priority.is_none_or(|p| t.priority == Some(p)))
            .collect();

        matches.sort_by(|a, b| {
            let ord = a.dates.created_at.cmp(&b.dates.created_at);
            match query.sort {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        let page = query.page.max(1);
        let limit = query.limit.max(1);
        let total = matches.len();
        let data = self.enrich_all(
            matches
                .into_iter()
                .skip((page - 1).saturating_mul(limit))
                .take(limit),
        );

        TaskPage {
            data,
            total,
            page,
            limit,
        }
    }
}

impl Database {
    /// One page of enriched tasks.
    pub fn list_tasks(&self, query: &TaskListQuery) -> TaskResult<TaskPage> {
        self.read(|tasks| Ok(tasks.query(query)))
    }
}
