//! Recursive subtask resolution.

use std::collections::HashMap;

use crate::types::{ResolvedTask, Task};

/// Deepest recursion level the resolver will expand. Subtasks requested
/// beyond it resolve to an empty list.
pub const MAX_RESOLVE_DEPTH: usize = 5;

/// Id -> task lookup over a task slice. The first task wins on duplicate ids.
pub(crate) fn index_tasks(tasks: &[Task]) -> HashMap<&str, &Task> {
    let mut index = HashMap::with_capacity(tasks.len());
    for task in tasks {
        index.entry(task.id.as_str()).or_insert(task);
    }
    index
}

/// Expand the subtask ids of `task` into nested [`ResolvedTask`]s, starting
/// at depth 0.
pub fn resolve_subtasks(task: &Task, all_tasks: &[Task]) -> Vec<ResolvedTask> {
    resolve_subtasks_at(task, all_tasks, 0)
}

/// Expand the subtask ids of `task` as if it sat at `depth` in a larger tree.
///
/// Ids without a matching task are dropped. Output order follows the id
/// list; a repeated id yields repeated nodes.
pub fn resolve_subtasks_at(task: &Task, all_tasks: &[Task], depth: usize) -> Vec<ResolvedTask> {
    let index = index_tasks(all_tasks);
    resolve_ids(&task.subtasks, &index, depth)
}

pub(crate) fn resolve_ids(
    ids: &[String],
    index: &HashMap<&str, &Task>,
    depth: usize,
) -> Vec<ResolvedTask> {
    if depth > MAX_RESOLVE_DEPTH {
        return Vec::new();
    }

    ids.iter()
        .filter_map(|id| index.get(id.as_str()))
        .map(|sub| ResolvedTask::from_task(sub, resolve_ids(&sub.subtasks, index, depth + 1)))
        .collect()
}

/// Whether resolving `task` cuts off existing subtasks at the depth bound.
pub fn is_truncated(task: &Task, all_tasks: &[Task]) -> bool {
    let index = index_tasks(all_tasks);
    truncated_below(&task.subtasks, &index, 0)
}

fn truncated_below(ids: &[String], index: &HashMap<&str, &Task>, depth: usize) -> bool {
    let mut present = ids.iter().filter_map(|id| index.get(id.as_str()));
    if depth > MAX_RESOLVE_DEPTH {
        return present.next().is_some();
    }
    present.any(|sub| truncated_below(&sub.subtasks, index, depth + 1))
}
