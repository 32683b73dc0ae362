//! Subtask references and cycle detection.

use std::collections::{HashMap, HashSet};

use crate::types::Task;

/// Adjacency view of the subtask reference graph: task id -> referenced ids.
///
/// Borrowed from a task slice; building it does not copy task data. A single
/// entry can be overridden with a proposed reference list so a mutation can be
/// checked before it is applied.
#[derive(Debug, Clone, Default)]
pub struct SubtaskGraph<'a> {
    edges: HashMap<&'a str, &'a [String]>,
}

impl<'a> SubtaskGraph<'a> {
    pub fn from_tasks(tasks: &'a [Task]) -> Self {
        let mut edges = HashMap::with_capacity(tasks.len());
        for task in tasks {
            // First record wins when ids collide in a hand-edited store
            edges
                .entry(task.id.as_str())
                .or_insert(task.subtasks.as_slice());
        }
        Self { edges }
    }

    /// Replace (or add) the outgoing references of `id`.
    pub fn with_proposed(mut self, id: &'a str, subtasks: &'a [String]) -> Self {
        self.edges.insert(id, subtasks);
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    /// Referenced ids of `id`; empty for unknown ids.
    pub fn subtasks_of(&self, id: &str) -> &'a [String] {
        self.edges.get(id).copied().unwrap_or(&[])
    }

    /// Walk everything reachable from `start` with one visited set shared by
    /// all branches. Reaching any id a second time returns true at once, so a
    /// subtask reached along two routes, or listed twice, counts as a cycle.
    ///
    /// Ids are checked against the visited set before they are looked up, so
    /// an id referencing itself is caught even when it is not stored yet.
    /// Ids with no stored task are skipped without being marked.
    pub fn revisits_from(&self, start: &'a str) -> bool {
        let mut visited: HashSet<&'a str> = HashSet::from([start]);
        let mut stack = vec![start];

        while let Some(id) = stack.pop() {
            for child in self.subtasks_of(id) {
                let child = child.as_str();
                if visited.contains(child) {
                    return true;
                }
                if !self.contains(child) {
                    continue;
                }
                visited.insert(child);
                stack.push(child);
            }
        }

        false
    }

    /// Depth-first walk from `start`. Returns the first true cycle met (an id
    /// reached again while still on the current path) as the list of ids on
    /// it, with the repeated id at both ends. Shared subtasks are not reported.
    /// Used to describe existing cycles in a store, not to guard mutations.
    pub fn find_cycle_from(&self, start: &'a str) -> Option<Vec<String>> {
        let mut path: Vec<(&'a str, usize)> = vec![(start, 0)];
        let mut on_path: HashSet<&'a str> = HashSet::from([start]);
        let mut finished: HashSet<&'a str> = HashSet::new();

        while let Some(frame) = path.last_mut() {
            let (id, next) = *frame;
            let children = self.subtasks_of(id);

            if next == children.len() {
                path.pop();
                on_path.remove(id);
                finished.insert(id);
                continue;
            }
            frame.1 += 1;

            let child = children[next].as_str();
            if on_path.contains(child) {
                let from = path.iter().position(|(p, _)| *p == child).unwrap_or(0);
                let mut cycle: Vec<String> =
                    path[from..].iter().map(|(p, _)| p.to_string()).collect();
                cycle.push(child.to_string());
                return Some(cycle);
            }
            if finished.contains(child) || !self.contains(child) {
                continue;
            }

            on_path.insert(child);
            path.push((child, 0));
        }

        None
    }

    /// Every distinct cycle present in the graph, each reported once.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut starts: Vec<&'a str> = self.edges.keys().copied().collect();
        starts.sort_unstable();

        let mut seen: HashSet<Vec<String>> = HashSet::new();
        let mut out = Vec::new();
        for start in starts {
            if let Some(cycle) = self.find_cycle_from(start) {
                let mut members: Vec<String> = cycle[1..].to_vec();
                members.sort();
                if seen.insert(members) {
                    out.push(cycle);
                }
            }
        }
        out
    }
}

/// Would giving `candidate_id` the references `proposed_subtasks` make the
/// graph over `tasks` cyclic?
///
/// The stored references of `candidate_id`, if any, are ignored in favor of
/// the proposed list; every other task is looked up as stored. Any id reached
/// twice in the walk is reported, see [`SubtaskGraph::revisits_from`].
pub fn would_create_cycle(candidate_id: &str, proposed_subtasks: &[String], tasks: &[Task]) -> bool {
    SubtaskGraph::from_tasks(tasks)
        .with_proposed(candidate_id, proposed_subtasks)
        .revisits_from(candidate_id)
}
