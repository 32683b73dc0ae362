//! Estimate rollups over resolved subtask trees.

use crate::types::{EstimateSummary, ResolvedTask};

/// Sum estimates over `subtasks` and everything nested below them.
///
/// Every node adds its estimate to `total`. Backlog and Unstarted nodes also
/// add to `pending`, Started nodes to `in_progress`. Works on the resolved
/// tree only; the store is never consulted.
pub fn aggregate_estimates(subtasks: &[ResolvedTask]) -> EstimateSummary {
    subtasks.iter().fold(EstimateSummary::default(), |acc, node| {
        acc + node_estimate(node) + aggregate_estimates(&node.subtasks)
    })
}

fn node_estimate(node: &ResolvedTask) -> EstimateSummary {
    let effort = node.effort();
    EstimateSummary {
        pending: if node.status.is_pending() { effort } else { 0.0 },
        in_progress: if node.status.is_in_progress() { effort } else { 0.0 },
        total: effort,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TaskDates, TaskStatus};
    use chrono::Utc;

    fn node(status: TaskStatus, estimate: Option<f64>, subtasks: Vec<ResolvedTask>) -> ResolvedTask {
        let now = Utc::now();
        ResolvedTask {
            id: format!("{:?}", status),
            title: String::new(),
            description: String::new(),
            priority: None,
            status,
            estimate,
            subtasks,
            dates: TaskDates {
                created_at: now,
                updated_at: now,
            },
        }
    }

    #[test]
    fn test_empty_tree_sums_to_zero() {
        assert_eq!(aggregate_estimates(&[]), EstimateSummary::default());
    }

    #[test]
    fn test_partitions_by_status_and_recurses() {
        let tree = vec![
            node(TaskStatus::Backlog, Some(3.0), vec![]),
            node(
                TaskStatus::Started,
                Some(2.0),
                vec![node(TaskStatus::Completed, Some(5.0), vec![])],
            ),
        ];

        let summary = aggregate_estimates(&tree);
        assert_eq!(
            summary,
            EstimateSummary {
                pending: 3.0,
                in_progress: 2.0,
                total: 10.0,
            }
        );
    }

    #[test]
    fn test_missing_estimate_counts_as_zero() {
        let tree = vec![
            node(TaskStatus::Unstarted, None, vec![]),
            node(TaskStatus::Unstarted, Some(1.5), vec![]),
        ];

        let summary = aggregate_estimates(&tree);
        assert_eq!(summary.pending, 1.5);
        assert_eq!(summary.total, 1.5);
    }

    #[test]
    fn test_canceled_counts_toward_total_only() {
        let tree = vec![node(
            TaskStatus::Canceled,
            Some(4.0),
            vec![node(TaskStatus::Backlog, Some(1.0), vec![])],
        )];

        let summary = aggregate_estimates(&tree);
        assert_eq!(summary.pending, 1.0);
        assert_eq!(summary.in_progress, 0.0);
        assert_eq!(summary.total, 5.0);
    }
}
