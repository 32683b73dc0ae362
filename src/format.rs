//! Output formatting utilities for markdown and JSON.

use crate::types::{EnrichedTask, EstimateSummary, ResolvedTask};

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

/// Format an enriched task, its subtask tree and rollup as markdown.
pub fn format_task_markdown(enriched: &EnrichedTask) -> String {
    let task = &enriched.task;
    let mut md = String::new();

    md.push_str(&format!("## Task: {}\n", task.title));
    md.push_str(&format!("- **id**: `{}`\n", task.id));
    md.push_str(&format!("- **status**: {}\n", task.status));

    if let Some(priority) = task.priority {
        md.push_str(&format!("- **priority**: {}\n", priority));
    }

    if let Some(estimate) = task.estimate {
        md.push_str(&format!("- **estimate**: {}\n", estimate));
    }

    md.push_str(&format!(
        "- **created**: {}\n",
        task.dates.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!(
        "- **updated**: {}\n",
        task.dates.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    if !task.description.is_empty() {
        md.push_str("\n### Description\n");
        md.push_str(&task.description);
        md.push('\n');
    }

    if !task.subtasks.is_empty() {
        md.push_str("\n### Subtasks\n");
        for sub in &task.subtasks {
            push_subtree(&mut md, sub, 0);
        }
    }

    md.push_str("\n### Estimates\n");
    md.push_str(&format_estimates(&enriched.estimates));

    md
}

fn push_subtree(md: &mut String, node: &ResolvedTask, indent: usize) {
    md.push_str(&"  ".repeat(indent));
    md.push_str(&format!("- `{}` {} [{}]", node.id, node.title, node.status));
    if let Some(estimate) = node.estimate {
        md.push_str(&format!(" ({})", estimate));
    }
    md.push('\n');

    for child in &node.subtasks {
        push_subtree(md, child, indent + 1);
    }
}

fn format_estimates(estimates: &EstimateSummary) -> String {
    format!(
        "- **pending**: {}\n- **in progress**: {}\n- **total**: {}\n",
        estimates.pending, estimates.in_progress, estimates.total
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TaskDates, TaskStatus};
    use chrono::Utc;

    fn node(id: &str, status: TaskStatus, estimate: Option<f64>, subtasks: Vec<ResolvedTask>) -> ResolvedTask {
        let now = Utc::now();
        ResolvedTask {
            id: id.to_string(),
            title: format!("Title {}", id),
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
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("md"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::from_str("yaml"), None);
    }

    #[test]
    fn test_markdown_nests_subtasks() {
        let leaf = node("c", TaskStatus::Started, Some(2.0), vec![]);
        let mid = node("b", TaskStatus::Unstarted, Some(3.0), vec![leaf]);
        let root = EnrichedTask {
            task: node("a", TaskStatus::Backlog, None, vec![mid]),
            estimates: EstimateSummary {
                pending: 3.0,
                in_progress: 2.0,
                total: 5.0,
            },
        };

        let md = format_task_markdown(&root);
        assert!(md.starts_with("## Task: Title a\n"));
        assert!(md.contains("- `b` Title b [Unstarted] (3)\n"));
        assert!(md.contains("  - `c` Title c [Started] (2)\n"));
        assert!(md.contains("- **total**: 5\n"));
        assert!(!md.contains("### Description"));
    }
}
