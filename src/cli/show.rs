//! Show subcommand for taskboard CLI

use anyhow::{Result, bail};
use clap::Args;

use crate::db::Database;
use crate::format::{OutputFormat, format_task_markdown};

/// Arguments for the show subcommand
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Task id
    pub id: String,

    /// Output format: markdown or json
    #[arg(short, long, default_value = "markdown")]
    pub format: String,
}

/// Render one task the way `GET /tasks/{id}` would return it.
pub fn run_show(db: &Database, args: &ShowArgs) -> Result<String> {
    let Some(format) = OutputFormat::from_str(&args.format) else {
        bail!("Unknown format '{}', expected markdown or json", args.format);
    };

    let task = db.get_task(&args.id)?;
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&task)?),
        OutputFormat::Markdown => Ok(format_task_markdown(&task)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TaskFields, TaskStatus};

    fn fields(title: &str, subtasks: Vec<String>) -> TaskFields {
        TaskFields {
            title: title.to_string(),
            description: String::new(),
            priority: None,
            status: TaskStatus::Unstarted,
            estimate: Some(2.0),
            subtasks,
        }
    }

    #[test]
    fn test_show_markdown_and_json() {
        let db = Database::open_in_memory();
        let child = db.create_task(fields("Child", vec![])).unwrap();
        let parent = db
            .create_task(fields("Parent", vec![child.task.id.clone()]))
            .unwrap();

        let md = run_show(
            &db,
            &ShowArgs {
                id: parent.task.id.clone(),
                format: "markdown".to_string(),
            },
        )
        .unwrap();
        assert!(md.contains("## Task: Parent"));
        assert!(md.contains("Child [Unstarted] (2)"));

        let json = run_show(
            &db,
            &ShowArgs {
                id: parent.task.id.clone(),
                format: "json".to_string(),
            },
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["estimates"]["pending"], 2.0);
        assert_eq!(value["subtasks"][0]["title"], "Child");
    }

    #[test]
    fn test_show_unknown_task_and_format() {
        let db = Database::open_in_memory();
        let missing = ShowArgs {
            id: "nope".to_string(),
            format: "json".to_string(),
        };
        let err = run_show(&db, &missing).unwrap_err();
        assert!(err.to_string().contains("Task not found: nope"));

        let bad_format = ShowArgs {
            id: "nope".to_string(),
            format: "yaml".to_string(),
        };
        assert!(run_show(&db, &bad_format).is_err());
    }
}
