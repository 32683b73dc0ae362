//! Request handlers for the task endpoints.
//!
//! Handlers only translate between HTTP and the store: parse and validate the
//! request, call one `Database` operation, serialize the result.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use super::server::ApiState;
use crate::db::query::{SortOrder, TaskListQuery};
use crate::error::{TaskError, TaskResult};
use crate::types::{EnrichedTask, Priority, Task, TaskInput, TaskPage, TaskStatus};

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// API root - lists the available endpoints.
pub async fn api_root() -> impl IntoResponse {
    Json(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health",
            "tasks": "GET|POST /tasks",
            "task": "GET|PUT|DELETE /tasks/{id}",
        }
    }))
}

/// Query parameters for the task list.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListParams {
    page: Option<usize>,
    limit: Option<usize>,
    status: Option<String>,
    priority: Option<String>,
    sort: Option<String>,
}

impl TaskListParams {
    fn into_query(self, state: &ApiState) -> TaskResult<TaskListQuery> {
        let status = match self.status.filter(|s| !s.is_empty()) {
            Some(s) => Some(TaskStatus::from_str(&s).ok_or_else(|| {
                TaskError::invalid_value("status", &format!("Invalid status: {}", s))
            })?),
            None => None,
        };
        let priority = match self.priority.filter(|p| !p.is_empty()) {
            Some(p) => Some(Priority::from_str(&p).ok_or_else(|| {
                TaskError::invalid_value("priority", &format!("Invalid priority: {}", p))
            })?),
            None => None,
        };

        Ok(TaskListQuery {
            status,
            priority,
            sort: self
                .sort
                .as_deref()
                .map(SortOrder::parse)
                .unwrap_or_default(),
            page: self.page.unwrap_or(1).max(1),
            limit: state.pagination().effective_limit(self.limit),
        })
    }
}

fn body_error(rejection: JsonRejection) -> TaskError {
    TaskError::invalid_value("body", &rejection.body_text())
}

/// `GET /tasks`
pub async fn list_tasks(
    State(state): State<ApiState>,
    params: Result<Query<TaskListParams>, QueryRejection>,
) -> TaskResult<Json<TaskPage>> {
    let Query(params) =
        params.map_err(|e| TaskError::invalid_value("query", &e.body_text()))?;
    let query = params.into_query(&state)?;
    Ok(Json(state.db().list_tasks(&query)?))
}

/// `GET /tasks/{id}`
pub async fn get_task(
    State(state): State<ApiState>,
    Path(task_id): Path<String>,
) -> TaskResult<Json<EnrichedTask>> {
    Ok(Json(state.db().get_task(&task_id)?))
}

/// `POST /tasks`
pub async fn create_task(
    State(state): State<ApiState>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> TaskResult<(StatusCode, Json<EnrichedTask>)> {
    let Json(input) = payload.map_err(body_error)?;
    let fields = input.validate()?;
    let created = state.db().create_task(fields)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /tasks/{id}`
///
/// Replaces every field except the id and creation date.
pub async fn update_task(
    State(state): State<ApiState>,
    Path(task_id): Path<String>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> TaskResult<Json<EnrichedTask>> {
    // Unknown ids are reported before body problems
    state.db().get_task(&task_id)?;

    let Json(input) = payload.map_err(body_error)?;
    let fields = input.validate()?;
    Ok(Json(state.db().update_task(&task_id, fields)?))
}

/// `DELETE /tasks/{id}`
pub async fn delete_task(
    State(state): State<ApiState>,
    Path(task_id): Path<String>,
) -> TaskResult<Json<Task>> {
    Ok(Json(state.db().delete_task(&task_id)?))
}
