//! HTTP server for the task REST API.
//!
//! This module provides the axum router, the shared handler state, and the
//! server lifecycle handle.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::handlers;
use crate::config::PaginationConfig;
use crate::db::Database;
use crate::error::{ErrorCode, ErrorKind, TaskError};

/// State shared across handlers.
#[derive(Clone)]
pub struct ApiState {
    db: Database,
    pagination: Arc<PaginationConfig>,
}

impl ApiState {
    pub fn new(db: Database, pagination: PaginationConfig) -> Self {
        Self {
            db,
            pagination: Arc::new(pagination),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::Validation | ErrorKind::ReferentialIntegrity => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(code = ?self.code, "Request failed: {}", self.message);
        }

        let body = ErrorBody {
            error: self.message,
            code: self.code,
            field: self.field,
        };
        (status, Json(body)).into_response()
    }
}

/// Build the router with all routes.
pub fn build_router(state: ApiState) -> Router {
    // Browser clients are served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::api_root))
        .route("/health", get(handlers::health))
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/tasks/{task_id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle for a running server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            error!("API server task failed: {}", e);
        }
    }
}

/// Bind `addr` and serve the API in a background task.
pub async fn start_server(state: ApiState, addr: SocketAddr) -> anyhow::Result<ServerHandle> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    info!("API server listening on http://{}", bound_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("API server shutting down");
            })
            .await
        {
            error!("API server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr: bound_addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        build_router(ApiState::new(
            Database::open_in_memory(),
            PaginationConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["status"], "healthy");
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let cases = [
            (TaskError::dependency_cycle(), StatusCode::BAD_REQUEST),
            (TaskError::task_referenced(), StatusCode::BAD_REQUEST),
            (TaskError::task_not_found("x"), StatusCode::NOT_FOUND),
            (TaskError::persistence("disk"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let state = ApiState::new(Database::open_in_memory(), PaginationConfig::default());
        let handle = start_server(state, "127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        assert_ne!(handle.addr().port(), 0);
        handle.shutdown().await;
    }
}
