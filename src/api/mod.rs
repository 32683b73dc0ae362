//! REST API over the task store.
//!
//! | Method | Path | Result |
//! |--------|------|--------|
//! | GET | `/tasks` | `{ data, total, page, limit }` |
//! | POST | `/tasks` | 201 + enriched task |
//! | GET | `/tasks/{id}` | enriched task |
//! | PUT | `/tasks/{id}` | enriched task |
//! | DELETE | `/tasks/{id}` | deleted task |
//! | GET | `/health` | `{ status, version }` |
//!
//! Errors are `{ "error": message, "code": CODE }` with 400, 404 or 500.

mod handlers;
mod server;

pub use server::{ApiState, ServerHandle, build_router, start_server};
