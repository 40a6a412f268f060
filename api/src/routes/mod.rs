//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → Health check endpoint (public).
//! - `/assignments` → Submission grading, feedback retrieval, feedback
//!   validation and manual grade overrides (authenticated users; per-route
//!   role checks inside the handlers).

use axum::Router;

use crate::routes::assignments::assignment_routes;
use crate::routes::health::health_routes;
use crate::state::ApiState;

pub mod assignments;
pub mod health;

/// Builds the complete application router for all HTTP endpoints.
///
/// The returned router has `ApiState` as its state type and mounts all API
/// routes under their respective base paths.
pub fn routes() -> Router<ApiState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/assignments", assignment_routes())
}
