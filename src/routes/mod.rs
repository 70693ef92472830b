use axum::Router;

use crate::state::SharedState;

/// Show control endpoints behind the admin passcode.
pub mod admin;
/// Swagger UI routes.
pub mod docs;
/// Health endpoint.
pub mod health;
/// Viewer-facing countdown, viewers, and wish endpoints.
pub mod public;
/// SSE stream endpoints.
pub mod sse;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(public::router())
        .merge(admin::router(state.clone()));

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
