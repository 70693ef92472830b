use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::{
        admin::{
            ActionResponse, ForceRequest, SettingsResponse, SimulateRequest, ViewerBoostRequest,
        },
        common::SettingsSnapshot,
    },
    error::AppError,
    services::admin_service,
    state::SharedState,
};

pub(crate) const ADMIN_PASSCODE_HEADER: &str = "x-admin-passcode";

/// Admin-only show control endpoints.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/admin/settings", get(get_settings))
        .route("/admin/force", post(set_force))
        .route("/admin/simulate", post(simulate))
        .route("/admin/effects/fireworks", post(trigger_fireworks))
        .route("/admin/effects/sound", post(test_sound))
        .route("/admin/viewers", post(set_viewer_boost))
        .route_layer(middleware::from_fn_with_state(
            state,
            require_admin_passcode,
        ))
}

/// Retrieve the current settings row.
#[utoipa::path(
    get,
    path = "/admin/settings",
    tag = "admin",
    params(("X-Admin-Passcode" = String, Header, description = "Shared admin passcode")),
    responses(
        (status = 200, description = "Current settings", body = SettingsSnapshot),
        (status = 401, description = "Missing or wrong passcode")
    )
)]
pub async fn get_settings(State(state): State<SharedState>) -> Json<SettingsResponse> {
    Json(admin_service::get_settings(&state).await)
}

/// Toggle the force-elapse flag.
#[utoipa::path(
    post,
    path = "/admin/force",
    tag = "admin",
    params(("X-Admin-Passcode" = String, Header, description = "Shared admin passcode")),
    request_body = ForceRequest,
    responses(
        (status = 200, description = "Updated settings", body = SettingsSnapshot),
        (status = 401, description = "Missing or wrong passcode")
    )
)]
pub async fn set_force(
    State(state): State<SharedState>,
    Json(request): Json<ForceRequest>,
) -> Json<SettingsResponse> {
    Json(admin_service::set_force(&state, request.active).await)
}

/// Set, shift, or clear the simulated target instant.
#[utoipa::path(
    post,
    path = "/admin/simulate",
    tag = "admin",
    params(("X-Admin-Passcode" = String, Header, description = "Shared admin passcode")),
    request_body = SimulateRequest,
    responses(
        (status = 200, description = "Updated settings", body = SettingsSnapshot),
        (status = 400, description = "Malformed timestamp or conflicting fields"),
        (status = 401, description = "Missing or wrong passcode")
    )
)]
pub async fn simulate(
    State(state): State<SharedState>,
    Valid(Json(request)): Valid<Json<SimulateRequest>>,
) -> Result<Json<SettingsResponse>, AppError> {
    Ok(Json(admin_service::simulate(&state, request).await?))
}

/// Fire a fireworks burst on every connected viewer.
#[utoipa::path(
    post,
    path = "/admin/effects/fireworks",
    tag = "admin",
    params(("X-Admin-Passcode" = String, Header, description = "Shared admin passcode")),
    responses(
        (status = 200, description = "Fireworks triggered", body = ActionResponse),
        (status = 401, description = "Missing or wrong passcode")
    )
)]
pub async fn trigger_fireworks(State(state): State<SharedState>) -> Json<ActionResponse> {
    Json(admin_service::trigger_fireworks(&state).await)
}

/// Play the test sound on every connected viewer.
#[utoipa::path(
    post,
    path = "/admin/effects/sound",
    tag = "admin",
    params(("X-Admin-Passcode" = String, Header, description = "Shared admin passcode")),
    responses(
        (status = 200, description = "Test sound triggered", body = ActionResponse),
        (status = 401, description = "Missing or wrong passcode")
    )
)]
pub async fn test_sound(State(state): State<SharedState>) -> Json<ActionResponse> {
    Json(admin_service::test_sound(&state).await)
}

/// Adjust the viewer-count boost.
#[utoipa::path(
    post,
    path = "/admin/viewers",
    tag = "admin",
    params(("X-Admin-Passcode" = String, Header, description = "Shared admin passcode")),
    request_body = ViewerBoostRequest,
    responses(
        (status = 200, description = "Updated settings", body = SettingsSnapshot),
        (status = 401, description = "Missing or wrong passcode")
    )
)]
pub async fn set_viewer_boost(
    State(state): State<SharedState>,
    Json(request): Json<ViewerBoostRequest>,
) -> Json<SettingsResponse> {
    Json(admin_service::set_viewer_boost(&state, request.extra_viewers).await)
}

async fn require_admin_passcode(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(ADMIN_PASSCODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned())
        .ok_or_else(|| {
            AppError::Unauthorized("missing admin passcode header `X-Admin-Passcode`".into())
        })?;

    if provided == state.config().admin_passcode() {
        Ok(next.run(req).await)
    } else {
        Err(AppError::Unauthorized("invalid admin passcode".into()))
    }
}
