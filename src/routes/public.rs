use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::public::{CountdownResponse, ViewersResponse, WishListResponse, WishRequest, WishSummary},
    error::AppError,
    services::{countdown_service, viewer_service, wish_service},
    state::SharedState,
};

/// Viewer-facing endpoints that back the countdown page.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/public/countdown", get(countdown))
        .route("/public/viewers", get(viewers))
        .route("/public/wishes", get(list_wishes).post(create_wish))
}

#[utoipa::path(
    get,
    path = "/public/countdown",
    tag = "public",
    responses((status = 200, description = "Current countdown projection", body = CountdownResponse))
)]
/// Poll the countdown state without subscribing to the SSE stream.
pub async fn countdown(State(state): State<SharedState>) -> Json<CountdownResponse> {
    Json(countdown_service::snapshot(&state).await)
}

#[utoipa::path(
    get,
    path = "/public/viewers",
    tag = "public",
    responses((status = 200, description = "Blended viewer count", body = ViewersResponse))
)]
/// Poll the blended viewer count.
pub async fn viewers(State(state): State<SharedState>) -> Json<ViewersResponse> {
    Json(viewer_service::current(&state).await)
}

#[utoipa::path(
    get,
    path = "/public/wishes",
    tag = "public",
    responses(
        (status = 200, description = "Most recent wishes, newest first", body = WishListResponse),
        (status = 503, description = "Storage unavailable")
    )
)]
/// List the most recent wishes.
pub async fn list_wishes(
    State(state): State<SharedState>,
) -> Result<Json<WishListResponse>, AppError> {
    Ok(Json(wish_service::recent(&state).await?))
}

#[utoipa::path(
    post,
    path = "/public/wishes",
    tag = "public",
    request_body = WishRequest,
    responses(
        (status = 201, description = "Wish accepted", body = WishSummary),
        (status = 400, description = "Empty, too long, or blocked message"),
        (status = 503, description = "Storage unavailable")
    )
)]
/// Submit a New Year wish.
pub async fn create_wish(
    State(state): State<SharedState>,
    Valid(Json(request)): Valid<Json<WishRequest>>,
) -> Result<(StatusCode, Json<WishSummary>), AppError> {
    let wish = wish_service::submit(&state, &request.message).await?;
    Ok((StatusCode::CREATED, Json(wish)))
}
