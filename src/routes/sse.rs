use std::convert::Infallible;

use axum::{
    Router, extract::State, http::HeaderMap, response::sse::Sse, routing::get,
};
use futures::Stream;
use tracing::info;

use crate::{
    dto::{
        common::SettingsSnapshot,
        sse::{PublicHandshake, ServerEvent},
    },
    error::AppError,
    routes::admin::ADMIN_PASSCODE_HEADER,
    services::{
        countdown_service,
        sse_service::{self, StreamKind},
    },
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/sse/public",
    tag = "sse",
    responses((status = 200, description = "Public SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream realtime countdown, effect, viewer, and wish events to viewers.
pub async fn public_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let (receiver, connection_id) = sse_service::subscribe_public(&state);
    info!(%connection_id, "New public SSE connection");
    sse_service::broadcast_public_info(state.public_sse(), "public stream connected");

    let handshake = PublicHandshake {
        countdown: countdown_service::snapshot(&state).await,
        settings: SettingsSnapshot::from(&state.settings_snapshot().await),
    };
    let initial = ServerEvent::json(Some("handshake".to_string()), &handshake).ok();

    sse_service::to_sse_stream(receiver, StreamKind::Public(state, connection_id), initial)
}

#[utoipa::path(
    get,
    path = "/sse/admin",
    tag = "sse",
    params(("X-Admin-Passcode" = String, Header, description = "Shared admin passcode")),
    responses(
        (status = 200, description = "Admin SSE stream", content_type = "text/event-stream", body = String),
        (status = 401, description = "Missing or wrong passcode")
    )
)]
/// Stream admin-only events, establishing the single admin session token.
pub async fn admin_stream(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, AppError> {
    let provided = headers
        .get(ADMIN_PASSCODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            AppError::Unauthorized("missing admin passcode header `X-Admin-Passcode`".into())
        })?;
    if provided != state.config().admin_passcode() {
        return Err(AppError::Unauthorized("invalid admin passcode".into()));
    }

    let (receiver, token) = sse_service::subscribe_admin(&state).await?;
    info!("New admin SSE connection");
    sse_service::broadcast_admin_handshake(state.admin_sse(), &token);
    Ok(sse_service::to_sse_stream(
        receiver,
        StreamKind::Admin(state),
        None,
    ))
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/sse/public", get(public_stream))
        .route("/sse/admin", get(admin_stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, state::AppState};

    #[tokio::test]
    async fn admin_stream_rejects_missing_passcode() {
        let state = AppState::new(AppConfig::default());
        let result = admin_stream(State(state.clone()), HeaderMap::new()).await;
        assert!(matches!(result.err(), Some(AppError::Unauthorized(_))));
        // The token slot must stay free for the real operator.
        assert!(state.admin_token().lock().await.is_none());
    }

    #[tokio::test]
    async fn admin_stream_accepts_configured_passcode() {
        let state = AppState::new(AppConfig::default());
        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_PASSCODE_HEADER, "bbv2026".parse().unwrap());

        assert!(admin_stream(State(state.clone()), headers).await.is_ok());
        assert!(state.admin_token().lock().await.is_some());
    }
}
