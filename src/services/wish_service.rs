//! Wish validation, persistence, and fan-out.

use tracing::info;

use crate::{
    dao::models::WishEntity,
    dto::{
        public::{WishListResponse, WishSummary},
        sse::{ServerEvent, WishCreatedEvent},
    },
    error::ServiceError,
    state::SharedState,
};

/// Newest-first page size for the public wish listing.
const RECENT_WISHES_LIMIT: i64 = 50;

/// Validate and store a new wish, then announce it to all viewers.
///
/// Moderation runs before any storage call so a degraded backend still
/// rejects blocked content with the same error shape.
pub async fn submit(state: &SharedState, message: &str) -> Result<WishSummary, ServiceError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(ServiceError::InvalidInput(
            "Wish message must not be empty".into(),
        ));
    }
    if message.chars().count() > 200 {
        return Err(ServiceError::InvalidInput(
            "Wish message must be at most 200 characters".into(),
        ));
    }
    if state.config().find_banned_word(message).is_some() {
        return Err(ServiceError::InvalidInput(
            "Wish message contains blocked words".into(),
        ));
    }

    let store = state.relay_store().await.ok_or(ServiceError::Degraded)?;
    let wish = WishEntity::new(message.to_string());
    store
        .insert_wish(wish.clone())
        .await
        .map_err(ServiceError::Unavailable)?;

    info!(wish_id = %wish.id, "Stored new wish");
    broadcast_wish(state, &wish);
    Ok(WishSummary::from(wish))
}

/// Most recent wishes, newest first.
pub async fn recent(state: &SharedState) -> Result<WishListResponse, ServiceError> {
    let store = state.relay_store().await.ok_or(ServiceError::Degraded)?;
    let wishes = store
        .recent_wishes(RECENT_WISHES_LIMIT)
        .await
        .map_err(ServiceError::Unavailable)?;

    Ok(WishListResponse {
        wishes: wishes.into_iter().map(WishSummary::from).collect(),
    })
}

fn broadcast_wish(state: &SharedState, wish: &WishEntity) {
    let event = WishCreatedEvent {
        id: wish.id,
        message: wish.message.clone(),
        created_at: wish.created_at.clone(),
    };
    if let Ok(payload) = ServerEvent::json(Some("wish".to_string()), &event) {
        state.public_sse().broadcast(payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, state::AppState};

    #[tokio::test]
    async fn rejects_blocked_words_before_touching_storage() {
        let state = AppState::new(AppConfig::default());
        let err = submit(&state, "fuck 2026").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn rejects_whitespace_only_messages() {
        let state = AppState::new(AppConfig::default());
        let err = submit(&state, "   ").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn reports_degraded_without_storage() {
        let state = AppState::new(AppConfig::default());
        let err = submit(&state, "Happy new year!").await.unwrap_err();
        assert!(matches!(err, ServiceError::Degraded));
    }
}
