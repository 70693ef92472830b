//! Public countdown, viewers, and wish DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{dao::models::WishEntity, dto::common::CountdownSnapshot};

/// Countdown state returned by `/public/countdown`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CountdownResponse {
    /// Current countdown projection.
    #[serde(flatten)]
    pub countdown: CountdownSnapshot,
    /// Whether the backend is running without storage.
    pub degraded: bool,
}

/// Blended viewer count returned by `/public/viewers`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ViewersResponse {
    /// Displayed "watching now" figure.
    pub watching: u64,
}

/// Payload submitting a New Year wish.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct WishRequest {
    /// Wish text; trimmed server-side, at most 200 characters.
    #[validate(length(min = 1, max = 200, message = "wish must be 1 to 200 characters"))]
    pub message: String,
}

/// A stored wish as exposed to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct WishSummary {
    /// Server-assigned identifier.
    pub id: Uuid,
    /// The wish message.
    pub message: String,
    /// Creation instant, RFC 3339.
    pub created_at: String,
}

impl From<WishEntity> for WishSummary {
    fn from(entity: WishEntity) -> Self {
        Self {
            id: entity.id,
            message: entity.message,
            created_at: entity.created_at,
        }
    }
}

/// Recent wishes returned by `GET /public/wishes`.
#[derive(Debug, Serialize, ToSchema)]
pub struct WishListResponse {
    /// Most recent wishes, newest first.
    pub wishes: Vec<WishSummary>,
}
