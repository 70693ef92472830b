//! DTO definitions used by the admin command surface.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::common::SettingsSnapshot;

/// Toggle the force-elapse flag.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ForceRequest {
    /// `true` activates the celebration immediately for all viewers.
    pub active: bool,
}

/// Set, shift, or clear the simulated target.
///
/// Exactly one of `timestamp` / `seconds_from_now` may be provided; with
/// neither, the simulation is cleared and the real target applies again.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SimulateRequest {
    /// Explicit RFC 3339 target instant.
    pub timestamp: Option<String>,
    /// Rehearsal shortcut: target the instant this many seconds from now.
    #[validate(range(min = 1, max = 86_400, message = "rehearsal offset must be 1s to 24h"))]
    pub seconds_from_now: Option<i64>,
}

/// Adjust the viewer-count boost.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ViewerBoostRequest {
    /// Value added to the displayed viewer count.
    pub extra_viewers: u32,
}

/// Generic action acknowledgement used by admin endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// Settings row image returned after reads and writes.
#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SettingsResponse(pub SettingsSnapshot);
