//! Service layer: background loops and the logic behind each route tree.

/// Admin command emitter writing the settings row.
pub mod admin_service;
/// Once-per-second countdown tick loop.
pub mod countdown_service;
/// OpenAPI document aggregation.
pub mod documentation;
/// Fire-and-forget effect broadcasting.
pub mod effect_service;
/// Health projection.
pub mod health_service;
/// Command channel driving settings snapshots through the tracker.
pub mod settings_service;
/// SSE subscription plumbing.
pub mod sse_service;
/// Viewer-count estimation loop.
pub mod viewer_service;
/// Wish validation and persistence.
pub mod wish_service;
