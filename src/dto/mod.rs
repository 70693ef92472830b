//! Request, response, and SSE payload definitions.

/// Admin command DTOs.
pub mod admin;
/// Shared projections used by several surfaces.
pub mod common;
/// Health endpoint DTOs.
pub mod health;
/// Public countdown and wish DTOs.
pub mod public;
/// SSE event envelope and payloads.
pub mod sse;
