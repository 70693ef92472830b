//! Persistence layer for the settings row and the wishes list.

/// Database model definitions and domain conversions.
pub mod models;
/// Relay-store trait and backend implementations.
pub mod relay_store;
/// Storage abstraction error types.
pub mod storage;
