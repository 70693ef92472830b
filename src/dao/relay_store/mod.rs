//! Storage trait covering the relay surface: one settings row, an
//! append-only wishes list.

#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;

use crate::dao::{
    models::{SettingsEntity, WishEntity},
    storage::StorageResult,
};

/// Abstraction over the persistence layer for the singleton settings row
/// and the wishes list.
pub trait RelayStore: Send + Sync {
    /// Fetch the settings row, `None` when it has never been written.
    fn load_settings(&self) -> BoxFuture<'static, StorageResult<Option<SettingsEntity>>>;
    /// Upsert the settings row (last write wins).
    fn save_settings(&self, settings: SettingsEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Append a wish. Wishes are never mutated or deleted.
    fn insert_wish(&self, wish: WishEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Most recent wishes, newest first.
    fn recent_wishes(&self, limit: i64) -> BoxFuture<'static, StorageResult<Vec<WishEntity>>>;
    /// Cheap connectivity probe.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
