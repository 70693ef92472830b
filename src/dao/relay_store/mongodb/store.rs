//! MongoDB implementation of [`RelayStore`].

use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::doc,
    options::IndexOptions,
};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
};
use crate::dao::{
    models::{SETTINGS_DOC_ID, SettingsEntity, WishEntity},
    relay_store::RelayStore,
    storage::StorageResult,
};

const SETTINGS_COLLECTION_NAME: &str = "settings";
const WISHES_COLLECTION_NAME: &str = "wishes";

/// MongoDB-backed relay store holding the settings row and wishes.
#[derive(Clone)]
pub struct MongoRelayStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
}

struct MongoState {
    // Kept alive for the lifetime of the pool; the database handle is
    // what the operations borrow.
    _client: Client,
    database: Database,
}

impl MongoRelayStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState {
                _client: client,
                database,
            }),
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let collection = self.wishes_collection().await;
        let index = IndexModel::builder()
            .keys(doc! {"created_at": -1})
            .options(
                IndexOptions::builder()
                    .name(Some("wish_created_at_idx".to_owned()))
                    .build(),
            )
            .build();

        collection
            .create_index(index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: WISHES_COLLECTION_NAME,
                index: "created_at",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn settings_collection(&self) -> Collection<SettingsEntity> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<SettingsEntity>(SETTINGS_COLLECTION_NAME)
    }

    async fn wishes_collection(&self) -> Collection<WishEntity> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<WishEntity>(WISHES_COLLECTION_NAME)
    }

    async fn ping(&self) -> MongoResult<()> {
        let database = self.database().await;
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn load_settings(&self) -> MongoResult<Option<SettingsEntity>> {
        let collection = self.settings_collection().await;
        collection
            .find_one(doc! {"_id": SETTINGS_DOC_ID})
            .await
            .map_err(|source| MongoDaoError::LoadSettings { source })
    }

    async fn save_settings(&self, settings: SettingsEntity) -> MongoResult<()> {
        let collection = self.settings_collection().await;
        collection
            .replace_one(doc! {"_id": SETTINGS_DOC_ID}, &settings)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveSettings { source })?;
        Ok(())
    }

    async fn insert_wish(&self, wish: WishEntity) -> MongoResult<()> {
        let id = wish.id;
        let collection = self.wishes_collection().await;
        collection
            .insert_one(&wish)
            .await
            .map_err(|source| MongoDaoError::InsertWish { id, source })?;
        Ok(())
    }

    async fn recent_wishes(&self, limit: i64) -> MongoResult<Vec<WishEntity>> {
        let collection = self.wishes_collection().await;
        collection
            .find(doc! {})
            .sort(doc! {"created_at": -1})
            .limit(limit)
            .await
            .map_err(|source| MongoDaoError::ListWishes { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListWishes { source })
    }
}

impl RelayStore for MongoRelayStore {
    fn load_settings(&self) -> BoxFuture<'static, StorageResult<Option<SettingsEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.load_settings().await.map_err(Into::into) })
    }

    fn save_settings(&self, settings: SettingsEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_settings(settings).await.map_err(Into::into) })
    }

    fn insert_wish(&self, wish: WishEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_wish(wish).await.map_err(Into::into) })
    }

    fn recent_wishes(&self, limit: i64) -> BoxFuture<'static, StorageResult<Vec<WishEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.recent_wishes(limit).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }
}
