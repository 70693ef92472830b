//! Typed MongoDB failure cases.

use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

/// Result alias for MongoDB operations.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Errors raised by the MongoDB relay store.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// Connection URI could not be parsed.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// The rejected URI.
        uri: String,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Client construction failed.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Initial connection ping never succeeded.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Ping attempts made before giving up.
        attempts: u32,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Health-check ping failed on an established connection.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Index creation failed.
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        /// Collection the index belongs to.
        collection: &'static str,
        /// Index name.
        index: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Settings row read failed.
    #[error("failed to load settings row")]
    LoadSettings {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Settings row upsert failed.
    #[error("failed to save settings row")]
    SaveSettings {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Wish insert failed.
    #[error("failed to insert wish `{id}`")]
    InsertWish {
        /// Identifier of the wish that failed to persist.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Wish listing failed.
    #[error("failed to list wishes")]
    ListWishes {
        /// Driver error.
        #[source]
        source: MongoError,
    },
}
