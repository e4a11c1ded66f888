use thiserror::Error;

use crate::dao::storage::StorageError;

/// Result alias for MongoDB DAO operations.
pub type MongoResult<T> = Result<T, MongoDaoError>;

/// Errors raised by the MongoDB backend.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to connect to MongoDB")]
    Connect {
        #[source]
        source: mongodb::error::Error,
    },
    #[error("MongoDB ping failed")]
    HealthPing {
        #[source]
        source: mongodb::error::Error,
    },
    #[error("failed to ensure index `{index}` on `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("failed to insert game `{id}`")]
    InsertGame {
        id: String,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("failed to save game `{id}`")]
    SaveGame {
        id: String,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("failed to load game `{id}`")]
    LoadGame {
        id: String,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("failed to list games for player `{player_id}`")]
    ListGames {
        player_id: String,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("game `{id}` carries an unparsable revision token `{revision}`")]
    InvalidRevision { id: String, revision: String },
}

impl MongoDaoError {
    fn driver_source(&self) -> Option<&mongodb::error::Error> {
        match self {
            MongoDaoError::Connect { source }
            | MongoDaoError::HealthPing { source }
            | MongoDaoError::EnsureIndex { source, .. }
            | MongoDaoError::InsertGame { source, .. }
            | MongoDaoError::SaveGame { source, .. }
            | MongoDaoError::LoadGame { source, .. }
            | MongoDaoError::ListGames { source, .. } => Some(source),
            MongoDaoError::InvalidRevision { .. } => None,
        }
    }
}

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        if let Some(source) = err.driver_source() {
            if matches!(
                *source.kind,
                mongodb::error::ErrorKind::Authentication { .. }
            ) {
                return StorageError::permission_denied(source.to_string());
            }
        }

        let message = err.to_string();
        StorageError::unavailable(message, err)
    }
}
