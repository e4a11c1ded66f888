use std::error::Error;
use thiserror::Error;

use crate::dao::models::GameEntity;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A conditional write lost the race against a concurrent writer, or an
    /// insert collided with an existing document. Callers re-read and retry.
    #[error("write conflict: {message}")]
    Conflict { message: String },
    #[error("permission denied: {message}")]
    PermissionDenied { message: String },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a conflict error for a lost conditional write.
    pub fn conflict(message: impl Into<String>) -> Self {
        StorageError::Conflict {
            message: message.into(),
        }
    }

    /// Construct a permission error for authorization failures.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        StorageError::PermissionDenied {
            message: message.into(),
        }
    }
}

/// Opaque compare-and-swap token identifying one committed revision of a
/// game document. MongoDB backs it with a revision counter, CouchDB with the
/// native `_rev`; the service layer only ever threads it back into the next
/// conditional write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasToken(pub String);

/// A game entity together with the CAS token of the revision it was read at.
#[derive(Debug, Clone)]
pub struct StoredGame {
    pub entity: GameEntity,
    pub cas: CasToken,
}
