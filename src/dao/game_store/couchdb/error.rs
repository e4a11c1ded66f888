use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::storage::StorageError;

/// Result alias for CouchDB DAO operations.
pub type CouchResult<T> = Result<T, CouchDaoError>;

/// Errors raised by the CouchDB backend.
#[derive(Debug, Error)]
pub enum CouchDaoError {
    #[error("failed to build the CouchDB HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to query database `{database}`")]
    DatabaseQuery {
        database: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to create database `{database}`")]
    DatabaseCreate {
        database: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("database `{database}` responded with status {status}")]
    DatabaseStatus {
        database: String,
        status: StatusCode,
    },
    #[error("request to `{path}` failed")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to `{path}` returned status {status}")]
    RequestStatus { path: String, status: StatusCode },
    #[error("failed to decode response from `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to deserialize document from `{path}`")]
    DeserializeValue {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid document id `{doc_id}`: {kind}")]
    InvalidDocId { doc_id: String, kind: &'static str },
}

impl From<CouchDaoError> for StorageError {
    fn from(err: CouchDaoError) -> Self {
        let status = match &err {
            CouchDaoError::RequestStatus { status, .. }
            | CouchDaoError::DatabaseStatus { status, .. } => Some(*status),
            _ => None,
        };

        match status {
            // a stale `_rev` or colliding insert comes back as 409
            Some(StatusCode::CONFLICT) => StorageError::conflict(err.to_string()),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN) => {
                StorageError::permission_denied(err.to_string())
            }
            _ => {
                let message = err.to_string();
                StorageError::unavailable(message, err)
            }
        }
    }
}
