use std::time::Duration;

use axum::{Json, http::StatusCode, http::header, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

use crate::{dao::storage::StorageError, state::machine::GameError};

/// Errors that can occur in service layer operations.
///
/// This is the single taxonomy callers see: raw storage failures are
/// translated here and never leak past the mutation layer. Domain errors
/// ([`ServiceError::Game`]) are deterministic and must not be retried;
/// [`ServiceError::Contention`] and [`ServiceError::Unavailable`] are
/// transient and may be.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A game operation violated one of its preconditions.
    #[error(transparent)]
    Game(#[from] GameError),
    /// No game document exists under the given id.
    #[error("game `{id}` not found")]
    GameNotFound { id: String },
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Application is running in degraded mode without storage.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
    /// Conditional writes kept losing against concurrent commits.
    #[error("the game changed while saving; please try again")]
    Contention,
    /// The action class is being invoked too frequently.
    #[error("please wait {}s before performing this action again", .retry_after.as_secs().max(1))]
    RateLimited { retry_after: Duration },
    /// Authorization problem reported by the storage backend.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict { .. } => ServiceError::Contention,
            StorageError::PermissionDenied { message } => ServiceError::PermissionDenied(message),
            other @ StorageError::Unavailable { .. } => ServiceError::Unavailable(other),
        }
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Guarded action invoked too frequently.
    #[error("{message}")]
    RateLimited {
        message: String,
        retry_after_secs: u64,
    },
    /// Caller is not allowed to perform the action.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Game(game_err) => match game_err {
                GameError::PlayerNotFound { .. } | GameError::SubmissionNotFound { .. } => {
                    AppError::NotFound(game_err.to_string())
                }
                _ => AppError::Conflict(game_err.to_string()),
            },
            ServiceError::GameNotFound { .. } => AppError::NotFound(err.to_string()),
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Degraded => AppError::ServiceUnavailable("degraded mode".into()),
            ServiceError::Contention => AppError::Conflict(err.to_string()),
            ServiceError::RateLimited { retry_after } => AppError::RateLimited {
                message: err.to_string(),
                retry_after_secs: retry_after.as_secs().max(1),
            },
            ServiceError::PermissionDenied(message) => AppError::Forbidden(message),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let retry_after = match &self {
            AppError::RateLimited {
                retry_after_secs, ..
            } => Some(*retry_after_secs),
            _ => None,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        let mut response = (status, payload).into_response();
        if let Some(secs) = retry_after {
            if let Ok(value) = secs.to_string().parse() {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_conflict_or_not_found() {
        let err: AppError = ServiceError::Game(GameError::AlreadySubmitted).into();
        assert!(matches!(err, AppError::Conflict(_)));

        let err: AppError = ServiceError::Game(GameError::PlayerNotFound {
            id: "ghost".into(),
        })
        .into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn storage_conflicts_surface_as_retryable_contention() {
        let service: ServiceError = StorageError::conflict("rev mismatch").into();
        assert!(matches!(service, ServiceError::Contention));

        let app: AppError = service.into();
        assert!(matches!(app, AppError::Conflict(_)));
    }

    #[test]
    fn rate_limited_carries_wait_hint() {
        let err: AppError = ServiceError::RateLimited {
            retry_after: Duration::from_millis(1500),
        }
        .into();
        match err {
            AppError::RateLimited {
                retry_after_secs, ..
            } => assert_eq!(retry_after_secs, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
