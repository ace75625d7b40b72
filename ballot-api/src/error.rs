//! HTTP error mapping for store failures
//!
//! Validation failures carry their field messages as a JSON list; every other
//! failure is a single message under `"error"`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ballot_common::Error;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body could not be decoded (400)
    #[error("{0}")]
    BadRequest(String),

    /// Zero rows changed on update/delete (404)
    #[error("{0}")]
    NotFound(String),

    /// Store failure while serving a collection read; database errors are 500
    #[error(transparent)]
    Listing(Error),

    /// Store failure on any other operation; database errors are 400
    #[error(transparent)]
    Store(#[from] Error),
}

impl ApiError {
    pub fn listing(err: Error) -> Self {
        ApiError::Listing(err)
    }
}

fn store_status(err: &Error, database_status: StatusCode) -> StatusCode {
    match err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::DuplicateVote(_) => StatusCode::CONFLICT,
        Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        Error::Database(_) => database_status,
        Error::Io(_) | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn store_body(err: &Error) -> serde_json::Value {
    match err {
        Error::Validation(messages) => json!({ "error": messages }),
        other => json!({ "error": other.to_string() }),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "message": message })),
            ApiError::Listing(err) => (
                store_status(err, StatusCode::INTERNAL_SERVER_ERROR),
                store_body(err),
            ),
            ApiError::Store(err) => (store_status(err, StatusCode::BAD_REQUEST), store_body(err)),
        };

        if status.is_server_error() {
            error!("Request failed ({}): {}", status, self);
        } else if status != StatusCode::NOT_FOUND {
            warn!("Request rejected ({}): {}", status, self);
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let validation = ApiError::from(Error::Validation(vec!["No name specified.".into()]));
        assert_eq!(validation.into_response().status(), StatusCode::BAD_REQUEST);

        let duplicate = ApiError::from(Error::DuplicateVote("v1".into()));
        assert_eq!(duplicate.into_response().status(), StatusCode::CONFLICT);

        let timeout = ApiError::listing(Error::Timeout(Duration::from_millis(5)));
        assert_eq!(timeout.into_response().status(), StatusCode::GATEWAY_TIMEOUT);

        let listing = ApiError::listing(Error::Database(sqlx_error()));
        assert_eq!(listing.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let write = ApiError::from(Error::Database(sqlx_error()));
        assert_eq!(write.into_response().status(), StatusCode::BAD_REQUEST);

        let undecodable = ApiError::BadRequest("Failed to parse the request body".into());
        assert_eq!(undecodable.into_response().status(), StatusCode::BAD_REQUEST);
    }

    fn sqlx_error() -> sqlx::Error {
        sqlx::Error::RowNotFound
    }
}
