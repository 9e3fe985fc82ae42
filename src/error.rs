use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::store::StoreError;

/// Custom error type for the blob endpoints.
///
/// Every failure is reported to the client as a plain HTTP status with an
/// empty body; the store's failure taxonomy is never exposed on the wire.
/// The cause is kept internally so it can be logged at the response boundary.
#[derive(Debug)]
pub enum ApiError {
    /// The key addresses nothing in the store.
    KeyNotFound(String),
    /// A write failed, whatever the cause. Collapsed to 404 on the wire; the
    /// cause is not distinguished to the client.
    WriteRejected { key: String, source: StoreError },
    /// A read failed with something other than key absence. Unlike absence
    /// this is a real store fault and is surfaced as a server error.
    ReadFailure { key: String, source: StoreError },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::KeyNotFound(key) => {
                tracing::debug!("Key not found: {}", key);
                StatusCode::NOT_FOUND.into_response()
            }
            ApiError::WriteRejected { key, source } => {
                tracing::warn!("Write rejected for key {}: {}", key, source);
                StatusCode::NOT_FOUND.into_response()
            }
            ApiError::ReadFailure { key, source } => {
                tracing::error!("Store read failed for key {}: {}", key, source);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
