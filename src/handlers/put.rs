use crate::error::ApiError;
use crate::state::AppState;
use crate::store::BlobStore;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};

/// PUT handler - store the raw request body under the addressed key.
///
/// Only registered on routes whose source is writable; a read-only route
/// answers PUT with 405 at the router, before this handler exists. A
/// zero-length body is a valid write of an empty value. Every write failure
/// collapses to 404 on the wire, whatever its cause.
pub async fn put_handler(
    State(state): State<AppState>,
    path: Option<Path<String>>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let path_remainder = path.map(|Path(path)| path).unwrap_or_default();
    let key = state.blob_key(&path_remainder);

    state
        .store()
        .set(&key, body.to_vec())
        .map_err(|source| ApiError::WriteRejected {
            key: key.clone(),
            source,
        })?;

    tracing::debug!("Stored {} bytes under key {}", body.len(), key);
    Ok(StatusCode::OK)
}
