use crate::error::ApiError;
use crate::state::AppState;
use crate::store::BlobStore;
use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};

/// GET/HEAD handler - fetch the raw blob stored under the addressed key.
///
/// The full store key is the route's hierarchy prefix followed by the request
/// path remainder; the remainder is absent on the root route. GET returns the
/// value bytes untouched; HEAD performs the same lookup but always responds
/// with an empty body. Key absence maps to 404, any other store failure to a
/// logged 500.
pub async fn get_handler(
    State(state): State<AppState>,
    method: Method,
    path: Option<Path<String>>,
) -> Result<Response, ApiError> {
    let path_remainder = path.map(|Path(path)| path).unwrap_or_default();
    let key = state.blob_key(&path_remainder);

    match state.store().get(&key) {
        Ok(blob) => {
            tracing::debug!("Serving {} bytes for key {}", blob.len(), key);
            if method == Method::HEAD {
                Ok(StatusCode::OK.into_response())
            } else {
                Ok((StatusCode::OK, blob).into_response())
            }
        }
        Err(err) if err.is_absence() => Err(ApiError::KeyNotFound(key)),
        Err(err) => Err(ApiError::ReadFailure { key, source: err }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes;
    use crate::store::{BlobStore, MemoryStore, StoreError};
    use axum::{body::Body, http::Request, routing::get, Router};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app(prefix: &str, entries: &[(&str, &[u8])]) -> Router {
        let store = MemoryStore::new();
        for (key, value) in entries {
            store.set(key, value.to_vec()).unwrap();
        }
        let state = AppState::new(Arc::new(store), prefix);

        Router::new()
            .route(routes::ROOT, get(get_handler))
            .route(routes::BLOB, get(get_handler))
            .with_state(state)
    }

    async fn response_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_get_returns_exact_bytes() {
        let app = test_app("", &[("0.0", b"\x01\x02"), (".zarray", b"{}")]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/0.0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_bytes(response).await, b"\x01\x02");
    }

    #[tokio::test]
    async fn test_get_missing_key_is_404_empty() {
        let app = test_app("", &[("0.0", b"\x01\x02")]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_head_found_has_empty_body() {
        let app = test_app("", &[("0.0", b"\x01\x02")]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("HEAD")
                    .uri("/0.0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_head_missing_key_is_404() {
        let app = test_app("", &[]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("HEAD")
                    .uri("/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_nested_prefix_composes_store_key() {
        // Route serving the "nested" node must read store key "nested/0.0".
        let app = test_app("nested/", &[("nested/0.0", b"\x07")]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/0.0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_bytes(response).await, b"\x07");
    }

    #[tokio::test]
    async fn test_root_path_without_prefix_is_404() {
        let app = test_app("", &[(".zarray", b"{}")]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_repeated_get_is_idempotent() {
        let app = test_app("", &[("0.0", b"\x01\x02")]);

        for _ in 0..3 {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri("/0.0")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response_bytes(response).await, b"\x01\x02");
        }
    }

    /// A store whose reads fail with a non-absence error.
    struct BrokenStore;

    impl BlobStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Vec<u8>, StoreError> {
            Err(StoreError::Other("backing device lost".to_string()))
        }

        fn set(&self, _key: &str, _value: Vec<u8>) -> Result<(), StoreError> {
            Err(StoreError::Other("backing device lost".to_string()))
        }

        fn contains(&self, _key: &str) -> bool {
            false
        }

        fn read_only(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_non_absence_read_failure_is_500() {
        let state = AppState::new(Arc::new(BrokenStore), "");
        let app = Router::new()
            .route(routes::BLOB, get(get_handler))
            .with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/0.0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response_bytes(response).await.is_empty());
    }
}
