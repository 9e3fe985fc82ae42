use crate::store::BlobStore;
use std::sync::Arc;

/// Immutable per-route state, bound at route construction.
///
/// Holds the shared store reference and the hierarchy path prefix that is
/// prepended to every request path when composing the full store key.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn BlobStore>,
    key_prefix: Arc<str>,
}

impl AppState {
    /// Invariant: a non-empty `key_prefix` always ends with `/`.
    pub fn new(store: Arc<dyn BlobStore>, key_prefix: impl AsRef<str>) -> Self {
        let key_prefix = key_prefix.as_ref();
        debug_assert!(key_prefix.is_empty() || key_prefix.ends_with('/'));
        Self {
            store,
            key_prefix: Arc::from(key_prefix),
        }
    }

    pub fn store(&self) -> &dyn BlobStore {
        self.store.as_ref()
    }

    /// Compose the full store key for a request path remainder.
    pub fn blob_key(&self, path_remainder: &str) -> String {
        format!("{}{}", self.key_prefix, path_remainder)
    }
}
