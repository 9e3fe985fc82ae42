//! Classification of the zarr hierarchy node being served.
//!
//! A server is assembled from one node of a zarr hierarchy: an array or a
//! group, possibly nested inside a larger store. The node's kind is decided
//! once, from its metadata keys, before any network binding; a source without
//! recognizable zarr metadata is rejected outright.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::store::{BlobStore, FilesystemStore, StoreError};

/// Errors raised while opening or classifying a source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The node carries no zarr array or group metadata.
    #[error("no zarr array or group metadata found under \"{0}\"")]
    UnrecognizedSource(String),
    /// The node metadata exists but cannot be interpreted.
    #[error("invalid metadata for {key}: {reason}")]
    InvalidMetadata { key: String, reason: String },
    /// The underlying store failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// The kind of hierarchy node a source exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Array,
    Group,
}

/// Zarr v3 consolidated node metadata. Only the discriminant is needed here.
#[derive(Deserialize)]
struct V3NodeMetadata {
    node_type: String,
}

/// A classified zarr hierarchy node backed by a [`BlobStore`].
///
/// Holds the store reference and the node's path within the hierarchy; both
/// are fixed for the lifetime of the routes built from this source.
#[derive(Clone)]
pub struct ZarrSource {
    store: Arc<dyn BlobStore>,
    node_path: String,
    kind: NodeKind,
}

impl std::fmt::Debug for ZarrSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZarrSource")
            .field("node_path", &self.node_path)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl ZarrSource {
    /// Classify the node at `node_path` within `store`.
    ///
    /// Zarr v2 nodes are recognized by a `.zarray` or `.zgroup` key, v3 nodes
    /// by a `zarr.json` key whose `node_type` is `"array"` or `"group"`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::UnrecognizedSource`] if none of those keys
    /// exist, [`SourceError::InvalidMetadata`] if `zarr.json` cannot be
    /// interpreted.
    pub fn from_store(
        store: Arc<dyn BlobStore>,
        node_path: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let node_path = node_path.into().trim_matches('/').to_string();
        let meta_key = |name: &str| {
            if node_path.is_empty() {
                name.to_string()
            } else {
                format!("{node_path}/{name}")
            }
        };

        let kind = if store.contains(&meta_key(".zarray")) {
            NodeKind::Array
        } else if store.contains(&meta_key(".zgroup")) {
            NodeKind::Group
        } else if store.contains(&meta_key("zarr.json")) {
            let key = meta_key("zarr.json");
            let raw = store.get(&key)?;
            let metadata: V3NodeMetadata =
                serde_json::from_slice(&raw).map_err(|err| SourceError::InvalidMetadata {
                    key: key.clone(),
                    reason: err.to_string(),
                })?;
            match metadata.node_type.as_str() {
                "array" => NodeKind::Array,
                "group" => NodeKind::Group,
                other => {
                    return Err(SourceError::InvalidMetadata {
                        key,
                        reason: format!("unknown node_type \"{other}\""),
                    })
                }
            }
        } else {
            return Err(SourceError::UnrecognizedSource(node_path));
        };

        Ok(Self {
            store,
            node_path,
            kind,
        })
    }

    /// Open a filesystem store at `path` and classify its root node.
    ///
    /// The store is opened read-only unless `allow_write` is set.
    pub fn open(path: impl AsRef<Path>, allow_write: bool) -> Result<Self, SourceError> {
        let store = FilesystemStore::new(path, !allow_write)?;
        Self::from_store(Arc::new(store), "")
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Whether the underlying store rejects writes.
    pub fn read_only(&self) -> bool {
        self.store.read_only()
    }

    /// The prefix prepended to every request path when composing store keys.
    /// Empty for a hierarchy root, otherwise the node path with a trailing
    /// separator.
    pub fn key_prefix(&self) -> String {
        if self.node_path.is_empty() {
            String::new()
        } else {
            format!("{}/", self.node_path)
        }
    }

    pub fn store(&self) -> Arc<dyn BlobStore> {
        Arc::clone(&self.store)
    }
}
