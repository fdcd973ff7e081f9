use std::sync::Arc;

use bytes::Bytes;
use dsocial_types::ContentHash;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

/// JSON document client over a [`BlobStore`].
///
/// Documents are encoded as compact JSON text and stored as blobs. Reads
/// decode the blob as UTF-8 and parse it; either step failing is an error.
#[derive(Clone)]
pub struct ObjectClient {
    store: Arc<dyn BlobStore>,
}

impl ObjectClient {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// The underlying blob store.
    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    /// Fetch the blob at `hash` and parse it as `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, hash: &ContentHash) -> StoreResult<T> {
        let data = self.store.cat(hash).await?;
        let text = std::str::from_utf8(&data).map_err(|e| StoreError::InvalidUtf8 {
            hash: hash.clone(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(text).map_err(|e| StoreError::Decode {
            hash: hash.clone(),
            reason: e.to_string(),
        })
    }

    /// Serialize `value` as JSON, store it, and return its hash.
    pub async fn put_json<T: Serialize + ?Sized>(&self, value: &T) -> StoreResult<ContentHash> {
        let data = serde_json::to_vec(value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.put(Bytes::from(data)).await
    }
}

impl std::fmt::Debug for ObjectClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectClient").finish_non_exhaustive()
    }
}
