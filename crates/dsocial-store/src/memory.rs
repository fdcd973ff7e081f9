use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use dsocial_types::ContentHash;

use crate::error::{StoreError, StoreResult};
use crate::hasher::ContentHasher;
use crate::traits::BlobStore;

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. Blobs are addressed by
/// [`ContentHasher::BLOB`] and re-verified against their hash on every read.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<ContentHash, Bytes>>,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Returns `true` if a blob with this hash is stored.
    pub fn contains(&self, hash: &ContentHash) -> bool {
        self.blobs.read().expect("lock poisoned").contains_key(hash)
    }

}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, data: Bytes) -> StoreResult<ContentHash> {
        let hash = ContentHasher::BLOB.hash(&data);
        let mut map = self.blobs.write().expect("lock poisoned");
        map.entry(hash.clone()).or_insert(data);
        Ok(hash)
    }

    async fn cat(&self, hash: &ContentHash) -> StoreResult<Bytes> {
        let data = {
            let map = self.blobs.read().expect("lock poisoned");
            map.get(hash).cloned()
        };
        let data = data.ok_or_else(|| StoreError::NotFound(hash.clone()))?;

        let computed = ContentHasher::BLOB.hash(&data);
        if computed != *hash {
            return Err(StoreError::HashMismatch {
                hash: hash.clone(),
                computed,
            });
        }
        Ok(data)
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_and_cat() {
        let store = InMemoryBlobStore::new();
        let hash = store.put(Bytes::from_static(b"hello world")).await.unwrap();
        let data = store.cat(&hash).await.unwrap();
        assert_eq!(&data[..], b"hello world");
    }

    #[tokio::test]
    async fn same_content_produces_same_hash() {
        let store = InMemoryBlobStore::new();
        let h1 = store.put(Bytes::from_static(b"identical")).await.unwrap();
        let h2 = store.put(Bytes::from_static(b"identical")).await.unwrap();
        assert_eq!(h1, h2);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn different_content_produces_different_hashes() {
        let store = InMemoryBlobStore::new();
        let h1 = store.put(Bytes::from_static(b"aaa")).await.unwrap();
        let h2 = store.put(Bytes::from_static(b"bbb")).await.unwrap();
        assert_ne!(h1, h2);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn cat_missing_is_not_found() {
        let store = InMemoryBlobStore::new();
        let hash = ContentHasher::BLOB.hash(b"never written");
        let err = store.cat(&hash).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(h) if h == hash));
    }

    #[tokio::test]
    async fn put_makes_blob_visible() {
        let store = InMemoryBlobStore::new();
        assert!(store.is_empty());
        let hash = store.put(Bytes::from_static(b"stored")).await.unwrap();
        assert!(store.contains(&hash));
        assert!(!store.is_empty());
    }

    #[tokio::test]
    async fn corrupted_blob_fails_verification() {
        let store = InMemoryBlobStore::new();
        let hash = store.put(Bytes::from_static(b"original")).await.unwrap();
        store
            .blobs
            .write()
            .unwrap()
            .insert(hash.clone(), Bytes::from_static(b"tampered"));

        let err = store.cat(&hash).await.unwrap_err();
        assert!(matches!(err, StoreError::HashMismatch { .. }));
    }

    #[test]
    fn debug_format() {
        let store = InMemoryBlobStore::default();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryBlobStore"));
        assert!(debug.contains("blob_count"));
    }
}
