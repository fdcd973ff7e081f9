use async_trait::async_trait;
use bytes::Bytes;
use dsocial_types::ContentHash;

use crate::error::StoreResult;

/// Content-addressed blob store.
///
/// All implementations must satisfy these invariants:
/// - Blobs are immutable once written: the same bytes always produce the
///   same hash, and writing them again is a no-op.
/// - `cat` of a hash that was never written fails; it never returns empty
///   bytes in place of a missing blob.
/// - The store never interprets blob contents.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a blob and return its content hash.
    async fn put(&self, data: Bytes) -> StoreResult<ContentHash>;

    /// Fetch a blob by content hash.
    async fn cat(&self, hash: &ContentHash) -> StoreResult<Bytes>;
}
