//! Content-addressed blob storage for dSocial.
//!
//! Every profile and post is stored as an immutable JSON blob identified by
//! its content hash. The store itself never interprets blob contents; JSON
//! encoding lives one layer up in [`ObjectClient`].
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`IpfsHttpStore`] -- IPFS HTTP RPC client (`add` / `cat`)
//!
//! # Design Rules
//!
//! 1. Blobs are immutable once written (content-addressing guarantees this).
//! 2. A read of an unknown hash is an error, not an empty value.
//! 3. Errors are propagated to the caller; nothing here retries.

pub mod error;
pub mod hasher;
pub mod ipfs;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use hasher::ContentHasher;
pub use ipfs::{IpfsConfig, IpfsHttpStore, DEFAULT_API_URL};
pub use memory::InMemoryBlobStore;
pub use object::ObjectClient;
pub use traits::BlobStore;
