use dsocial_types::{ContentHash, TypeError};

/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested blob was not found.
    #[error("blob not found: {0}")]
    NotFound(ContentHash),

    /// Content hash mismatch on read (data corruption).
    #[error("hash mismatch for {hash}: computed {computed}")]
    HashMismatch {
        hash: ContentHash,
        computed: ContentHash,
    },

    /// The blob is not valid UTF-8 text.
    #[error("blob {hash} is not UTF-8: {reason}")]
    InvalidUtf8 { hash: ContentHash, reason: String },

    /// The blob is text but not the expected JSON document.
    #[error("blob {hash} is not a valid document: {reason}")]
    Decode { hash: ContentHash, reason: String },

    /// Serialization failure on write.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The store returned a hash that does not parse.
    #[error(transparent)]
    InvalidHash(#[from] TypeError),

    /// Transport failure talking to a remote store.
    #[error("http error: {0}")]
    Http(String),

    /// The remote store answered with a non-success status.
    #[error("gateway returned {status}: {message}")]
    Gateway { status: u16, message: String },

    /// The remote store answered with a body we could not understand.
    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
