use dsocial_refs::RefError;
use dsocial_store::StoreError;
use thiserror::Error;

use crate::media::MediaError;

/// Errors from publishing and preparing posts.
///
/// Traversal never returns these: a failed fetch ends the page early and is
/// reported on the page itself.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("ref error: {0}")]
    Ref(#[from] RefError),

    #[error(transparent)]
    Media(#[from] MediaError),
}

pub type FeedResult<T> = Result<T, FeedError>;
