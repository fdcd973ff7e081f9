use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] dsocial_store::StoreError),

    #[error("ref error: {0}")]
    Ref(#[from] dsocial_refs::RefError),

    #[error(transparent)]
    Feed(#[from] dsocial_feed::FeedError),

    #[error(transparent)]
    Media(#[from] dsocial_feed::MediaError),
}

pub type SdkResult<T> = Result<T, SdkError>;
