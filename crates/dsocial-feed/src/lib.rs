//! Post chains for dSocial.
//!
//! A profile points at its newest post and every post points at the one
//! before it. This crate walks that chain a page at a time and links new
//! posts onto its head.
//!
//! - [`load_posts`] — newest-first traversal with a "load more" cursor
//! - [`link_post`] / [`publish`] — store a post and the profile that heads it
//! - [`media`] — turn image files into the `data:` URLs posts carry

pub mod error;
pub mod media;
pub mod publish;
pub mod traverse;

pub use error::{FeedError, FeedResult};
pub use media::{
    prepare_image, read_image_file, DataUrl, ImageKind, MediaError, MediaResult, MAX_IMAGE_BYTES,
};
pub use publish::{link_post, publish, Published};
pub use traverse::{load_posts, FeedPage, Interruption, DEFAULT_PAGE_SIZE};
