//! Foundation types for dSocial.
//!
//! This crate provides the content hash and the two document types every
//! other dSocial crate exchanges. Profiles and posts are plain JSON documents
//! stored by content hash; a profile points at its newest post and every post
//! points at the one before it.
//!
//! # Key Types
//!
//! - [`ContentHash`] — Validated content address (IPFS CID or hex digest)
//! - [`Profile`] — Root document of a user, holding the head of the post chain
//! - [`Post`] — Immutable node of the post chain
//! - [`FeedEntry`] — A post annotated with the hash it was loaded from
//! - [`PostDraft`] — Caption and image waiting to be linked into a chain

pub mod error;
pub mod hash;
pub mod post;
pub mod profile;

pub use error::TypeError;
pub use hash::ContentHash;
pub use post::{FeedEntry, Post, PostDraft};
pub use profile::Profile;
