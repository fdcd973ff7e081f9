//! High-level SDK for dSocial.
//!
//! Ties the blob store, the profile route, and the feed together behind a
//! single [`Session`], the programmatic equivalent of having the app open on
//! a profile. This is the main entry point for applications embedding
//! dSocial.

pub mod config;
pub mod error;
pub mod session;

pub use config::{Config, GatewayConfig, DEFAULT_CONFIG_FILE};
pub use error::{SdkError, SdkResult};
pub use session::Session;

// Re-export key types
pub use dsocial_feed::{FeedPage, Interruption, Published};
pub use dsocial_types::{ContentHash, FeedEntry, Post, PostDraft, Profile};
