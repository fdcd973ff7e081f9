//! Mutable references for dSocial.
//!
//! Profiles and posts are immutable, so "the current profile" has to live
//! somewhere else. This crate stores named pointers to content hashes, the
//! way a browser keeps the profile hash in the URL fragment (`#<hash>`).
//!
//! # Modules
//!
//! - [`error`] — Error types for ref operations
//! - [`traits`] — The [`RefStore`] trait defining the storage interface
//! - [`names`] — Ref name validation
//! - [`route`] — Parsing of `#<hash>` routes
//! - [`memory`] — In-memory [`InMemoryRefStore`] for tests
//! - [`file`] — JSON-file backed [`FileRefStore`]

pub mod error;
pub mod file;
pub mod memory;
pub mod names;
pub mod route;
pub mod traits;

pub use error::{RefError, Result};
pub use file::FileRefStore;
pub use memory::InMemoryRefStore;
pub use names::validate_ref_name;
pub use route::parse_route;
pub use traits::{RefStore, PROFILE_REF};
