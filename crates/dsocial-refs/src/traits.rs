//! The [`RefStore`] trait defining the reference storage interface.

use dsocial_types::ContentHash;

use crate::error::Result;

/// Name of the ref holding the current profile hash.
pub const PROFILE_REF: &str = "profile";

/// Storage backend for named references.
///
/// Implementations must be thread-safe (`Send + Sync`). Writes replace the
/// previous value unconditionally; there is no compare-and-swap, so two
/// writers racing on the same name resolve as last-write-wins.
pub trait RefStore: Send + Sync {
    /// Read a ref by name.
    ///
    /// Returns `Ok(None)` if the ref does not exist.
    fn read_ref(&self, name: &str) -> Result<Option<ContentHash>>;

    /// Write (create or update) a ref.
    fn write_ref(&self, name: &str, hash: &ContentHash) -> Result<()>;

    /// Delete a ref by name.
    ///
    /// Returns `Ok(true)` if the ref existed and was deleted, `Ok(false)` if
    /// it did not exist.
    fn delete_ref(&self, name: &str) -> Result<bool>;

    /// List all refs, sorted by name.
    fn list_refs(&self) -> Result<Vec<(String, ContentHash)>>;

    /// The current profile hash, if one has been set.
    fn profile(&self) -> Result<Option<ContentHash>> {
        self.read_ref(PROFILE_REF)
    }

    /// Point the profile route at `hash`.
    fn set_profile(&self, hash: &ContentHash) -> Result<()> {
        self.write_ref(PROFILE_REF, hash)
    }
}
