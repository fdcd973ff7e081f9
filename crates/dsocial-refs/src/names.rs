//! Ref name validation.
//!
//! Ref names double as keys in the on-disk refs file, so they are kept to a
//! conservative alphabet:
//! - Must be non-empty
//! - Only ASCII letters, digits, `-`, `_`, `.` and `/`
//! - Must not contain `..` or `//`
//! - Must not start or end with `.` or `/`

use crate::error::{RefError, Result};

fn invalid(name: &str, reason: &str) -> RefError {
    RefError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Validate a ref name, returning `Ok(())` if valid.
///
/// # Examples
///
/// ```
/// use dsocial_refs::names::validate_ref_name;
///
/// assert!(validate_ref_name("profile").is_ok());
/// assert!(validate_ref_name("bookmarks/alice").is_ok());
/// assert!(validate_ref_name("").is_err());
/// assert!(validate_ref_name("bad..name").is_err());
/// ```
pub fn validate_ref_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, "ref name must not be empty"));
    }

    if let Some(ch) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/')))
    {
        return Err(invalid(name, &format!("contains forbidden character: {ch:?}")));
    }

    if name.contains("..") {
        return Err(invalid(name, "must not contain '..'"));
    }

    if name.contains("//") {
        return Err(invalid(name, "must not contain '//'"));
    }

    if name.starts_with('.') || name.ends_with('.') {
        return Err(invalid(name, "must not start or end with '.'"));
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err(invalid(name, "must not start or end with '/'"));
    }

    Ok(())
}
