//! `#<hash>` routes.
//!
//! A profile is shared as a link whose fragment is the profile hash, e.g.
//! `https://dsocial.example/#QmProfile`. These helpers accept any of the
//! forms a user might paste: the full link, the bare fragment, or the hash.

use dsocial_types::ContentHash;

use crate::error::{RefError, Result};

/// Extract the profile hash from a link, a `#<hash>` fragment, or a bare hash.
///
/// An empty input or an empty fragment yields `Ok(None)`.
pub fn parse_route(input: &str) -> Result<Option<ContentHash>> {
    let trimmed = input.trim();
    let candidate = match trimmed.split_once('#') {
        Some((_, fragment)) => fragment,
        None => trimmed,
    };

    if candidate.is_empty() {
        return Ok(None);
    }

    ContentHash::parse(candidate)
        .map(Some)
        .map_err(|e| RefError::InvalidRoute {
            input: input.to_string(),
            reason: e.to_string(),
        })
}
