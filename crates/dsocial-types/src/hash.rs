use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Longest hash accepted by [`ContentHash::parse`].
pub const MAX_HASH_LEN: usize = 128;

const IPFS_PATH_PREFIX: &str = "/ipfs/";
const IPFS_URL_PREFIX: &str = "ipfs://";

/// Content address of a stored document.
///
/// A `ContentHash` is whatever the backing store hands out for a blob: an
/// IPFS CID (`Qm...`, `bafy...`) or the hex digest used by the in-memory
/// store. Identical content always produces the same hash. The value is kept
/// as text because every encoding in use is ASCII alphanumeric.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    /// Parse and validate a hash. Surrounding whitespace is ignored, and the
    /// IPFS path forms `/ipfs/<cid>` and `ipfs://<cid>` reduce to the bare CID.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let trimmed = s.trim();
        let value = trimmed
            .strip_prefix(IPFS_PATH_PREFIX)
            .or_else(|| trimmed.strip_prefix(IPFS_URL_PREFIX))
            .unwrap_or(trimmed);
        let invalid = |reason: &str| TypeError::InvalidHash {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        if value.is_empty() {
            return Err(invalid("empty"));
        }
        if value.len() > MAX_HASH_LEN {
            return Err(invalid("too long"));
        }
        if !value.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(invalid("must be ASCII alphanumeric"));
        }
        Ok(Self(value.to_string()))
    }

    /// Hex-encode a raw 32-byte digest.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        Self(hex::encode(digest))
    }

    /// The hash as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short representation (first 8 characters).
    pub fn short(&self) -> &str {
        let end = self.0.len().min(8);
        &self.0[..end]
    }

    /// The URL fragment form, `#<hash>`.
    pub fn to_fragment(&self) -> String {
        format!("#{}", self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentHash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContentHash {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Serde adapter for nullable hash links.
///
/// Writes `null` for `None`. On read, a missing field, `null`, and `""` all
/// mean "no link", matching documents written by older clients that left the
/// field out entirely.
pub mod optional_hash {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::ContentHash;

    pub fn serialize<S>(value: &Option<ContentHash>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(hash) => serializer.serialize_str(hash.as_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<ContentHash>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => ContentHash::parse(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
