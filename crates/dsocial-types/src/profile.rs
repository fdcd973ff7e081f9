use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::hash::{optional_hash, ContentHash};

/// Root document of a user.
///
/// A profile is immutable once stored: publishing a post stores a new
/// profile with a new hash. Fields other than `mostRecentPost` are carried
/// over untouched from one version to the next.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Head of the post chain, `None` before the first post.
    #[serde(rename = "mostRecentPost", default, with = "optional_hash")]
    pub most_recent_post: Option<ContentHash>,
    /// Every other field of the stored document.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    /// An empty profile with no posts.
    pub fn new() -> Self {
        Self::default()
    }

    /// The next version of this profile, pointing at `post`.
    pub fn with_most_recent_post(&self, post: ContentHash) -> Self {
        Self {
            most_recent_post: Some(post),
            extra: self.extra.clone(),
        }
    }

    /// Look up a field other than `mostRecentPost`.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Returns `true` if the profile has at least one post.
    pub fn has_posts(&self) -> bool {
        self.most_recent_post.is_some()
    }
}
