use serde::{Deserialize, Deserializer, Serialize};

use crate::hash::{optional_hash, ContentHash};

/// One immutable node of a user's post chain.
///
/// `next` is a back-reference to the chronologically previous post. There
/// are no forward pointers, so a chain can only be walked newest-first from
/// the head recorded in a [`Profile`](crate::Profile).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub caption: String,
    /// Image as a `data:` URL.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image: String,
    #[serde(default, with = "optional_hash")]
    pub next: Option<ContentHash>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A post together with the hash it was loaded from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub hash: ContentHash,
    #[serde(flatten)]
    pub post: Post,
}

impl FeedEntry {
    pub fn new(hash: ContentHash, post: Post) -> Self {
        Self { hash, post }
    }
}

/// Caption and prepared image, not yet linked into a chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostDraft {
    pub caption: String,
    pub image: String,
}

impl PostDraft {
    pub fn new(caption: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            image: image.into(),
        }
    }

    /// Link the draft in front of `next`.
    pub fn into_post(self, next: Option<ContentHash>) -> Post {
        Post {
            caption: self.caption,
            image: self.image,
            next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn post_wire_format() {
        let post = PostDraft::new("sunset", "data:image/png;base64,AAAA")
            .into_post(Some(ContentHash::parse("QmPrev").unwrap()));
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(
            json,
            json!({
                "caption": "sunset",
                "image": "data:image/png;base64,AAAA",
                "next": "QmPrev",
            })
        );
    }

    #[test]
    fn first_post_has_null_next() {
        let post = PostDraft::new("hello", "data:,").into_post(None);
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["next"], serde_json::Value::Null);
    }

    #[test]
    fn post_without_next_field_parses() {
        let post: Post =
            serde_json::from_str(r#"{"caption":"c","image":"data:,"}"#).unwrap();
        assert!(post.next.is_none());
    }

    #[test]
    fn null_text_fields_read_as_empty() {
        let post: Post =
            serde_json::from_str(r#"{"caption":null,"image":null,"next":"/ipfs/QmPrev"}"#)
                .unwrap();
        assert_eq!(post.caption, "");
        assert_eq!(post.image, "");
        assert_eq!(post.next, Some(ContentHash::parse("QmPrev").unwrap()));
    }

    #[test]
    fn feed_entry_flattens_post() {
        let entry = FeedEntry::new(
            ContentHash::parse("QmSelf").unwrap(),
            PostDraft::new("c", "i").into_post(None),
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            json!({ "hash": "QmSelf", "caption": "c", "image": "i", "next": null })
        );
    }
}
