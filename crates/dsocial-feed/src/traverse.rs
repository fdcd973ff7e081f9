use dsocial_store::ObjectClient;
use dsocial_types::{ContentHash, FeedEntry, Post};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Posts fetched per page when the caller has no preference.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Where and why a traversal stopped before its count ran out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Interruption {
    pub hash: ContentHash,
    pub reason: String,
}

/// One page of a post chain, newest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FeedPage {
    pub posts: Vec<FeedEntry>,
    /// Cursor for the next page. `None` once the chain's tail is reached.
    pub next: Option<ContentHash>,
    pub interrupted: Option<Interruption>,
}

impl FeedPage {
    /// Returns `true` if another page can be requested.
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

/// A decoded post and the outcome of parsing its `next` link.
type DecodedPost = (Post, Result<Option<ContentHash>, String>);

/// Split a fetched post document into the post and its `next` link.
///
/// The link is decoded on its own so that a post whose body reads fine is
/// kept even when its link is unusable.
fn decode_post(mut document: Value) -> Result<DecodedPost, String> {
    let raw_next = document.as_object_mut().and_then(|fields| fields.remove("next"));
    let post: Post = serde_json::from_value(document).map_err(|e| format!("decode error: {e}"))?;

    let next = match raw_next {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(link)) if link.trim().is_empty() => Ok(None),
        Some(Value::String(link)) => ContentHash::parse(&link)
            .map(Some)
            .map_err(|e| format!("unusable next link: {e}")),
        Some(other) => Err(format!("unusable next link: {other}")),
    };
    Ok((post, next))
}

/// Walk up to `count` posts starting at `start`.
///
/// Each post is fetched, annotated with its own hash, and the walk moves to
/// its `next`. It stops when `count` posts have been read, when the chain
/// ends, or when a fetch fails. A failure is logged and recorded on the
/// page; the cursor is left on the failing hash, so asking for the next page
/// retries it.
///
/// A post whose `next` link cannot be parsed is still returned. The page
/// then ends with an interruption on that post and no cursor, since there
/// is nowhere left to go.
///
/// Cycles are not detected; `count` is the only bound.
pub async fn load_posts(
    client: &ObjectClient,
    start: Option<&ContentHash>,
    count: usize,
) -> FeedPage {
    let mut posts = Vec::new();
    let mut next = start.cloned();
    let mut remaining = count;
    let mut interrupted = None;

    while remaining > 0 {
        let Some(hash) = next.clone() else {
            break;
        };
        remaining -= 1;

        let decoded = client
            .get_json::<Value>(&hash)
            .await
            .map_err(|error| error.to_string())
            .and_then(decode_post);

        match decoded {
            Ok((mut post, Ok(link))) => {
                post.next = link.clone();
                next = link;
                posts.push(FeedEntry::new(hash, post));
            }
            Ok((post, Err(reason))) => {
                warn!(hash = %hash, %reason, "post has an unusable next link, ending page");
                posts.push(FeedEntry::new(hash.clone(), post));
                interrupted = Some(Interruption { hash, reason });
                next = None;
                break;
            }
            Err(reason) => {
                warn!(hash = %hash, %reason, "post fetch failed, ending page early");
                interrupted = Some(Interruption { hash, reason });
                break;
            }
        }
    }

    debug!(
        loaded = posts.len(),
        has_more = next.is_some(),
        "feed page loaded"
    );
    FeedPage {
        posts,
        next,
        interrupted,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use bytes::Bytes;
    use dsocial_store::{BlobStore, InMemoryBlobStore, StoreError, StoreResult};
    use dsocial_types::{PostDraft, Profile};
    use proptest::prelude::*;

    use super::*;
    use crate::publish::link_post;

    /// Delegates to an in-memory store but refuses to serve one hash.
    struct FailingStore {
        inner: InMemoryBlobStore,
        fail_on: std::sync::Mutex<Option<ContentHash>>,
    }

    #[async_trait]
    impl BlobStore for FailingStore {
        async fn put(&self, data: Bytes) -> StoreResult<ContentHash> {
            self.inner.put(data).await
        }

        async fn cat(&self, hash: &ContentHash) -> StoreResult<Bytes> {
            if self.fail_on.lock().unwrap().as_ref() == Some(hash) {
                return Err(StoreError::Http("connection reset".into()));
            }
            self.inner.cat(hash).await
        }
    }

    /// Publish `n` posts; returns the post hashes newest first.
    async fn build_chain(client: &ObjectClient, n: usize) -> Vec<ContentHash> {
        let mut profile: Option<Profile> = None;
        let mut hashes = Vec::new();
        for i in 0..n {
            let draft = PostDraft::new(format!("post {i}"), "data:,");
            let published = link_post(client, profile.as_ref(), draft).await.unwrap();
            hashes.push(published.post_hash.clone());
            profile = Some(published.profile);
        }
        hashes.reverse();
        hashes
    }

    fn memory_client() -> ObjectClient {
        ObjectClient::new(Arc::new(InMemoryBlobStore::new()))
    }

    #[tokio::test]
    async fn full_chain_when_count_covers_it() {
        let client = memory_client();
        let hashes = build_chain(&client, 4).await;

        let page = load_posts(&client, hashes.first(), 10).await;
        assert_eq!(page.posts.len(), 4);
        let loaded: Vec<&ContentHash> = page.posts.iter().map(|p| &p.hash).collect();
        assert_eq!(loaded, hashes.iter().collect::<Vec<_>>());
        assert_eq!(page.posts[0].post.caption, "post 3");
        assert_eq!(page.posts[3].post.caption, "post 0");
        assert!(page.posts[3].post.next.is_none());
        assert!(page.next.is_none());
        assert!(!page.has_more());
        assert!(page.interrupted.is_none());
    }

    #[tokio::test]
    async fn partial_page_returns_continuation() {
        let client = memory_client();
        let hashes = build_chain(&client, 5).await;

        let page = load_posts(&client, hashes.first(), 2).await;
        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.next.as_ref(), Some(&hashes[2]));

        let rest = load_posts(&client, page.next.as_ref(), 10).await;
        assert_eq!(rest.posts.len(), 3);
        assert_eq!(rest.posts[0].hash, hashes[2]);
        assert!(rest.next.is_none());
    }

    #[tokio::test]
    async fn no_start_means_empty_page() {
        let client = memory_client();
        let page = load_posts(&client, None, 10).await;
        assert!(page.posts.is_empty());
        assert!(!page.has_more());
    }

    #[tokio::test]
    async fn zero_count_does_not_fetch() {
        let client = memory_client();
        let start = ContentHash::parse("QmNeverFetched").unwrap();
        let page = load_posts(&client, Some(&start), 0).await;
        assert!(page.posts.is_empty());
        assert_eq!(page.next, Some(start));
        assert!(page.interrupted.is_none());
    }

    #[tokio::test]
    async fn failure_keeps_cursor_on_failing_hash() {
        let store = Arc::new(FailingStore {
            inner: InMemoryBlobStore::new(),
            fail_on: std::sync::Mutex::new(None),
        });
        let client = ObjectClient::new(store.clone());
        let hashes = build_chain(&client, 4).await;
        *store.fail_on.lock().unwrap() = Some(hashes[2].clone());

        let page = load_posts(&client, hashes.first(), 10).await;
        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.next.as_ref(), Some(&hashes[2]));
        let interruption = page.interrupted.unwrap();
        assert_eq!(interruption.hash, hashes[2]);
        assert!(interruption.reason.contains("connection reset"));

        *store.fail_on.lock().unwrap() = None;
        let retry = load_posts(&client, page.next.as_ref(), 10).await;
        assert_eq!(retry.posts.len(), 2);
        assert!(retry.interrupted.is_none());
    }

    #[tokio::test]
    async fn undecodable_post_stops_the_walk() {
        let store = Arc::new(InMemoryBlobStore::new());
        let client = ObjectClient::new(store.clone());
        let garbage = store.put(Bytes::from_static(b"<html>")).await.unwrap();

        let page = load_posts(&client, Some(&garbage), 3).await;
        assert!(page.posts.is_empty());
        assert_eq!(page.next, Some(garbage));
        assert!(page.interrupted.is_some());
    }

    #[tokio::test]
    async fn path_form_link_is_followed() {
        let store = Arc::new(InMemoryBlobStore::new());
        let client = ObjectClient::new(store.clone());
        let hashes = build_chain(&client, 1).await;
        let head = format!(r#"{{"caption":"ok","image":"data:,","next":"/ipfs/{}"}}"#, hashes[0]);
        let head = store.put(Bytes::from(head)).await.unwrap();

        let page = load_posts(&client, Some(&head), 10).await;
        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.posts[0].post.next.as_ref(), Some(&hashes[0]));
        assert_eq!(page.posts[1].hash, hashes[0]);
        assert!(page.interrupted.is_none());
    }

    #[tokio::test]
    async fn null_caption_post_is_kept() {
        let store = Arc::new(InMemoryBlobStore::new());
        let client = ObjectClient::new(store.clone());
        let hash = store
            .put(Bytes::from_static(br#"{"caption":null,"image":"data:,","next":null}"#))
            .await
            .unwrap();

        let page = load_posts(&client, Some(&hash), 10).await;
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].post.caption, "");
        assert!(page.interrupted.is_none());
        assert!(!page.has_more());
    }

    #[tokio::test]
    async fn malformed_link_keeps_post_and_ends_page() {
        let store = Arc::new(InMemoryBlobStore::new());
        let client = ObjectClient::new(store.clone());
        let hash = store
            .put(Bytes::from_static(br#"{"caption":"last","image":"data:,","next":"not a hash"}"#))
            .await
            .unwrap();

        let page = load_posts(&client, Some(&hash), 10).await;
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].post.caption, "last");
        assert!(page.posts[0].post.next.is_none());
        assert!(page.next.is_none());
        let interruption = page.interrupted.unwrap();
        assert_eq!(interruption.hash, hash);
        assert!(interruption.reason.contains("not a hash"));
    }

    proptest! {
        #[test]
        fn page_length_is_min_of_count_and_chain(len in 0usize..12, count in 0usize..15) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (hashes, page) = rt.block_on(async {
                let client = memory_client();
                let hashes = build_chain(&client, len).await;
                let page = load_posts(&client, hashes.first(), count).await;
                (hashes, page)
            });

            prop_assert_eq!(page.posts.len(), len.min(count));
            if count < len {
                prop_assert_eq!(page.next.as_ref(), Some(&hashes[count]));
            } else {
                prop_assert!(page.next.is_none());
            }
        }
    }
}
