use std::path::Path;
use std::sync::Arc;

use dsocial_feed::{load_posts, publish, read_image_file, Interruption, Published};
use dsocial_refs::{FileRefStore, RefStore, PROFILE_REF};
use dsocial_store::{BlobStore, IpfsHttpStore, ObjectClient};
use dsocial_types::{ContentHash, FeedEntry, PostDraft, Profile};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::SdkResult;

/// The view of one profile: its document, the posts loaded so far, and the
/// cursor to continue from.
pub struct Session {
    client: ObjectClient,
    refs: Arc<dyn RefStore>,
    page_size: usize,
    max_image_bytes: u64,
    profile_hash: Option<ContentHash>,
    profile: Option<Profile>,
    posts: Vec<FeedEntry>,
    cursor: Option<ContentHash>,
    interrupted: Option<Interruption>,
}

impl Session {
    pub fn new(store: Arc<dyn BlobStore>, refs: Arc<dyn RefStore>) -> Self {
        let defaults = Config::default();
        Self {
            client: ObjectClient::new(store),
            refs,
            page_size: defaults.page_size,
            max_image_bytes: defaults.max_image_bytes,
            profile_hash: None,
            profile: None,
            posts: Vec::new(),
            cursor: None,
            interrupted: None,
        }
    }

    /// Build a session against the configured IPFS node and state directory.
    pub fn from_config(config: &Config) -> SdkResult<Self> {
        let store = IpfsHttpStore::new(&config.ipfs())?;
        let refs = FileRefStore::open(&config.state_dir)?;
        Ok(Self::new(Arc::new(store), Arc::new(refs))
            .with_page_size(config.page_size)
            .with_max_image_bytes(config.max_image_bytes))
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_image_bytes(mut self, limit: u64) -> Self {
        self.max_image_bytes = limit;
        self
    }

    /// Read the profile route and load the profile it names.
    pub async fn open(&mut self) -> SdkResult<()> {
        let hash = self.refs.profile()?;
        self.load_profile(hash).await;
        Ok(())
    }

    /// Point the route at another profile and load it.
    pub async fn navigate(&mut self, hash: ContentHash) -> SdkResult<()> {
        self.refs.set_profile(&hash)?;
        self.load_profile(Some(hash)).await;
        Ok(())
    }

    /// Load another profile without touching the route.
    pub async fn view(&mut self, hash: ContentHash) {
        self.load_profile(Some(hash)).await;
    }

    /// Forget the current profile and remove the route.
    pub fn clear(&mut self) -> SdkResult<()> {
        self.refs.delete_ref(PROFILE_REF)?;
        self.reset(None);
        Ok(())
    }

    /// Load up to `count` more posts from the cursor. Returns the newly
    /// appended posts.
    pub async fn load_more(&mut self, count: usize) -> &[FeedEntry] {
        let page = load_posts(&self.client, self.cursor.as_ref(), count).await;
        let start = self.posts.len();
        self.posts.extend(page.posts);
        self.cursor = page.next;
        self.interrupted = page.interrupted;
        &self.posts[start..]
    }

    /// Load the next page of the configured size.
    pub async fn load_page(&mut self) -> &[FeedEntry] {
        self.load_more(self.page_size).await
    }

    /// Start the feed over at `hash` instead of the profile's head.
    pub async fn seek(&mut self, hash: ContentHash) -> &[FeedEntry] {
        self.posts.clear();
        self.cursor = Some(hash);
        self.interrupted = None;
        self.load_page().await
    }

    /// Keep loading pages until `count` posts are held, the chain ends, or a
    /// page stops early.
    pub async fn fill(&mut self, count: usize) {
        while self.posts.len() < count && self.has_more() && self.interrupted.is_none() {
            let wanted = (count - self.posts.len()).min(self.page_size.max(1));
            self.load_more(wanted).await;
        }
    }

    /// The first `count` loaded posts and the hash to continue from after
    /// them.
    pub fn window(&self, count: usize) -> (&[FeedEntry], Option<&ContentHash>) {
        let shown = self.posts.len().min(count);
        let next = match self.posts.get(count) {
            Some(entry) => Some(&entry.hash),
            None => self.cursor.as_ref(),
        };
        (&self.posts[..shown], next)
    }

    pub fn has_more(&self) -> bool {
        self.cursor.is_some()
    }

    /// Publish a post on the current profile, or start a new profile if none
    /// is loaded, then reload the feed from its new head.
    pub async fn publish(&mut self, draft: PostDraft) -> SdkResult<Published> {
        let published =
            publish(&self.client, self.refs.as_ref(), self.profile.as_ref(), draft).await?;
        self.reset(Some(published.profile_hash.clone()));
        self.profile = Some(published.profile.clone());
        self.cursor = Some(published.post_hash.clone());
        self.load_page().await;
        Ok(published)
    }

    /// Read an image file, encode it, and publish it with `caption`.
    pub async fn publish_image(
        &mut self,
        caption: impl Into<String>,
        image: impl AsRef<Path>,
    ) -> SdkResult<Published> {
        let image = read_image_file(image, self.max_image_bytes)?;
        self.publish(PostDraft::new(caption, image)).await
    }

    /// Fetch any stored JSON object.
    pub async fn fetch(&self, hash: &ContentHash) -> SdkResult<Value> {
        Ok(self.client.get_json(hash).await?)
    }

    pub fn profile_hash(&self) -> Option<&ContentHash> {
        self.profile_hash.as_ref()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn posts(&self) -> &[FeedEntry] {
        &self.posts
    }

    pub fn cursor(&self) -> Option<&ContentHash> {
        self.cursor.as_ref()
    }

    /// Why the last page stopped early, if it did.
    pub fn interrupted(&self) -> Option<&Interruption> {
        self.interrupted.as_ref()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn client(&self) -> &ObjectClient {
        &self.client
    }

    fn reset(&mut self, profile_hash: Option<ContentHash>) {
        self.profile_hash = profile_hash;
        self.profile = None;
        self.posts.clear();
        self.cursor = None;
        self.interrupted = None;
    }

    async fn load_profile(&mut self, hash: Option<ContentHash>) {
        self.reset(hash.clone());
        let Some(hash) = hash else {
            return;
        };

        match self.client.get_json::<Profile>(&hash).await {
            Ok(profile) => {
                self.cursor = profile.most_recent_post.clone();
                self.profile = Some(profile);
                let loaded = self.load_page().await.len();
                info!(profile = %hash, loaded, "profile opened");
            }
            Err(error) => {
                warn!(profile = %hash, %error, "profile fetch failed");
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("profile_hash", &self.profile_hash)
            .field("posts", &self.posts.len())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}
