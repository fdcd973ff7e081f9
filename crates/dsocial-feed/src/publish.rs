use dsocial_refs::RefStore;
use dsocial_store::ObjectClient;
use dsocial_types::{ContentHash, Post, PostDraft, Profile};
use tracing::info;

use crate::error::FeedResult;

/// Everything written by one post.
#[derive(Clone, Debug, PartialEq)]
pub struct Published {
    pub post_hash: ContentHash,
    pub post: Post,
    pub profile_hash: ContentHash,
    pub profile: Profile,
}

/// Store `draft` as the new head of `current`'s chain, then store the
/// profile version that points at it.
///
/// With no current profile the post starts a new chain (`next` is `None`)
/// and the profile is created from scratch. Other profile fields are
/// carried over unchanged.
pub async fn link_post(
    client: &ObjectClient,
    current: Option<&Profile>,
    draft: PostDraft,
) -> FeedResult<Published> {
    let previous = current.and_then(|profile| profile.most_recent_post.clone());
    let post = draft.into_post(previous);
    let post_hash = client.put_json(&post).await?;

    let profile = current
        .cloned()
        .unwrap_or_default()
        .with_most_recent_post(post_hash.clone());
    let profile_hash = client.put_json(&profile).await?;

    Ok(Published {
        post_hash,
        post,
        profile_hash,
        profile,
    })
}

/// [`link_post`], then move the profile route to the new profile.
///
/// This is a plain read-modify-write on the route: if another writer moved
/// the route since `current` was read, its post drops out of the chain.
pub async fn publish(
    client: &ObjectClient,
    refs: &dyn RefStore,
    current: Option<&Profile>,
    draft: PostDraft,
) -> FeedResult<Published> {
    let published = link_post(client, current, draft).await?;
    refs.set_profile(&published.profile_hash)?;
    info!(
        post = %published.post_hash,
        profile = %published.profile_hash,
        "post published"
    );
    Ok(published)
}
