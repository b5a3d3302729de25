//! Feed synchronizer.
//!
//! The displayed feed is always exactly the result of the most recently
//! applied fetch. Replies that are not an array of posts leave it untouched,
//! and a fetch begun under a different session is discarded.

use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError, Outcome, Reply};
use crate::auth::SessionStore;
use crate::models::{Credential, Post};

const FEED_PATH: &str = "/feed";

/// What applying a fetch did to the displayed feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedUpdate {
    /// The feed was replaced with this many posts
    Replaced(usize),
    /// The reply was not a list of posts; the feed is unchanged
    Unchanged,
    /// The session changed while the fetch was in flight; result discarded
    Stale,
}

/// An in-flight feed fetch, detached from the synchronizer so it can run
/// on another task.
#[derive(Debug, Clone)]
pub struct FeedRequest {
    credential: Option<Credential>,
    generation: u64,
}

/// A completed fetch waiting to be applied
#[derive(Debug, Clone)]
pub struct FeedResponse {
    reply: Reply,
    generation: u64,
}

impl FeedRequest {
    pub async fn send(self, api: &ApiClient) -> Result<FeedResponse, ApiError> {
        let reply = api.get(FEED_PATH, self.credential.as_ref()).await?;
        Ok(FeedResponse {
            reply,
            generation: self.generation,
        })
    }
}

#[derive(Debug, Default)]
pub struct FeedSynchronizer {
    posts: Vec<Post>,
    fetches_started: u64,
}

impl FeedSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Number of fetches begun so far
    pub fn fetches_started(&self) -> u64 {
        self.fetches_started
    }

    /// Capture the current credential and session generation for a fetch.
    pub fn begin(&mut self, session: &SessionStore) -> FeedRequest {
        self.fetches_started += 1;
        FeedRequest {
            credential: session.credential().cloned(),
            generation: session.generation(),
        }
    }

    /// Apply a completed fetch.
    pub fn apply(&mut self, response: FeedResponse, session: &SessionStore) -> FeedUpdate {
        if response.generation != session.generation() {
            debug!(
                started = response.generation,
                current = session.generation(),
                "Discarding feed fetched under a previous session"
            );
            return FeedUpdate::Stale;
        }

        match response.reply.require_array::<Post>() {
            Outcome::Accepted(posts) => {
                let count = posts.len();
                self.posts = posts;
                debug!(count, "Feed replaced");
                FeedUpdate::Replaced(count)
            }
            other => {
                warn!(reason = ?other.reason(), "Feed reply ignored");
                FeedUpdate::Unchanged
            }
        }
    }

    /// Fetch and apply in one step.
    pub async fn refresh(
        &mut self,
        api: &ApiClient,
        session: &SessionStore,
    ) -> Result<FeedUpdate, ApiError> {
        let response = self.begin(session).send(api).await?;
        Ok(self.apply(response, session))
    }

    /// Drop the displayed posts, used on logout.
    pub fn clear(&mut self) {
        self.posts.clear();
    }
}
