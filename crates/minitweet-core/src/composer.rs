//! Post composer: owns the draft and submits it.
//!
//! A successful post clears the draft and triggers exactly one feed
//! refresh. A rejected post keeps the draft so nothing typed is lost.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError, Outcome, Reply};
use crate::auth::SessionStore;
use crate::feed::{FeedSynchronizer, FeedUpdate};
use crate::models::Credential;

const POSTS_PATH: &str = "/tweets";

/// Maximum post length. The server measures it in UTF-8 bytes.
pub const MAX_POST_LENGTH: usize = 280;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Failed to post")]
    Rejected,

    #[error(transparent)]
    Transport(#[from] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Result of the refresh that followed the post
    pub feed: FeedUpdate,
}

#[derive(Serialize)]
struct NewPost<'a> {
    content: &'a str,
}

/// A post submission detached from the composer
#[derive(Debug, Clone)]
pub struct PostRequest {
    content: String,
    credential: Option<Credential>,
}

impl PostRequest {
    pub async fn send(self, api: &ApiClient) -> Result<Reply, ApiError> {
        let body = NewPost {
            content: &self.content,
        };
        api.post(POSTS_PATH, &body, self.credential.as_ref()).await
    }
}

#[derive(Debug, Default)]
pub struct PostComposer {
    draft: String,
}

impl PostComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Append a character if the draft has room. Returns whether it was added.
    pub fn push_char(&mut self, c: char) -> bool {
        if self.draft.len() + c.len_utf8() > MAX_POST_LENGTH {
            return false;
        }
        self.draft.push(c);
        true
    }

    pub fn pop_char(&mut self) -> Option<char> {
        self.draft.pop()
    }

    /// Bytes left before the server limit
    pub fn remaining(&self) -> usize {
        MAX_POST_LENGTH.saturating_sub(self.draft.len())
    }

    /// True when the draft has nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.draft.trim().is_empty()
    }

    pub fn begin(&self, session: &SessionStore) -> PostRequest {
        PostRequest {
            content: self.draft.clone(),
            credential: session.credential().cloned(),
        }
    }

    /// Apply a post reply. `Ok` means the post was accepted and the draft
    /// cleared; the caller refreshes the feed.
    pub fn finish(&mut self, reply: Reply) -> Result<(), ComposeError> {
        match reply.require_field("id") {
            Outcome::Accepted(id) => {
                info!(%id, "Post created");
                self.draft.clear();
                Ok(())
            }
            rejected => {
                warn!(reason = ?rejected.reason(), "Post rejected");
                Err(ComposeError::Rejected)
            }
        }
    }

    /// Submit the draft, then refresh the feed once on success.
    pub async fn submit(
        &mut self,
        api: &ApiClient,
        session: &SessionStore,
        feed: &mut FeedSynchronizer,
    ) -> Result<SubmitOutcome, ComposeError> {
        let reply = self.begin(session).send(api).await?;
        self.finish(reply)?;
        let update = feed.refresh(api, session).await?;
        Ok(SubmitOutcome { feed: update })
    }
}
