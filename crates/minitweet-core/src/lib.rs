//! Core library for the minitweet client.
//!
//! The session and data-synchronization layer of a minimal social-feed
//! client:
//!
//! - `api`: the single outbound-request path and reply classification
//! - `auth`: the session store, durable credential storage, login/signup
//! - `feed`: on-demand, fail-soft feed replacement
//! - `composer`: post submission followed by a feed refresh
//! - `config`: base URL and storage settings

pub mod api;
pub mod auth;
pub mod composer;
pub mod config;
pub mod feed;
pub mod models;

pub use api::{ApiClient, ApiError, Outcome, Reply};
pub use auth::{AuthError, SessionState, SessionStore};
pub use composer::{ComposeError, PostComposer, SubmitOutcome, MAX_POST_LENGTH};
pub use config::Config;
pub use feed::{FeedSynchronizer, FeedUpdate};
pub use models::{Credential, LoginForm, Post, SignupForm};
