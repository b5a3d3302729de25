//! Data models for minitweet entities.
//!
//! - `Post`: a single feed entry as returned by `GET /feed`
//! - `Credential`: the opaque bearer token issued by `POST /login`
//! - `LoginForm`, `SignupForm`: transient request payloads

pub mod account;
pub mod post;

pub use account::{Credential, LoginForm, SignupForm};
pub use post::Post;
