//! HTTP/JSON transport for the minitweet service.
//!
//! This module provides the `ApiClient` for sending requests to the
//! configured base URL, and the `Reply`/`Outcome` types callers use to
//! classify what came back.
//!
//! The transport never inspects status codes. A reply is whatever the
//! server sent, decoded as JSON when possible and kept as raw text when not.

pub mod client;
pub mod error;
pub mod reply;

pub use client::ApiClient;
pub use error::ApiError;
pub use reply::{Outcome, Reply};
pub use reqwest::Method;
