//! Authentication: the session store, its durable backends, and the
//! login/signup flows.
//!
//! This module provides:
//! - `SessionStore`: the single owner of the current credential
//! - `TokenStorage`: durable slot the credential survives restarts in,
//!   backed by a JSON file (`FileStorage`), the OS keychain
//!   (`KeyringStorage`), or memory (`MemoryStorage`)
//! - `login` / `signup`: short flows ending in a session transition

pub mod credentials;
pub mod flows;
pub mod session;
pub mod storage;

pub use credentials::KeyringStorage;
pub use flows::{login, request_login, request_signup, signup, AuthError};
pub use session::{SessionState, SessionStore};
pub use storage::{FileStorage, MemoryStorage, TokenStorage};
