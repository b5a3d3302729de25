//! Utility functions for display formatting.

pub mod format;

pub use format::{format_timestamp, mask, relative_age, truncate_string};
