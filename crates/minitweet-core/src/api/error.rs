use thiserror::Error;

/// Transport faults: the request never produced a readable reply.
///
/// Semantic rejections and non-JSON bodies are not errors; see `Reply`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}
