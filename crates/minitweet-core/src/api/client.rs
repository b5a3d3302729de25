//! API client for the minitweet REST service.
//!
//! `ApiClient::send` is the single outbound-request path. It always sets a
//! JSON content type, attaches a bearer credential only when one is given,
//! and returns the decoded body without looking at the status code.

use reqwest::{header, Client, Method, Url};
use serde::Serialize;
use tracing::debug;

use crate::models::Credential;

use super::{ApiError, Reply};

/// Default base URL, a local development server
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// API client for the minitweet service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL (e.g. `http://localhost:8080`)
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        // No timeout: a call resolves with a reply or fails with a network error
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode the reply.
    ///
    /// `body` is serialized as JSON when present and omitted entirely when
    /// `None`. Non-JSON response bodies come back as `Reply::Text`.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        credential: Option<&Credential>,
    ) -> Result<Reply, ApiError> {
        let url = self.url(path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(credential) = credential {
            request = request.bearer_auth(credential.as_str());
        }

        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        debug!(%method, path, %status, bytes = text.len(), "Response received");

        Ok(Reply::from_body(text))
    }

    pub async fn get(&self, path: &str, credential: Option<&Credential>) -> Result<Reply, ApiError> {
        self.send::<()>(Method::GET, path, None, credential).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        credential: Option<&Credential>,
    ) -> Result<Reply, ApiError> {
        self.send(Method::POST, path, Some(body), credential).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        let err = ApiClient::new("not a url").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/feed"), "http://localhost:8080/feed");
    }

    #[test]
    fn test_default_api_url_is_valid() {
        assert!(ApiClient::new(DEFAULT_API_URL).is_ok());
    }
}
