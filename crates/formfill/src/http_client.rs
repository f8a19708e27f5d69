//! Thin HTTP client wrapping reqwest.
//!
//! Not a browser — just HTTP requests. One attempt per call with a
//! per-request timeout; failures are reported to the caller, never retried.

use crate::types::{FormError, FormResult};
use std::time::Duration;

/// Timeout for fetching the form page.
pub const FETCH_TIMEOUT_MS: u64 = 10_000;

/// Timeout for posting a form response.
pub const SUBMIT_TIMEOUT_MS: u64 = 5_000;

/// Response from an HTTP request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// HTTP client shared by the extractor and the submitter.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a new HTTP client with a standard Chrome user-agent.
    pub fn new() -> Self {
        let ua = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                  AppleWebKit/537.36 (KHTML, like Gecko) \
                  Chrome/131.0.0.0 Safari/537.36";

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(ua)
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// Perform a single GET request.
    pub async fn get(&self, url: &str, timeout_ms: u64) -> FormResult<HttpResponse> {
        let r = self
            .client
            .get(url)
            .timeout(Duration::from_millis(timeout_ms))
            .send()
            .await
            .map_err(|e| FormError::Fetch(format!("GET {url}: {e}")))?;

        let status = r.status().as_u16();
        let body = r.text().await.unwrap_or_default();

        Ok(HttpResponse { status, body })
    }

    /// POST form data (url-encoded).
    ///
    /// Pairs are sent in order; a key may repeat for multi-valued answers.
    pub async fn post_form(
        &self,
        url: &str,
        form_fields: &[(String, String)],
        timeout_ms: u64,
    ) -> FormResult<HttpResponse> {
        let r = self
            .client
            .post(url)
            .timeout(Duration::from_millis(timeout_ms))
            .form(form_fields)
            .send()
            .await
            .map_err(|e| FormError::Fetch(format!("POST {url}: {e}")))?;

        let status = r.status().as_u16();
        let body = r.text().await.unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_creation() {
        let client = HttpClient::new();
        // Just verify it doesn't panic
        let _ = client;
    }

    #[test]
    fn test_response_ok_only_on_200() {
        let mut resp = HttpResponse {
            status: 200,
            body: String::new(),
        };
        assert!(resp.is_ok());
        resp.status = 302;
        assert!(!resp.is_ok());
    }
}
