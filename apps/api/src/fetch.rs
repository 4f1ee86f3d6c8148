//! Page fetcher. The single outbound HTTP client used by the crawler, the page
//! auditor and the competitor snapshot.
//!
//! Every request carries the same identifying user agent. No retries: a transient
//! failure is treated as permanent for the lifetime of the calling request.
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;

pub const USER_AGENT: &str = "SMM/1.0";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),
}

#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// GETs `url` and returns the body text. Non-2xx statuses become `FetchError::Status`.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!("GET {url} returned {status}");
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn fetcher() -> PageFetcher {
        PageFetcher::new(Duration::from_secs(5)).expect("client builds")
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent_and_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h2>Hi</h2>"))
            .expect(1)
            .mount(&server)
            .await;

        let body = fetcher()
            .fetch_text(&format!("{}/page", server.uri()))
            .await
            .expect("fetch succeeds");
        assert_eq!(body, "<h2>Hi</h2>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = fetcher()
            .fetch_text(&server.uri())
            .await
            .expect_err("503 must fail");
        assert!(matches!(err, FetchError::Status(503)), "got {err:?}");
        assert_eq!(err.to_string(), "HTTP 503");
    }
}
