//! HTTP client for the upstream nginx stub_status endpoint.

use crate::domain::errors::FetchError;
use crate::domain::ports::StatusSource;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct NginxStatusClient {
    client: Client,
    url: Url,
}

impl NginxStatusClient {
    /// Create a client for the given stub_status URL. Requests carry bounded
    /// timeouts so a hung upstream stalls at most one poll cycle.
    pub fn new(url: Url) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .connect_timeout(CONNECT_TIMEOUT)
                .build()
                .unwrap_or_default(),
            url,
        }
    }
}

#[async_trait]
impl StatusSource for NginxStatusClient {
    async fn fetch_status(&self) -> Result<String, FetchError> {
        debug!("Fetching status from {}", self.url);

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: self.url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        debug!("Upstream responded with status {}", status);
        if !status.is_success() {
            return Err(FetchError::BadStatus {
                url: self.url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Body {
            url: self.url.to_string(),
            reason: e.to_string(),
        })
    }
}
