//! GitHub events API client
//!
//! One GET per fetch: no retry, no paging. GitHub serves at most the latest
//! page of activity, which is what the pipeline validates.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use tracing::{debug, info, warn};

use crate::config::{FeedConfig, FeedTarget};
use crate::error::{IngressError, Result};
use crate::source::FeedSource;

/// HTTP source for one activity feed
#[derive(Debug, Clone)]
pub struct FeedClient {
    config: FeedConfig,
    target: FeedTarget,
    http_client: reqwest::Client,
}

impl FeedClient {
    /// Create a new events API client
    pub fn new(config: FeedConfig, target: FeedTarget) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(FeedClient {
            config,
            target,
            http_client,
        })
    }

    pub fn events_url(&self) -> String {
        self.config.events_url(&self.target)
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    fn describe(&self) -> String {
        self.target.to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        let url = self.events_url();
        info!("Fetching activity feed from {}", url);

        let mut request = self
            .http_client
            .get(&url)
            .header(ACCEPT, self.config.accept.as_str());
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Events API returned {} for {}", status, url);
            return Err(IngressError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        debug!(bytes = body.len(), "fetched activity feed");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_events_url() {
        let client = FeedClient::new(
            FeedConfig::new("https://api.github.com"),
            FeedTarget::repo("pingcap", "tidb"),
        )
        .unwrap();
        assert_eq!(
            client.events_url(),
            "https://api.github.com/repos/pingcap/tidb/events"
        );
        assert_eq!(client.describe(), "pingcap/tidb");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = FeedClient::new(FeedConfig::new("http://127.0.0.1:9"), FeedTarget::Public)
            .unwrap();
        assert!(matches!(client.fetch().await, Err(IngressError::Http(_))));
    }
}
