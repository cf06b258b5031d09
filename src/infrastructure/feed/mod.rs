//! New-listing feed

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::shared::errors::FeedError;

#[async_trait]
pub trait ListingFeed: Send + Sync {
    /// Most recently listed token address, if the feed has one
    async fn latest_listing(&self) -> Result<Option<String>, FeedError>;
}

/// Feed response: `info` carries the last line the listing scraper saw
#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    info: Option<String>,
}

impl FeedResponse {
    fn token_address(self) -> Option<String> {
        self.info
            .map(|line| line.trim().to_string())
            .filter(|address| !address.is_empty())
    }
}

/// Polls a plain HTTP endpoint
pub struct HttpListingFeed {
    http_client: Client,
    url: String,
}

impl HttpListingFeed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        Ok(Self {
            http_client: Client::builder().timeout(timeout).build()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ListingFeed for HttpListingFeed {
    async fn latest_listing(&self) -> Result<Option<String>, FeedError> {
        let response = self.http_client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }
        let body: FeedResponse = response.json().await?;
        Ok(body.token_address())
    }
}
