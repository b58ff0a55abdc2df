//! HTTP fetching for remote route tables.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

/// Seam for HTTP execution, so ingestion tests can stub the network.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response>;
}

/// Plain [`reqwest::Client`] wrapper for unauthenticated sources.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}

/// Fetches `url` with a GET request and returns the raw body bytes.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let bytes = resp.error_for_status()?.bytes().await?.to_vec();
    debug!(url, bytes = bytes.len(), "Fetched remote route table");
    Ok(bytes)
}
