//! Remote job sources. The feed treats any error from a source as "use the
//! catalog instead", so sources only need to report what went wrong.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::models::job::JobPosting;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A source of job postings. Implement this to plug a new upstream into the feed.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<JobPosting>, FeedError>;

    fn name(&self) -> &str;
}

/// Pulls postings from a `GET /jobs?companies=<csv>&source=<name>` endpoint,
/// normally this service's own aggregator.
pub struct HttpJobSource {
    client: Client,
    url: String,
    companies: String,
    source: String,
}

impl HttpJobSource {
    pub fn new(
        url: String,
        companies: String,
        source: String,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            companies,
            source,
        })
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    async fn fetch(&self) -> Result<Vec<JobPosting>, FeedError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("companies", self.companies.as_str()),
                ("source", self.source.as_str()),
            ])
            .header("cache-control", "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let jobs: Vec<JobPosting> = serde_json::from_str(&body)?;
        debug!("Remote feed returned {} postings", jobs.len());
        Ok(jobs)
    }

    fn name(&self) -> &str {
        &self.url
    }
}
