//! Job-board aggregator: fans out to public company boards and maps their
//! postings into `JobPosting`.
//!
//! A failing org is logged and skipped; the caller always gets a list back.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::feed::source::FeedError;
use crate::models::job::{JobPosting, Level, WorkType};

/// Maximum postings returned per aggregation.
pub const AGGREGATE_LIMIT: usize = 30;

pub const DEFAULT_COMPANIES: &str =
    "airbnb,doordash,openai,spotify,stripe,shopify,github,netflix,uber,lyft";
pub const DEFAULT_SOURCE: &str = "greenhouse";

/// Upstream boards we know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardSource {
    Greenhouse,
}

impl BoardSource {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "greenhouse" => Some(BoardSource::Greenhouse),
            _ => None,
        }
    }

    /// Id namespace for postings from this board.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            BoardSource::Greenhouse => "gh",
        }
    }
}

#[derive(Debug, Deserialize)]
struct GreenhouseBoard {
    #[serde(default)]
    jobs: Vec<GreenhouseJob>,
}

#[derive(Debug, Deserialize)]
struct GreenhouseJob {
    id: u64,
    #[serde(default)]
    title: String,
    location: Option<GreenhouseLocation>,
    absolute_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GreenhouseLocation {
    name: Option<String>,
}

#[derive(Clone)]
pub struct BoardsClient {
    client: Client,
    base_url: String,
}

impl BoardsClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches every org in turn and stops once `AGGREGATE_LIMIT` postings are in hand.
    pub async fn aggregate(&self, orgs: &[&str], source: BoardSource) -> Vec<JobPosting> {
        let mut jobs = Vec::new();

        for org in orgs.iter().map(|o| o.trim()).filter(|o| !o.is_empty()) {
            if jobs.len() >= AGGREGATE_LIMIT {
                break;
            }
            match self.fetch_board(org, source).await {
                Ok(board_jobs) => {
                    info!("Fetched {} postings for {org}", board_jobs.len());
                    jobs.extend(board_jobs);
                }
                Err(e) => warn!("Skipping {org}: {e}"),
            }
        }

        jobs.truncate(AGGREGATE_LIMIT);
        jobs
    }

    async fn fetch_board(&self, org: &str, source: BoardSource) -> Result<Vec<JobPosting>, FeedError> {
        let url = format!("{}/v1/boards/{org}/jobs", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let board: GreenhouseBoard = serde_json::from_str(&body)?;
        Ok(board
            .jobs
            .into_iter()
            .map(|job| map_greenhouse_job(org, source, job))
            .collect())
    }
}

fn map_greenhouse_job(org: &str, source: BoardSource, job: GreenhouseJob) -> JobPosting {
    JobPosting {
        id: format!("{}-{org}-{}", source.id_prefix(), job.id),
        company: org.to_string(),
        level: Level::infer_from_title(&job.title),
        title: job.title,
        location: job.location.and_then(|l| l.name).unwrap_or_default(),
        work_type: WorkType::Any,
        skills: vec![],
        salary: None,
        apply_url: job.absolute_url,
        sponsored: false,
        logo: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_source_parse() {
        assert_eq!(BoardSource::parse("greenhouse"), Some(BoardSource::Greenhouse));
        assert_eq!(BoardSource::parse(" Greenhouse "), Some(BoardSource::Greenhouse));
        assert_eq!(BoardSource::parse("lever"), None);
    }

    #[test]
    fn test_greenhouse_payload_maps_to_posting() {
        let json = r#"{
            "jobs": [
                {
                    "id": 4012345,
                    "title": "Software Engineering Intern, Summer",
                    "location": {"name": "San Francisco, CA"},
                    "absolute_url": "https://boards.greenhouse.io/stripe/jobs/4012345"
                },
                {
                    "id": 99,
                    "title": "New Grad Engineer",
                    "location": null
                }
            ]
        }"#;
        let board: GreenhouseBoard = serde_json::from_str(json).unwrap();
        let jobs: Vec<JobPosting> = board
            .jobs
            .into_iter()
            .map(|job| map_greenhouse_job("stripe", BoardSource::Greenhouse, job))
            .collect();

        assert_eq!(jobs[0].id, "gh-stripe-4012345");
        assert_eq!(jobs[0].company, "stripe");
        assert_eq!(jobs[0].level, Level::Intern);
        assert_eq!(jobs[0].location, "San Francisco, CA");
        assert_eq!(jobs[0].work_type, WorkType::Any);
        assert!(jobs[0].skills.is_empty());
        assert_eq!(
            jobs[0].apply_url.as_deref(),
            Some("https://boards.greenhouse.io/stripe/jobs/4012345")
        );

        assert_eq!(jobs[1].level, Level::Junior);
        assert_eq!(jobs[1].location, "");
        assert_eq!(jobs[1].apply_url, None);
    }

    #[test]
    fn test_board_without_jobs_key_is_empty() {
        let board: GreenhouseBoard = serde_json::from_str("{}").unwrap();
        assert!(board.jobs.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_orgs_are_skipped_not_fatal() {
        // Port 9 (discard) on localhost refuses connections in test sandboxes.
        let client =
            BoardsClient::new("http://127.0.0.1:9".to_string(), Duration::from_millis(500)).unwrap();
        let jobs = client
            .aggregate(&["airbnb", "stripe"], BoardSource::Greenhouse)
            .await;
        assert!(jobs.is_empty());
    }
}
