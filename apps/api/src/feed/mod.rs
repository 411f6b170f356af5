//! Job Feed: produces batches of postings for the swipe deck.
//!
//! Remote first, embedded catalog as the safety net. A batch is never empty
//! and never fails: every upstream problem degrades to the catalog.
//!
//! Cross-batch de-duplication is the caller's job (`SessionState` keeps the
//! seen-set); the feed only guarantees ids are unique within one batch.

pub mod aggregator;
pub mod catalog;
pub mod handlers;
pub mod source;

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::feed::catalog::fallback_catalog;
use crate::feed::source::JobSource;
use crate::models::job::JobPosting;

/// Postings handed out per refill.
pub const BATCH_SIZE: usize = 30;

/// A remote batch naming fewer companies than this is treated as a partial
/// upstream failure.
const MIN_DISTINCT_COMPANIES: usize = 2;

/// Sponsored catalog entries draw their sort key from `[0, 0.6)` instead of
/// `[0, 1)`, so they tend to, but do not always, come first.
const SPONSORED_KEY_CEILING: f64 = 0.6;
const REGULAR_KEY_CEILING: f64 = 1.0;

pub struct JobFeed {
    remote: Option<Arc<dyn JobSource>>,
    catalog: Vec<JobPosting>,
    rng: Mutex<StdRng>,
}

impl JobFeed {
    pub fn new(remote: Option<Arc<dyn JobSource>>) -> Self {
        Self::with_rng(remote, StdRng::from_entropy())
    }

    #[cfg(test)]
    pub fn seeded(remote: Option<Arc<dyn JobSource>>, seed: u64) -> Self {
        Self::with_rng(remote, StdRng::seed_from_u64(seed))
    }

    fn with_rng(remote: Option<Arc<dyn JobSource>>, rng: StdRng) -> Self {
        Self {
            remote,
            catalog: fallback_catalog(),
            rng: Mutex::new(rng),
        }
    }

    /// Returns up to `max_results` postings, unique by id.
    pub async fn next_batch(&self, max_results: usize) -> Vec<JobPosting> {
        let remote = match &self.remote {
            Some(source) => self.fetch_remote(source.as_ref()).await,
            None => None,
        };

        let mut rng = self.rng.lock().await;
        let ordered = match remote {
            Some(mut jobs) => {
                jobs.shuffle(&mut *rng);
                jobs
            }
            None => {
                info!("Serving {} postings from the fallback catalog", self.catalog.len());
                prioritize(self.catalog.clone(), &mut *rng)
            }
        };

        let batch = unique_by_id(ordered, max_results);
        debug!("Feed batch ready: {} postings", batch.len());
        batch
    }

    /// `None` means "fall back": transport error, bad payload, or a degenerate result.
    async fn fetch_remote(&self, source: &dyn JobSource) -> Option<Vec<JobPosting>> {
        match source.fetch().await {
            Ok(jobs) => {
                let companies = distinct_companies(&jobs);
                if companies < MIN_DISTINCT_COMPANIES {
                    warn!(
                        "Remote feed {} returned {} postings from {} companies; using fallback catalog",
                        source.name(),
                        jobs.len(),
                        companies
                    );
                    None
                } else {
                    info!(
                        "Remote feed {} returned {} postings from {} companies",
                        source.name(),
                        jobs.len(),
                        companies
                    );
                    Some(jobs)
                }
            }
            Err(e) => {
                warn!("Remote feed {} failed: {e}; using fallback catalog", source.name());
                None
            }
        }
    }
}

fn distinct_companies(jobs: &[JobPosting]) -> usize {
    jobs.iter()
        .map(|job| job.company.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Random order biased toward sponsored entries.
fn prioritize<R: Rng + ?Sized>(jobs: Vec<JobPosting>, rng: &mut R) -> Vec<JobPosting> {
    let mut keyed: Vec<(f64, JobPosting)> = jobs
        .into_iter()
        .map(|job| {
            let ceiling = if job.sponsored {
                SPONSORED_KEY_CEILING
            } else {
                REGULAR_KEY_CEILING
            };
            (rng.gen_range(0.0..ceiling), job)
        })
        .collect();

    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    keyed.into_iter().map(|(_, job)| job).collect()
}

/// Drops id-less postings and repeated ids (first wins), then truncates.
fn unique_by_id(jobs: Vec<JobPosting>, max_results: usize) -> Vec<JobPosting> {
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|job| !job.id.is_empty() && seen.insert(job.id.clone()))
        .take(max_results)
        .collect()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::feed::source::FeedError;
    use crate::models::job::{Level, WorkType};

    /// Returns a fixed batch, or a 503 when `jobs` is `None`.
    struct StubSource {
        jobs: Option<Vec<JobPosting>>,
    }

    #[async_trait]
    impl JobSource for StubSource {
        async fn fetch(&self) -> Result<Vec<JobPosting>, FeedError> {
            self.jobs.clone().ok_or(FeedError::Status(503))
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn make_job(id: &str, company: &str) -> JobPosting {
        JobPosting {
            id: id.to_string(),
            company: company.to_string(),
            title: "Engineer".to_string(),
            location: "Remote".to_string(),
            work_type: WorkType::Any,
            level: Level::Any,
            skills: vec![],
            salary: None,
            apply_url: None,
            sponsored: false,
            logo: None,
        }
    }

    fn stub(jobs: Option<Vec<JobPosting>>) -> Option<Arc<dyn JobSource>> {
        Some(Arc::new(StubSource { jobs }))
    }

    fn is_catalog(batch: &[JobPosting]) -> bool {
        batch.iter().all(|job| job.id.starts_with("fallback-"))
    }

    #[tokio::test]
    async fn test_no_remote_serves_catalog() {
        let feed = JobFeed::seeded(None, 7);
        let batch = feed.next_batch(BATCH_SIZE).await;
        assert_eq!(batch.len(), 20);
        assert!(is_catalog(&batch));
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_catalog() {
        let feed = JobFeed::seeded(stub(None), 7);
        let batch = feed.next_batch(BATCH_SIZE).await;
        assert!(!batch.is_empty());
        assert!(is_catalog(&batch));
    }

    #[tokio::test]
    async fn test_single_company_remote_is_degenerate() {
        let jobs = (0..10)
            .map(|i| make_job(&format!("gh-airbnb-{i}"), "airbnb"))
            .collect();
        let feed = JobFeed::seeded(stub(Some(jobs)), 7);
        let batch = feed.next_batch(BATCH_SIZE).await;
        assert!(is_catalog(&batch));
    }

    #[tokio::test]
    async fn test_empty_remote_is_degenerate() {
        let feed = JobFeed::seeded(stub(Some(vec![])), 7);
        let batch = feed.next_batch(BATCH_SIZE).await;
        assert!(is_catalog(&batch));
    }

    #[tokio::test]
    async fn test_diverse_remote_is_served_shuffled_and_capped() {
        let jobs: Vec<JobPosting> = (0..40)
            .map(|i| make_job(&format!("gh-org{}-{i}", i % 4), &format!("org{}", i % 4)))
            .collect();
        let feed = JobFeed::seeded(stub(Some(jobs.clone())), 7);
        let batch = feed.next_batch(BATCH_SIZE).await;

        assert_eq!(batch.len(), BATCH_SIZE);
        assert!(batch.iter().all(|job| job.id.starts_with("gh-")));
        let original_prefix: Vec<&str> = jobs.iter().take(BATCH_SIZE).map(|j| j.id.as_str()).collect();
        let served: Vec<&str> = batch.iter().map(|j| j.id.as_str()).collect();
        assert_ne!(served, original_prefix);
    }

    #[tokio::test]
    async fn test_batch_ids_are_unique_and_bounded() {
        let mut jobs = vec![
            make_job("a", "one"),
            make_job("a", "two"),
            make_job("", "three"),
            make_job("b", "two"),
        ];
        jobs.push(make_job("c", "three"));
        let feed = JobFeed::seeded(stub(Some(jobs)), 1);

        let batch = feed.next_batch(2).await;
        assert_eq!(batch.len(), 2);

        let batch = feed.next_batch(BATCH_SIZE).await;
        let ids: HashSet<&str> = batch.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids.len(), batch.len());
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn test_sponsored_entries_tend_to_sort_first() {
        let mut sponsored_rank = 0usize;
        let mut regular_rank = 0usize;
        let mut sponsored_seen = 0usize;
        let mut regular_seen = 0usize;

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            for (rank, job) in prioritize(fallback_catalog(), &mut rng).iter().enumerate() {
                if job.sponsored {
                    sponsored_rank += rank;
                    sponsored_seen += 1;
                } else {
                    regular_rank += rank;
                    regular_seen += 1;
                }
            }
        }

        let sponsored_mean = sponsored_rank as f64 / sponsored_seen as f64;
        let regular_mean = regular_rank as f64 / regular_seen as f64;
        assert!(
            sponsored_mean < regular_mean,
            "sponsored mean rank {sponsored_mean} vs regular {regular_mean}"
        );
    }

    #[test]
    fn test_sponsored_priority_is_not_guaranteed() {
        let regular_first = (0..100).any(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            !prioritize(fallback_catalog(), &mut rng)[0].sponsored
        });
        assert!(regular_first);
    }

    #[test]
    fn test_prioritize_keeps_every_entry() {
        let mut rng = StdRng::seed_from_u64(3);
        let ordered = prioritize(fallback_catalog(), &mut rng);
        assert_eq!(ordered.len(), fallback_catalog().len());
    }
}
