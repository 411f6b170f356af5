//! Axum route handler for the job-board aggregator.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::feed::aggregator::{BoardSource, DEFAULT_COMPANIES, DEFAULT_SOURCE};
use crate::models::job::JobPosting;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    pub companies: Option<String>,
    pub source: Option<String>,
}

/// GET /api/jobs?companies=<csv>&source=<name>
///
/// Always 200. Upstream failures shrink the list instead of failing the request.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> Json<Vec<JobPosting>> {
    let companies = query
        .companies
        .unwrap_or_else(|| DEFAULT_COMPANIES.to_string());
    let source_name = query.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string());

    let Some(source) = BoardSource::parse(&source_name) else {
        warn!("Unsupported job board source '{source_name}'");
        return Json(Vec::new());
    };

    let orgs: Vec<&str> = companies.split(',').collect();
    Json(state.boards.aggregate(&orgs, source).await)
}
