use std::sync::Arc;

use crate::feed::aggregator::BoardsClient;
use crate::matching::scoring::MatchScorer;
use crate::session::store::UserStateStore;
use crate::session::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub store: Arc<dyn UserStateStore>,
    /// Pluggable match scorer. Default: RuleMatchScorer.
    pub scorer: Arc<dyn MatchScorer>,
    /// Upstream client behind `GET /api/jobs`.
    pub boards: BoardsClient,
}
