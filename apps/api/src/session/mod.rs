//! Swipe Session: drives `SessionState` against the feed and the store.
//!
//! The state machine decides; this module executes its effects:
//! persistence writes, clears, and feed refills (awaited on start/reset,
//! spawned in the background after a decision).

pub mod handlers;
pub mod machine;
pub mod store;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::feed::{JobFeed, BATCH_SIZE};
use crate::matching::report::{build_report, MatchReport, ReportInput};
use crate::matching::scoring::MatchScorer;
use crate::models::identity::Identity;
use crate::models::profile::UserProfile;
use crate::session::machine::{
    ApplyOutcome, DecisionSet, Decisions, Effect, Event, Phase, SessionState, SessionView,
};
use crate::session::store::{Category, UserStateStore};

#[derive(Debug, Clone, Copy)]
enum FetchMode {
    Await,
    Background,
}

pub struct SwipeSession {
    identity: Identity,
    state: Mutex<SessionState>,
    /// Held for every store write or clear, so writers never interleave.
    persist_gate: Mutex<()>,
    feed: Arc<JobFeed>,
    store: Arc<dyn UserStateStore>,
}

impl SwipeSession {
    pub fn new(identity: Identity, feed: Arc<JobFeed>, store: Arc<dyn UserStateStore>) -> Self {
        Self {
            identity,
            state: Mutex::new(SessionState::default()),
            persist_gate: Mutex::new(()),
            feed,
            store,
        }
    }

    /// Loads persisted decisions, rebuilds the deck, and waits for the first batch.
    pub async fn start(self: &Arc<Self>) -> SessionView {
        let decisions = self.load_decisions().await;
        info!(
            "Starting session for {} ({} likes, {} passes on record)",
            self.identity,
            decisions.liked.len(),
            decisions.passed.len()
        );
        let effects = self.dispatch(Event::Started { decisions }).await;
        self.run(effects, FetchMode::Await).await;
        self.view().await
    }

    /// Current view. An exhausted deck is refilled (and awaited) first.
    pub async fn current(self: &Arc<Self>) -> SessionView {
        if self.view().await.phase == Phase::Exhausted {
            let effects = self.dispatch(Event::RefillRequested).await;
            self.run(effects, FetchMode::Await).await;
        }
        self.view().await
    }

    /// Likes or passes the top card. Without a card this changes nothing.
    pub async fn decide(self: &Arc<Self>, like: bool) -> SessionView {
        let effects = self.dispatch(Event::Decided { like }).await;
        self.run(effects, FetchMode::Background).await;
        self.view().await
    }

    pub async fn apply_to(self: &Arc<Self>, job_id: &str) -> ApplyOutcome {
        let effects = self
            .dispatch(Event::Applied {
                job_id: job_id.to_string(),
            })
            .await;
        self.run(effects, FetchMode::Background)
            .await
            .unwrap_or(ApplyOutcome::AlreadyApplied)
    }

    /// Wipes all decisions for this identity and deals a fresh deck.
    pub async fn reset(self: &Arc<Self>) -> SessionView {
        info!("Resetting session for {}", self.identity);
        let effects = self.dispatch(Event::Reset).await;
        self.run(effects, FetchMode::Await).await;
        self.view().await
    }

    pub async fn view(&self) -> SessionView {
        self.state.lock().await.view()
    }

    #[cfg(test)]
    pub async fn decisions(&self) -> Decisions {
        self.state.lock().await.decisions().clone()
    }

    pub async fn report(&self, profile: &UserProfile, scorer: &dyn MatchScorer) -> MatchReport {
        let state = self.state.lock().await;
        let liked = state.liked_jobs();
        build_report(
            scorer,
            ReportInput {
                identity: self.identity.as_str(),
                profile,
                liked: &liked,
                stats: state.decisions().stats(),
            },
        )
    }

    async fn dispatch(&self, event: Event) -> Vec<Effect> {
        let mut state = self.state.lock().await;
        let (next, effects) = std::mem::take(&mut *state).step(event);
        *state = next;
        effects
    }

    /// Runs effects in order. Returns the apply outcome, if one was recorded.
    async fn run(self: &Arc<Self>, effects: Vec<Effect>, mode: FetchMode) -> Option<ApplyOutcome> {
        let mut outcome = None;
        for effect in effects {
            match effect {
                Effect::Persist => self.persist().await,
                Effect::ClearPersisted => self.clear_persisted().await,
                Effect::Fetch { epoch } => match mode {
                    FetchMode::Await => self.refill(epoch).await,
                    FetchMode::Background => {
                        let session = Arc::clone(self);
                        tokio::spawn(async move { session.refill(epoch).await });
                    }
                },
                Effect::ApplyRecorded(result) => outcome = Some(result),
            }
        }
        outcome
    }

    async fn refill(&self, epoch: u64) {
        let jobs = self.feed.next_batch(BATCH_SIZE).await;
        debug!(
            "Refill for {} (epoch {epoch}) fetched {} postings",
            self.identity,
            jobs.len()
        );
        // BatchLoaded never produces further effects
        self.dispatch(Event::BatchLoaded { epoch, jobs }).await;
    }

    async fn load_decisions(&self) -> Decisions {
        Decisions {
            liked: self.load_set(Category::Liked).await,
            passed: self.load_set(Category::Passed).await,
            applied: self.load_set(Category::Applied).await,
        }
    }

    async fn load_set(&self, category: Category) -> DecisionSet {
        let value = match self.store.get(&self.identity, category).await {
            Ok(Some(value)) => value,
            Ok(None) => return DecisionSet::default(),
            Err(e) => {
                warn!("Could not load {} for {}: {e}", category.as_str(), self.identity);
                return DecisionSet::default();
            }
        };
        serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("Discarding unreadable {} for {}: {e}", category.as_str(), self.identity);
            DecisionSet::default()
        })
    }

    // Best-effort: a failed write is logged and the session carries on.
    async fn persist(&self) {
        let _gate = self.persist_gate.lock().await;
        // snapshot taken under the gate: the last writer always stores the newest decisions
        let decisions = self.state.lock().await.decisions().clone();
        let sets = [
            (Category::Liked, &decisions.liked),
            (Category::Passed, &decisions.passed),
            (Category::Applied, &decisions.applied),
        ];
        for (category, set) in sets {
            let result = match serde_json::to_value(set) {
                Ok(value) => self.store.set(&self.identity, category, value).await,
                Err(e) => Err(e.into()),
            };
            if let Err(e) = result {
                warn!("Could not persist {} for {}: {e}", category.as_str(), self.identity);
            }
        }
    }

    async fn clear_persisted(&self) {
        let _gate = self.persist_gate.lock().await;
        for category in [Category::Liked, Category::Passed, Category::Applied] {
            if let Err(e) = self.store.clear(&self.identity, category).await {
                warn!("Could not clear {} for {}: {e}", category.as_str(), self.identity);
            }
        }
    }
}

/// One live session per identity.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Identity, Arc<SwipeSession>>>,
    feed: Arc<JobFeed>,
    store: Arc<dyn UserStateStore>,
}

impl SessionRegistry {
    pub fn new(feed: Arc<JobFeed>, store: Arc<dyn UserStateStore>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            feed,
            store,
        }
    }

    pub async fn get(&self, identity: &Identity) -> Option<Arc<SwipeSession>> {
        self.sessions.read().await.get(identity).cloned()
    }

    pub async fn get_or_create(&self, identity: &Identity) -> Arc<SwipeSession> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(identity.clone())
            .or_insert_with(|| {
                Arc::new(SwipeSession::new(
                    identity.clone(),
                    Arc::clone(&self.feed),
                    Arc::clone(&self.store),
                ))
            })
            .clone()
    }
}
