//! Swipe session state machine.
//!
//! `SessionState::step` is a pure transition: it takes an event, updates the
//! deck/cursor/decisions, and returns the effects the driver has to run
//! (persist, clear, fetch). No I/O happens here.
//!
//! Phases: Empty → Loading → Ready ⇄ (deciding) → Exhausted → Loading.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::matching::report::{target_percent, SwipeStats};
use crate::models::job::JobPosting;

/// Undecided cards left at which a background refill is requested.
pub const PREFETCH_THRESHOLD: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Decision sets
// ────────────────────────────────────────────────────────────────────────────

/// Insertion-ordered, duplicate-free set of job ids. Persisted as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct DecisionSet {
    ids: Vec<String>,
    index: HashSet<String>,
}

impl DecisionSet {
    /// Returns `false` if the id was already present.
    pub fn insert(&mut self, id: &str) -> bool {
        if !self.index.insert(id.to_string()) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        if !self.index.remove(id) {
            return false;
        }
        self.ids.retain(|existing| existing != id);
        true
    }

    #[cfg(test)]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for DecisionSet {
    fn from(ids: Vec<String>) -> Self {
        let mut set = DecisionSet::default();
        for id in &ids {
            set.insert(id);
        }
        set
    }
}

impl From<DecisionSet> for Vec<String> {
    fn from(set: DecisionSet) -> Self {
        set.ids
    }
}

/// Everything a user has decided. `liked` and `passed` exclude each other;
/// `applied` may hold any id, liked or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decisions {
    pub liked: DecisionSet,
    pub passed: DecisionSet,
    pub applied: DecisionSet,
}

impl Decisions {
    pub fn stats(&self) -> SwipeStats {
        SwipeStats {
            total_swipes: self.liked.len() + self.passed.len(),
            likes: self.liked.len(),
            passes: self.passed.len(),
            applied: self.applied.len(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Events, effects, views
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Empty,
    Loading,
    Ready,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    Applied,
    AlreadyApplied,
}

#[derive(Debug)]
pub enum Event {
    /// Decisions loaded from the store; the deck starts over.
    Started { decisions: Decisions },
    RefillRequested,
    BatchLoaded { epoch: u64, jobs: Vec<JobPosting> },
    Decided { like: bool },
    Applied { job_id: String },
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Decisions changed; the driver writes whatever is current when it runs.
    Persist,
    ClearPersisted,
    /// Fetch a batch and feed it back as `BatchLoaded` with the same epoch.
    Fetch { epoch: u64 },
    ApplyRecorded(ApplyOutcome),
}

/// Read-only snapshot handed to the UI layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub phase: Phase,
    pub top_card: Option<JobPosting>,
    pub cursor: usize,
    pub deck_size: usize,
    pub remaining: usize,
    pub progress: u32,
    pub confidence: u32,
    pub stats: SwipeStats,
}

// ────────────────────────────────────────────────────────────────────────────
// State
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SessionState {
    deck: Vec<Arc<JobPosting>>,
    seen: HashSet<String>,
    cursor: usize,
    decisions: Decisions,
    refill_in_flight: bool,
    /// Bumped on every start/reset; batches fetched for an older epoch are dropped.
    epoch: u64,
}

impl SessionState {
    pub fn step(mut self, event: Event) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();

        match event {
            Event::Started { decisions } => {
                self.reseed();
                self.decisions = decisions;
                self.request_refill(&mut effects);
            }
            Event::RefillRequested => self.request_refill(&mut effects),
            Event::BatchLoaded { epoch, jobs } => {
                if epoch == self.epoch {
                    self.append(jobs);
                    self.refill_in_flight = false;
                }
            }
            Event::Decided { like } => {
                if let Some(id) = self.top_card().map(|job| job.id.clone()) {
                    self.record(&id, like);
                    self.cursor += 1;
                    effects.push(Effect::Persist);
                    if self.remaining() <= PREFETCH_THRESHOLD {
                        self.request_refill(&mut effects);
                    }
                }
            }
            Event::Applied { job_id } => {
                if self.decisions.applied.insert(&job_id) {
                    effects.push(Effect::Persist);
                    effects.push(Effect::ApplyRecorded(ApplyOutcome::Applied));
                } else {
                    effects.push(Effect::ApplyRecorded(ApplyOutcome::AlreadyApplied));
                }
            }
            Event::Reset => {
                self.decisions = Decisions::default();
                self.reseed();
                effects.push(Effect::ClearPersisted);
                self.request_refill(&mut effects);
            }
        }

        (self, effects)
    }

    pub fn phase(&self) -> Phase {
        if self.top_card().is_some() {
            Phase::Ready
        } else if self.refill_in_flight {
            Phase::Loading
        } else if self.epoch == 0 {
            Phase::Empty
        } else {
            Phase::Exhausted
        }
    }

    pub fn top_card(&self) -> Option<&JobPosting> {
        self.deck.get(self.cursor).map(Arc::as_ref)
    }

    pub fn remaining(&self) -> usize {
        self.deck.len() - self.cursor
    }

    pub fn decisions(&self) -> &Decisions {
        &self.decisions
    }

    /// Liked jobs still present in the deck, in the order they were liked.
    pub fn liked_jobs(&self) -> Vec<&JobPosting> {
        let by_id: HashMap<&str, &JobPosting> = self
            .deck
            .iter()
            .map(|job| (job.id.as_str(), job.as_ref()))
            .collect();
        self.decisions
            .liked
            .iter()
            .filter_map(|id| by_id.get(id).copied())
            .collect()
    }

    pub fn view(&self) -> SessionView {
        let stats = self.decisions.stats();
        SessionView {
            phase: self.phase(),
            top_card: self.top_card().cloned(),
            cursor: self.cursor,
            deck_size: self.deck.len(),
            remaining: self.remaining(),
            progress: target_percent(stats.total_swipes),
            confidence: target_percent(stats.likes),
            stats,
        }
    }

    fn reseed(&mut self) {
        self.deck.clear();
        self.seen.clear();
        self.cursor = 0;
        self.epoch += 1;
        // any fetch still running belongs to the previous epoch
        self.refill_in_flight = false;
    }

    /// Dropped, not queued, while another refill is running.
    fn request_refill(&mut self, effects: &mut Vec<Effect>) {
        if self.refill_in_flight {
            return;
        }
        self.refill_in_flight = true;
        effects.push(Effect::Fetch { epoch: self.epoch });
    }

    fn append(&mut self, jobs: Vec<JobPosting>) {
        for job in jobs {
            if job.id.is_empty() || !self.seen.insert(job.id.clone()) {
                continue;
            }
            self.deck.push(Arc::new(job));
        }
    }

    fn record(&mut self, id: &str, like: bool) {
        let Decisions { liked, passed, .. } = &mut self.decisions;
        let (into, out_of) = if like { (liked, passed) } else { (passed, liked) };
        out_of.remove(id);
        into.insert(id);
    }
}
