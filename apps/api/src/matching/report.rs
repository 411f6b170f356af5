//! Match Report: the "anytime" report: confidence, top matches, favorites,
//! suggested next actions, insights, and a plain-text export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::insights::{analyze, DecisionTotals, Insight};
use crate::matching::scoring::{rank_matches, MatchScorer, ScoredJob};
use crate::models::job::JobPosting;
use crate::models::profile::UserProfile;

/// Likes needed for a fully confident report.
pub const CONFIDENCE_TARGET: usize = 20;
const TOP_MATCH_LIMIT: usize = 5;
const LOW_CONFIDENCE: u32 = 20;
const MIN_PROFILE_SKILLS: usize = 3;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwipeStats {
    pub total_swipes: usize,
    pub likes: usize,
    pub passes: usize,
    pub applied: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub identity: String,
    pub generated_at: DateTime<Utc>,
    /// 0-100, from the like count alone.
    pub confidence: u32,
    /// 0-100, from likes + passes.
    pub progress: u32,
    pub profile: UserProfile,
    pub scorer_backend: String,
    pub top_matches: Vec<ScoredJob>,
    pub favorites: Vec<JobPosting>,
    pub actions: Vec<String>,
    pub insights: Vec<Insight>,
    pub stats: SwipeStats,
}

/// min(count / CONFIDENCE_TARGET, 1) as a rounded percentage.
pub fn target_percent(count: usize) -> u32 {
    let ratio = (count as f64 / CONFIDENCE_TARGET as f64).min(1.0);
    (ratio * 100.0).round() as u32
}

/// Inputs gathered by the session for a report.
pub struct ReportInput<'a> {
    pub identity: &'a str,
    pub profile: &'a UserProfile,
    /// Liked jobs still resolvable in the deck, in like order.
    pub liked: &'a [&'a JobPosting],
    pub stats: SwipeStats,
}

pub fn build_report(scorer: &dyn MatchScorer, input: ReportInput<'_>) -> MatchReport {
    let ReportInput {
        identity,
        profile,
        liked,
        stats,
    } = input;

    let confidence = target_percent(stats.likes);
    let progress = target_percent(stats.total_swipes);

    let top_matches: Vec<ScoredJob> = rank_matches(scorer, profile, liked)
        .into_iter()
        .take(TOP_MATCH_LIMIT)
        .collect();

    let favorites: Vec<JobPosting> = liked.iter().map(|job| (*job).clone()).collect();

    let insights = analyze(
        liked,
        DecisionTotals {
            likes: stats.likes,
            passes: stats.passes,
        },
    );

    let actions = suggest_actions(confidence, profile, favorites.len());

    MatchReport {
        identity: identity.to_string(),
        generated_at: Utc::now(),
        confidence,
        progress,
        profile: profile.clone(),
        scorer_backend: scorer.backend().to_string(),
        top_matches,
        favorites,
        actions,
        insights,
        stats,
    }
}

fn suggest_actions(confidence: u32, profile: &UserProfile, favorites: usize) -> Vec<String> {
    let mut actions = Vec::new();
    if confidence < LOW_CONFIDENCE {
        actions.push("Try swiping more jobs to improve match accuracy".to_string());
    }
    if profile.skills.len() < MIN_PROFILE_SKILLS {
        actions.push("Add more skills to your profile for better matching".to_string());
    }
    if favorites > 0 {
        actions.push(format!("Apply to your {favorites} favorite jobs"));
    }
    actions.push("Share your profile with recruiters".to_string());
    actions
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

impl MatchReport {
    /// Plain-text export suitable for a clipboard or a share sheet.
    pub fn to_text(&self) -> String {
        let profile = &self.profile;
        let work_type = profile
            .work_type
            .map(|w| format!("{w:?}"))
            .unwrap_or_else(|| "Any".to_string());
        let level = profile
            .level
            .map(|l| format!("{l:?}"))
            .unwrap_or_else(|| "Any".to_string());
        let skills = if profile.skills.is_empty() {
            "None selected".to_string()
        } else {
            profile.skills.join(", ")
        };

        let mut lines = vec![
            "Job-Ting Match Report".to_string(),
            "====================".to_string(),
            String::new(),
            format!("Profile: {}", or_placeholder(&profile.name, "Not specified")),
            format!("Major: {}", or_placeholder(&profile.major, "Not specified")),
            format!("Location: {}", or_placeholder(&profile.location, "Any")),
            format!("Work Type: {work_type}"),
            format!("Level: {level}"),
            format!("Skills: {skills}"),
            String::new(),
            format!("Confidence: {}%", self.confidence),
            String::new(),
            "Top Matches:".to_string(),
        ];

        lines.extend(self.top_matches.iter().map(|m| {
            format!(
                "- {} at {} ({}) · {}% match",
                m.job.title, m.job.company, m.job.location, m.percent
            )
        }));

        lines.push(String::new());
        lines.push(format!("Total Swipes: {}", self.stats.total_swipes));
        lines.push(format!("Likes: {}", self.stats.likes));
        lines.push(format!("Passes: {}", self.stats.passes));
        lines.push(format!("Applied: {}", self.stats.applied));

        lines.join("\n")
    }
}
