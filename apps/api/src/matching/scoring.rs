//! Match Scoring: a pluggable, trait-based scorer that measures a profile against a liked job.
//!
//! Default: `RuleMatchScorer` (pure additive rules, deterministic, fully testable).
//!
//! `AppState` holds an `Arc<dyn MatchScorer>`, swapped at startup.

use serde::{Deserialize, Serialize};

use crate::matching::salary::parse_salary;
use crate::models::job::{JobPosting, Level, WorkType};
use crate::models::profile::UserProfile;

const LOCATION_WEIGHT: f64 = 0.3;
const WORK_TYPE_WEIGHT: f64 = 0.2;
const LEVEL_WEIGHT: f64 = 0.2;
const SKILLS_WEIGHT: f64 = 0.3;
const SALARY_BONUS_CAP: f64 = 0.2;
const SALARY_SLOPE: f64 = 0.1;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// The signals a rule can contribute on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Location,
    WorkType,
    Level,
    Skills,
    Salary,
}

/// A single rule's contribution to the total score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    pub signal: Signal,
    pub value: f64,
}

/// A liked job together with its score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredJob {
    pub job: JobPosting,
    pub score: f64,
    /// `round(score * 100)`; not clamped, since the score is additive.
    pub percent: i64,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The match scorer trait. Implement this to swap backends without touching
/// the report builder or handlers.
///
/// Carried in `AppState` as `Arc<dyn MatchScorer>`.
pub trait MatchScorer: Send + Sync {
    fn score(&self, profile: &UserProfile, job: &JobPosting) -> f64;

    /// Label exposed in reports ("rules", ...).
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// RuleMatchScorer (default)
// ────────────────────────────────────────────────────────────────────────────

type Rule = fn(&UserProfile, &JobPosting) -> f64;

/// Each rule contributes independently; the total is a plain sum.
const RULES: &[(Signal, Rule)] = &[
    (Signal::Location, location_rule),
    (Signal::WorkType, work_type_rule),
    (Signal::Level, level_rule),
    (Signal::Skills, skills_rule),
    (Signal::Salary, salary_rule),
];

/// Additive rule-based scorer.
///
/// | Signal    | Contribution                                           |
/// |-----------|--------------------------------------------------------|
/// | location  | +0.3 on case-insensitive substring match (either way)  |
/// | work type | +0.2 on exact match or job `any`                       |
/// | level     | +0.2 on exact match or job `any`                       |
/// | skills    | +0.3 × overlap / max(profile skills, 1)                |
/// | salary    | min(0.2, (ratio − 1) × 0.1), negative below threshold  |
pub struct RuleMatchScorer;

impl MatchScorer for RuleMatchScorer {
    fn score(&self, profile: &UserProfile, job: &JobPosting) -> f64 {
        breakdown(profile, job).iter().map(|c| c.value).sum()
    }

    fn backend(&self) -> &'static str {
        "rules"
    }
}

/// Per-signal contributions for a profile/job pair, in rule order.
pub fn breakdown(profile: &UserProfile, job: &JobPosting) -> Vec<Contribution> {
    RULES
        .iter()
        .map(|(signal, rule)| Contribution {
            signal: *signal,
            value: rule(profile, job),
        })
        .collect()
}

/// Scores liked jobs and sorts them best-first.
///
/// The sort is stable, so equal scores keep the order in which the jobs
/// were liked.
pub fn rank_matches(
    scorer: &dyn MatchScorer,
    profile: &UserProfile,
    liked: &[&JobPosting],
) -> Vec<ScoredJob> {
    let mut scored: Vec<ScoredJob> = liked
        .iter()
        .map(|job| {
            let score = scorer.score(profile, job);
            ScoredJob {
                job: (*job).clone(),
                score,
                percent: (score * 100.0).round() as i64,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    scored
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

fn location_rule(profile: &UserProfile, job: &JobPosting) -> f64 {
    let wanted = profile.location.trim().to_lowercase();
    let offered = job.location.trim().to_lowercase();
    if wanted.is_empty() || offered.is_empty() {
        return 0.0;
    }
    if offered.contains(&wanted) || wanted.contains(&offered) {
        LOCATION_WEIGHT
    } else {
        0.0
    }
}

fn work_type_rule(profile: &UserProfile, job: &JobPosting) -> f64 {
    match profile.work_type {
        Some(wanted) if wanted == job.work_type || job.work_type == WorkType::Any => {
            WORK_TYPE_WEIGHT
        }
        _ => 0.0,
    }
}

fn level_rule(profile: &UserProfile, job: &JobPosting) -> f64 {
    match profile.level {
        Some(wanted) if wanted == job.level || job.level == Level::Any => LEVEL_WEIGHT,
        _ => 0.0,
    }
}

fn skills_rule(profile: &UserProfile, job: &JobPosting) -> f64 {
    let job_skills: Vec<String> = job
        .skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let overlap = profile
        .skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .filter(|skill| {
            job_skills
                .iter()
                .any(|js| js.contains(skill.as_str()) || skill.contains(js.as_str()))
        })
        .count();

    let denominator = profile.skills.len().max(1) as f64;
    SKILLS_WEIGHT * overlap as f64 / denominator
}

fn salary_rule(profile: &UserProfile, job: &JobPosting) -> f64 {
    let Some(min_salary) = profile.min_salary.filter(|m| *m > 0) else {
        return 0.0;
    };
    let Some(offered) = job.salary.as_deref().and_then(parse_salary) else {
        return 0.0;
    };

    let ratio = offered as f64 / min_salary as f64;
    let delta = (ratio - 1.0) * SALARY_SLOPE;
    if offered >= min_salary {
        delta.min(SALARY_BONUS_CAP)
    } else {
        delta
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_job(id: &str, location: &str, work_type: WorkType, level: Level) -> JobPosting {
        JobPosting {
            id: id.to_string(),
            company: "Acme".to_string(),
            title: "Engineer".to_string(),
            location: location.to_string(),
            work_type,
            level,
            skills: vec![],
            salary: None,
            apply_url: None,
            sponsored: false,
            logo: None,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_location_substring_match_adds_bonus() {
        let profile = UserProfile {
            location: "Seoul".to_string(),
            ..Default::default()
        };
        let job = make_job("j1", "Seoul, Korea", WorkType::Onsite, Level::Junior);
        assert!(approx(location_rule(&profile, &job), 0.3));
        assert!(approx(RuleMatchScorer.score(&profile, &job), 0.3));
    }

    #[test]
    fn test_location_match_is_case_insensitive_both_directions() {
        let profile = UserProfile {
            location: "san francisco, ca, usa".to_string(),
            ..Default::default()
        };
        let job = make_job("j1", "San Francisco, CA", WorkType::Onsite, Level::Any);
        assert!(approx(location_rule(&profile, &job), 0.3));
    }

    #[test]
    fn test_empty_location_never_matches() {
        let profile = UserProfile::default();
        let job = make_job("j1", "Remote", WorkType::Remote, Level::Any);
        assert_eq!(location_rule(&profile, &job), 0.0);
    }

    #[test]
    fn test_work_type_and_level_accept_any() {
        let profile = UserProfile {
            work_type: Some(WorkType::Remote),
            level: Some(Level::Intern),
            ..Default::default()
        };
        let job = make_job("j1", "", WorkType::Any, Level::Any);
        assert!(approx(RuleMatchScorer.score(&profile, &job), 0.4));

        let mismatch = make_job("j2", "", WorkType::Onsite, Level::Junior);
        assert_eq!(RuleMatchScorer.score(&profile, &mismatch), 0.0);
    }

    #[test]
    fn test_unset_preferences_do_not_score() {
        let profile = UserProfile::default();
        let job = make_job("j1", "", WorkType::Any, Level::Any);
        assert_eq!(RuleMatchScorer.score(&profile, &job), 0.0);
    }

    #[test]
    fn test_skills_overlap_is_proportional() {
        let profile = UserProfile {
            skills: vec![
                "react".to_string(),
                "Python".to_string(),
                "Figma".to_string(),
                "Go".to_string(),
            ],
            ..Default::default()
        };
        let mut job = make_job("j1", "", WorkType::Any, Level::Any);
        job.skills = vec!["React Native".to_string(), "python".to_string()];
        // 2 of 4 profile skills overlap
        assert!(approx(skills_rule(&profile, &job), 0.15));
    }

    #[test]
    fn test_salary_bonus_is_capped() {
        let profile = UserProfile {
            min_salary: Some(50_000),
            ..Default::default()
        };
        let mut job = make_job("j1", "", WorkType::Any, Level::Any);
        job.salary = Some("$200K - $300K".to_string());
        assert!(approx(salary_rule(&profile, &job), 0.2));
    }

    #[test]
    fn test_salary_above_threshold_scales() {
        let profile = UserProfile {
            min_salary: Some(80_000),
            ..Default::default()
        };
        let mut job = make_job("j1", "", WorkType::Any, Level::Any);
        job.salary = Some("$80K - $120K".to_string());
        // ratio 1.25 -> 0.025
        assert!(approx(salary_rule(&profile, &job), 0.025));
    }

    #[test]
    fn test_salary_below_threshold_is_negative() {
        let profile = UserProfile {
            min_salary: Some(100_000),
            ..Default::default()
        };
        let mut job = make_job("j1", "", WorkType::Any, Level::Any);
        job.salary = Some("$50K".to_string());
        assert!(approx(salary_rule(&profile, &job), -0.05));
    }

    #[test]
    fn test_unparseable_salary_is_skipped() {
        let profile = UserProfile {
            min_salary: Some(100_000),
            ..Default::default()
        };
        let mut job = make_job("j1", "", WorkType::Any, Level::Any);
        job.salary = Some("Competitive".to_string());
        assert_eq!(salary_rule(&profile, &job), 0.0);
    }

    #[test]
    fn test_score_is_independent_of_rule_order() {
        let profile = UserProfile {
            location: "Remote".to_string(),
            work_type: Some(WorkType::Remote),
            level: Some(Level::Junior),
            min_salary: Some(90_000),
            skills: vec!["React".to_string(), "GraphQL".to_string()],
            ..Default::default()
        };
        let mut job = make_job("j1", "Remote", WorkType::Remote, Level::Junior);
        job.skills = vec!["Ruby on Rails".to_string(), "React".to_string(), "GraphQL".to_string()];
        job.salary = Some("$80K - $120K".to_string());

        let forward: f64 = breakdown(&profile, &job).iter().map(|c| c.value).sum();
        let reversed: f64 = RULES.iter().rev().map(|(_, rule)| rule(&profile, &job)).sum();
        assert!(approx(forward, reversed));
        assert!(approx(RuleMatchScorer.score(&profile, &job), forward));
    }

    #[test]
    fn test_rank_matches_sorts_descending_and_keeps_ties_stable() {
        let profile = UserProfile {
            location: "Remote".to_string(),
            ..Default::default()
        };
        let a = make_job("a", "Tokyo", WorkType::Any, Level::Any);
        let b = make_job("b", "Remote", WorkType::Any, Level::Any);
        let c = make_job("c", "Austin", WorkType::Any, Level::Any);

        let ranked = rank_matches(&RuleMatchScorer, &profile, &[&a, &b, &c]);
        let ids: Vec<&str> = ranked.iter().map(|s| s.job.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(ranked[0].percent, 30);
    }

    #[test]
    fn test_backend_label_is_rules() {
        assert_eq!(RuleMatchScorer.backend(), "rules");
    }
}
