//! Insights: behavioral summaries derived from what a user liked.
//!
//! Every rule is a presence test: it either clears its threshold and emits a
//! single insight, or stays silent. Nothing is ranked.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::matching::salary::parse_salary;
use crate::models::job::{JobPosting, WorkType};

const REMOTE_AFFINITY_THRESHOLD: f64 = 0.7;
const COMPANY_SIZE_THRESHOLD: f64 = 0.6;
const HIGH_SALARY_THRESHOLD: f64 = 100_000.0;
const TOP_SKILLS: usize = 3;
const TOP_LOCATION_MIN_COUNT: usize = 2;
const SELECTIVE_BELOW: f64 = 0.2;
const OPEN_ABOVE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    RemoteAffinity,
    CompanySize,
    SalaryPreference,
    TopSkills,
    TopLocation,
    Selectivity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub category: InsightCategory,
    pub text: String,
    /// Share of the evidence (0.0 to 1.0) behind the insight.
    pub weight: f64,
}

/// Decision counts over the whole history, not just the resolvable liked jobs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DecisionTotals {
    pub likes: usize,
    pub passes: usize,
}

/// Analyzes liked jobs and returns every insight whose threshold is met, in
/// rule order. Returns nothing until at least one like has been recorded.
pub fn analyze(liked: &[&JobPosting], totals: DecisionTotals) -> Vec<Insight> {
    if totals.likes == 0 {
        return Vec::new();
    }

    [
        remote_affinity(liked),
        company_size(liked),
        salary_preference(liked),
        top_skills(liked),
        top_location(liked),
        selectivity(totals),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn share(liked: &[&JobPosting], predicate: impl Fn(&JobPosting) -> bool) -> Option<f64> {
    if liked.is_empty() {
        return None;
    }
    let hits = liked.iter().filter(|job| predicate(job)).count();
    Some(hits as f64 / liked.len() as f64)
}

fn percent(ratio: f64) -> u32 {
    (ratio * 100.0).round() as u32
}

fn remote_affinity(liked: &[&JobPosting]) -> Option<Insight> {
    let ratio = share(liked, |job| job.work_type == WorkType::Remote)?;
    (ratio >= REMOTE_AFFINITY_THRESHOLD).then(|| Insight {
        category: InsightCategory::RemoteAffinity,
        text: format!(
            "You lean toward remote work: {}% of the jobs you liked are remote.",
            percent(ratio)
        ),
        weight: ratio,
    })
}

// Sponsored catalog entries are the big-name employers, so the flag doubles
// as a "large company" proxy.
fn company_size(liked: &[&JobPosting]) -> Option<Insight> {
    let ratio = share(liked, |job| job.sponsored)?;
    (ratio >= COMPANY_SIZE_THRESHOLD).then(|| Insight {
        category: InsightCategory::CompanySize,
        text: format!(
            "You gravitate to large, established companies ({}% of your likes).",
            percent(ratio)
        ),
        weight: ratio,
    })
}

fn salary_preference(liked: &[&JobPosting]) -> Option<Insight> {
    let parsed: Vec<u64> = liked
        .iter()
        .filter_map(|job| job.salary.as_deref().and_then(parse_salary))
        .collect();
    if parsed.is_empty() {
        return None;
    }

    let average = parsed.iter().map(|s| *s as f64).sum::<f64>() / parsed.len() as f64;
    (average > HIGH_SALARY_THRESHOLD).then(|| Insight {
        category: InsightCategory::SalaryPreference,
        text: format!(
            "You favor well-paid roles: liked salaries average about {}.",
            average.round() as u64
        ),
        weight: parsed.len() as f64 / liked.len() as f64,
    })
}

/// Counts occurrences, keeping first-seen order so ties resolve deterministically.
fn frequencies<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    // stable: equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn top_skills(liked: &[&JobPosting]) -> Option<Insight> {
    // a skill counts once per job, so the weight stays within 0..1
    let counts = frequencies(liked.iter().flat_map(|job| {
        let mut listed = HashSet::new();
        job.skills
            .iter()
            .map(String::as_str)
            .filter(move |skill| listed.insert(*skill))
    }));
    let (_, top_count) = *counts.first()?;

    let names: Vec<&str> = counts.iter().take(TOP_SKILLS).map(|(s, _)| *s).collect();
    Some(Insight {
        category: InsightCategory::TopSkills,
        text: format!("Skills that keep showing up in your likes: {}.", names.join(", ")),
        weight: top_count as f64 / liked.len() as f64,
    })
}

fn top_location(liked: &[&JobPosting]) -> Option<Insight> {
    let counts = frequencies(liked.iter().map(|job| job.location.as_str()));
    let (location, count) = *counts.first()?;
    (count >= TOP_LOCATION_MIN_COUNT).then(|| Insight {
        category: InsightCategory::TopLocation,
        text: format!("{location} comes up most often ({count} liked jobs)."),
        weight: count as f64 / liked.len() as f64,
    })
}

fn selectivity(totals: DecisionTotals) -> Option<Insight> {
    let decided = totals.likes + totals.passes;
    if decided == 0 {
        return None;
    }
    let like_rate = totals.likes as f64 / decided as f64;

    let text = if like_rate < SELECTIVE_BELOW {
        format!(
            "You are selective: you liked only {}% of the jobs you saw.",
            percent(like_rate)
        )
    } else if like_rate > OPEN_ABOVE {
        format!(
            "You are open to many options: you liked {}% of the jobs you saw.",
            percent(like_rate)
        )
    } else {
        return None;
    };

    Some(Insight {
        category: InsightCategory::Selectivity,
        text,
        weight: like_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::Level;

    fn make_job(id: usize, work_type: WorkType) -> JobPosting {
        JobPosting {
            id: format!("job-{id}"),
            company: format!("Company {id}"),
            title: "Engineer".to_string(),
            location: format!("City {id}"),
            work_type,
            level: Level::Any,
            skills: vec![],
            salary: None,
            apply_url: None,
            sponsored: false,
            logo: None,
        }
    }

    fn find(insights: &[Insight], category: InsightCategory) -> Option<&Insight> {
        insights.iter().find(|i| i.category == category)
    }

    #[test]
    fn test_no_likes_means_no_insights() {
        let job = make_job(1, WorkType::Remote);
        let insights = analyze(&[&job], DecisionTotals { likes: 0, passes: 4 });
        assert!(insights.is_empty());
    }

    #[test]
    fn test_remote_affinity_reports_rounded_percentage() {
        let jobs: Vec<JobPosting> = (0..10)
            .map(|i| make_job(i, if i < 8 { WorkType::Remote } else { WorkType::Onsite }))
            .collect();
        let liked: Vec<&JobPosting> = jobs.iter().collect();

        let insights = analyze(&liked, DecisionTotals { likes: 10, passes: 10 });
        let remote = find(&insights, InsightCategory::RemoteAffinity).unwrap();
        assert!(remote.text.contains("80%"), "text was {}", remote.text);
        assert_eq!(percent(remote.weight), 80);
    }

    #[test]
    fn test_remote_affinity_below_threshold_is_silent() {
        let jobs: Vec<JobPosting> = (0..10)
            .map(|i| make_job(i, if i < 6 { WorkType::Remote } else { WorkType::Hybrid }))
            .collect();
        let liked: Vec<&JobPosting> = jobs.iter().collect();
        let insights = analyze(&liked, DecisionTotals { likes: 10, passes: 10 });
        assert!(find(&insights, InsightCategory::RemoteAffinity).is_none());
    }

    #[test]
    fn test_top_skills_counts_a_skill_once_per_job() {
        let mut job = make_job(1, WorkType::Any);
        job.skills = vec!["Go".to_string(), "go".to_string(), "Go".to_string()];
        let insights = analyze(&[&job], DecisionTotals { likes: 1, passes: 0 });

        let skills = find(&insights, InsightCategory::TopSkills).unwrap();
        assert!((skills.weight - 1.0).abs() < 1e-9);
        assert!(skills.text.contains("Go, go"), "text was {}", skills.text);
    }

    #[test]
    fn test_company_size_uses_sponsored_share() {
        let mut jobs: Vec<JobPosting> = (0..5).map(|i| make_job(i, WorkType::Any)).collect();
        for job in jobs.iter_mut().take(3) {
            job.sponsored = true;
        }
        let liked: Vec<&JobPosting> = jobs.iter().collect();
        let insights = analyze(&liked, DecisionTotals { likes: 5, passes: 5 });
        let size = find(&insights, InsightCategory::CompanySize).unwrap();
        assert!((size.weight - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_salary_preference_averages_parsable_salaries_only() {
        let mut a = make_job(1, WorkType::Any);
        a.salary = Some("$100K - $150K".to_string());
        let mut b = make_job(2, WorkType::Any);
        b.salary = Some("$120K - $180K".to_string());
        let mut c = make_job(3, WorkType::Any);
        c.salary = Some("Competitive".to_string());

        let insights = analyze(&[&a, &b, &c], DecisionTotals { likes: 3, passes: 3 });
        let salary = find(&insights, InsightCategory::SalaryPreference).unwrap();
        assert!(salary.text.contains("137500"), "text was {}", salary.text);
    }

    #[test]
    fn test_salary_preference_silent_at_or_below_threshold() {
        let mut a = make_job(1, WorkType::Any);
        a.salary = Some("$80K - $120K".to_string());
        let insights = analyze(&[&a], DecisionTotals { likes: 1, passes: 1 });
        assert!(find(&insights, InsightCategory::SalaryPreference).is_none());
    }

    #[test]
    fn test_top_skills_by_count_with_first_seen_ties() {
        let mut a = make_job(1, WorkType::Any);
        a.skills = vec!["Go".to_string(), "SQL".to_string(), "Python".to_string()];
        let mut b = make_job(2, WorkType::Any);
        b.skills = vec!["Python".to_string(), "Rust".to_string()];
        let mut c = make_job(3, WorkType::Any);
        c.skills = vec!["Python".to_string(), "SQL".to_string()];

        let insights = analyze(&[&a, &b, &c], DecisionTotals { likes: 3, passes: 3 });
        let skills = find(&insights, InsightCategory::TopSkills).unwrap();
        // Python 3, SQL 2, then Go beats Rust by first appearance
        assert!(skills.text.contains("Python, SQL, Go"), "text was {}", skills.text);
        assert!((skills.weight - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_location_requires_two_occurrences() {
        let mut a = make_job(1, WorkType::Any);
        a.location = "Remote".to_string();
        let mut b = make_job(2, WorkType::Any);
        b.location = "Remote".to_string();
        let c = make_job(3, WorkType::Any);

        let insights = analyze(&[&a, &b, &c], DecisionTotals { likes: 3, passes: 3 });
        let location = find(&insights, InsightCategory::TopLocation).unwrap();
        assert!(location.text.starts_with("Remote"));

        let single = analyze(&[&c], DecisionTotals { likes: 1, passes: 1 });
        assert!(find(&single, InsightCategory::TopLocation).is_none());
    }

    #[test]
    fn test_top_location_is_exact_match_only() {
        let mut a = make_job(1, WorkType::Any);
        a.location = "San Francisco, CA".to_string();
        let mut b = make_job(2, WorkType::Any);
        b.location = "San Francisco".to_string();
        let insights = analyze(&[&a, &b], DecisionTotals { likes: 2, passes: 2 });
        assert!(find(&insights, InsightCategory::TopLocation).is_none());
    }

    #[test]
    fn test_selectivity_bands() {
        let job = make_job(1, WorkType::Any);

        let selective = analyze(&[&job], DecisionTotals { likes: 1, passes: 9 });
        let insight = find(&selective, InsightCategory::Selectivity).unwrap();
        assert!(insight.text.contains("selective"));

        let open = analyze(&[&job], DecisionTotals { likes: 7, passes: 3 });
        let insight = find(&open, InsightCategory::Selectivity).unwrap();
        assert!(insight.text.contains("open"));

        let middle = analyze(&[&job], DecisionTotals { likes: 4, passes: 6 });
        assert!(find(&middle, InsightCategory::Selectivity).is_none());
    }

    #[test]
    fn test_selectivity_counts_all_decisions_even_without_resolvable_jobs() {
        let insights = analyze(&[], DecisionTotals { likes: 9, passes: 1 });
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].category, InsightCategory::Selectivity);
    }
}
