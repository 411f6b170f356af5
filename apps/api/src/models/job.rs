use serde::{Deserialize, Serialize};

/// Work arrangement offered by a posting (or preferred by a profile).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkType {
    Remote,
    Hybrid,
    Onsite,
    #[default]
    Any,
}

/// Seniority band of a posting (or preferred by a profile).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Intern,
    Junior,
    #[default]
    Any,
}

impl Level {
    /// Infers a level from a job title: "intern" wins over "junior"/"new grad".
    pub fn infer_from_title(title: &str) -> Self {
        let title = title.to_lowercase();
        if title.contains("intern") {
            Level::Intern
        } else if title.contains("junior") || title.contains("new grad") {
            Level::Junior
        } else {
            Level::Any
        }
    }
}

/// A single job posting as shown on a swipe card.
///
/// Ids are namespaced by source (`gh-{org}-{n}`, `fallback-N`), so they are
/// unique across the remote feed and the embedded catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub work_type: WorkType,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_url: Option<String>,
    #[serde(default)]
    pub sponsored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_level_intern() {
        assert_eq!(Level::infer_from_title("Software Engineering Intern"), Level::Intern);
        assert_eq!(Level::infer_from_title("INTERNSHIP - Data"), Level::Intern);
    }

    #[test]
    fn test_infer_level_junior_and_new_grad() {
        assert_eq!(Level::infer_from_title("Junior Backend Engineer"), Level::Junior);
        assert_eq!(Level::infer_from_title("Software Engineer, New Grad"), Level::Junior);
    }

    #[test]
    fn test_infer_level_defaults_to_any() {
        assert_eq!(Level::infer_from_title("Staff Engineer"), Level::Any);
        assert_eq!(Level::infer_from_title(""), Level::Any);
    }

    #[test]
    fn test_posting_deserializes_camel_case_with_defaults() {
        let json = r#"{
            "id": "gh-stripe-42",
            "company": "stripe",
            "title": "Backend Engineer",
            "workType": "remote",
            "applyUrl": "https://stripe.com/jobs/42"
        }"#;
        let job: JobPosting = serde_json::from_str(json).unwrap();
        assert_eq!(job.work_type, WorkType::Remote);
        assert_eq!(job.level, Level::Any);
        assert!(job.skills.is_empty());
        assert!(!job.sponsored);
        assert_eq!(job.apply_url.as_deref(), Some("https://stripe.com/jobs/42"));
        assert_eq!(job.location, "");
    }

    #[test]
    fn test_posting_serializes_without_absent_optionals() {
        let job = JobPosting {
            id: "fallback-1".to_string(),
            company: "TechCorp".to_string(),
            title: "Frontend Developer".to_string(),
            location: "Seoul, Korea".to_string(),
            work_type: WorkType::Hybrid,
            level: Level::Junior,
            skills: vec!["React".to_string()],
            salary: None,
            apply_url: None,
            sponsored: false,
            logo: None,
        };
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["workType"], "hybrid");
        assert!(value.get("salary").is_none());
        assert!(value.get("logo").is_none());
    }
}
