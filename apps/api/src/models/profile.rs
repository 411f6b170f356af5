use serde::{Deserialize, Serialize};

use crate::models::job::{Level, WorkType};

/// The swiper's self-description. Every field is optional in practice;
/// empty strings and `None` simply disable the matching rule that reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: String,
    pub major: String,
    pub location: String,
    pub work_type: Option<WorkType>,
    pub level: Option<Level>,
    pub min_salary: Option<u64>,
    pub skills: Vec<String>,
}
