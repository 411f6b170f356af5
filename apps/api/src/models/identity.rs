use std::fmt;

use serde::{Deserialize, Serialize};

pub const GUEST: &str = "guest";

/// Who the swipes belong to: a user's email, or the literal `guest`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Blank input (or any casing of "guest") maps to the guest identity.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(GUEST) {
            Self::guest()
        } else {
            Identity(trimmed.to_string())
        }
    }

    pub fn guest() -> Self {
        Identity(GUEST.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
