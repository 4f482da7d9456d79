//! User profile record.

use serde::{Deserialize, Serialize};

/// The last-known attributes of the logged-in user.
///
/// The profile may be stale relative to the backend but is treated as
/// authoritative for display until replaced by an explicit login. A token
/// refresh never discards it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserProfile {
    /// Create a profile with just a display name.
    pub fn new(first_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: None,
            email: None,
        }
    }

    /// Returns the name to display for this user.
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_minimal_record() {
        let profile: UserProfile = serde_json::from_str(r#"{"first_name":"Ana"}"#).unwrap();
        assert_eq!(profile.first_name, "Ana");
        assert!(profile.last_name.is_none());
        assert_eq!(profile.display_name(), "Ana");
    }

    #[test]
    fn display_name_joins_first_and_last() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"id":1,"first_name":"Ana","last_name":"Petrova"}"#).unwrap();
        assert_eq!(profile.display_name(), "Ana Petrova");
    }
}
