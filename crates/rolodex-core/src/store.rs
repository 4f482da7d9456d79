//! Persisted credential store contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::profile::UserProfile;

/// The three session fields as they exist in durable storage.
///
/// Absent entries map to `None`; loading from an empty store is not an
/// error. No validation of token shape or expiry happens here; that is
/// the caller's responsibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedCredentials {
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(rename = "userData", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl PersistedCredentials {
    /// Returns true if no fields are set.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
    }
}

/// A durable client-side key-value store for session credentials.
///
/// Implementations are pure get/set/clear with no business logic. The
/// session layer treats the store strictly as a write-through cache: it is
/// read at bootstrap and when reconstructing the profile after a token
/// refresh, never mid-flight for tokens.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the persisted credentials. Missing entries are `None`, never an
    /// error.
    async fn load(&self) -> Result<PersistedCredentials>;

    /// Replace the persisted credentials.
    async fn save(&self, credentials: &PersistedCredentials) -> Result<()>;

    /// Remove all persisted credentials. Safe to call when already empty.
    async fn clear(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_keys_match_storage_names() {
        let creds = PersistedCredentials {
            access_token: Some("at1".into()),
            refresh_token: Some("rt1".into()),
            user: Some(UserProfile::new("Ana")),
        };
        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json["accessToken"], "at1");
        assert_eq!(json["refreshToken"], "rt1");
        assert_eq!(json["userData"]["first_name"], "Ana");
    }

    #[test]
    fn missing_keys_deserialize_as_none() {
        let creds: PersistedCredentials = serde_json::from_str("{}").unwrap();
        assert!(creds.is_empty());
    }
}
