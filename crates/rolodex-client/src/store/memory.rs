//! In-memory credential store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use rolodex_core::Result;
use rolodex_core::store::{CredentialStore, PersistedCredentials};

/// A credential store that keeps everything in memory.
///
/// Useful in tests and in hosts without durable storage; credentials do
/// not survive the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credentials: RwLock<PersistedCredentials>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with credentials.
    pub fn with_credentials(credentials: PersistedCredentials) -> Self {
        Self {
            credentials: RwLock::new(credentials),
        }
    }

    /// Returns a copy of the current contents.
    pub async fn snapshot(&self) -> PersistedCredentials {
        self.credentials.read().await.clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<PersistedCredentials> {
        Ok(self.credentials.read().await.clone())
    }

    async fn save(&self, credentials: &PersistedCredentials) -> Result<()> {
        *self.credentials.write().await = credentials.clone();
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.credentials.write().await = PersistedCredentials::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_from_empty_store_yields_empty_credentials() {
        let store = MemoryCredentialStore::new();
        let creds = store.load().await.unwrap();
        assert!(creds.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = MemoryCredentialStore::new();
        store
            .save(&PersistedCredentials {
                access_token: Some("at1".into()),
                refresh_token: Some("rt1".into()),
                user: None,
            })
            .await
            .unwrap();

        let creds = store.load().await.unwrap();
        assert_eq!(creds.access_token.as_deref(), Some("at1"));
        assert_eq!(creds.refresh_token.as_deref(), Some("rt1"));
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = MemoryCredentialStore::with_credentials(PersistedCredentials {
            access_token: Some("at1".into()),
            refresh_token: Some("rt1".into()),
            user: None,
        });

        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }
}
