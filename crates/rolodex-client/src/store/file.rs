//! File-backed credential store.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use directories::ProjectDirs;
use tracing::debug;

use rolodex_core::error::{Error, StorageError};
use rolodex_core::store::{CredentialStore, PersistedCredentials};
use rolodex_core::Result;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// File name for the persisted session inside the data directory.
const SESSION_FILE: &str = "session.json";

/// A credential store persisting to a JSON file in the user's data
/// directory.
///
/// The file holds the `accessToken` / `refreshToken` / `userData` keys as
/// one JSON object and is written with restrictive permissions on Unix.
/// A missing file reads as empty credentials, never as an error.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store at the platform's default data directory.
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "rolodex").ok_or_else(|| StorageError::Io {
            message: "could not determine data directory".to_string(),
        })?;
        Ok(Self {
            path: dirs.data_dir().join(SESSION_FILE),
        })
    }

    /// Create a store at an explicit file path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// The file path this store persists to.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn io_error(err: std::io::Error) -> Error {
        StorageError::Io {
            message: err.to_string(),
        }
        .into()
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<PersistedCredentials> {
        if !self.path.exists() {
            return Ok(PersistedCredentials::default());
        }

        let json = fs::read_to_string(&self.path).map_err(Self::io_error)?;
        let credentials = serde_json::from_str(&json).map_err(|e| StorageError::Serialization {
            message: e.to_string(),
        })?;

        Ok(credentials)
    }

    async fn save(&self, credentials: &PersistedCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(Self::io_error)?;
        }

        let json =
            serde_json::to_string_pretty(credentials).map_err(|e| StorageError::Serialization {
                message: e.to_string(),
            })?;
        fs::write(&self.path, &json).map_err(Self::io_error)?;

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        {
            let mut perms = fs::metadata(&self.path).map_err(Self::io_error)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms).map_err(Self::io_error)?;
        }

        debug!(path = %self.path.display(), "credentials persisted");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(Self::io_error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileCredentialStore {
        FileCredentialStore::with_path(dir.path().join("session.json"))
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_load_clear_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .save(&PersistedCredentials {
                access_token: Some("at1".into()),
                refresh_token: Some("rt1".into()),
                user: None,
            })
            .await
            .unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.refresh_token.as_deref(), Some("rt1"));

        store.clear().await.unwrap();
        assert!(!store.path().exists());
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn persisted_file_uses_storage_key_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store
            .save(&PersistedCredentials {
                access_token: Some("at1".into()),
                refresh_token: Some("rt1".into()),
                user: None,
            })
            .await
            .unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("accessToken"));
        assert!(raw.contains("refreshToken"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn session_file_has_restrictive_permissions() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&PersistedCredentials::default()).await.unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
