//! In-memory session state, write-through to the credential store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use rolodex_core::store::{CredentialStore, PersistedCredentials};
use rolodex_core::{AccessToken, RefreshToken, Result, UserProfile};

/// The process-wide holder of the current session.
///
/// All mutation goes through [`SessionManager::login`] and
/// [`SessionManager::logout`]; both write the credential store and the
/// in-memory state under one write lock, so the two can never diverge
/// across a user-visible transition.
///
/// Cheap to clone (internal `Arc`) and safe to share across tasks.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    store: Arc<dyn CredentialStore>,
    state: RwLock<SessionState>,
    bootstrapped: AtomicBool,
    is_loading: AtomicBool,
}

#[derive(Default)]
struct SessionState {
    access_token: Option<AccessToken>,
    refresh_token: Option<RefreshToken>,
    profile: Option<UserProfile>,
}

impl SessionManager {
    /// Create an empty session backed by the given credential store.
    ///
    /// The session reports `is_loading` until [`bootstrap`](Self::bootstrap)
    /// has run.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                store,
                state: RwLock::new(SessionState::default()),
                bootstrapped: AtomicBool::new(false),
                is_loading: AtomicBool::new(true),
            }),
        }
    }

    /// Adopt persisted credentials, once per process lifetime.
    ///
    /// A second call is a no-op. If the store holds no refresh token the
    /// session is initialized to the unauthenticated state (partial state
    /// is never adopted). `is_loading` becomes false unconditionally at
    /// the end, error path included. Never touches the network.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) -> Result<()> {
        if self.inner.bootstrapped.swap(true, Ordering::SeqCst) {
            debug!("bootstrap already ran, skipping");
            return Ok(());
        }

        let result = self.bootstrap_inner().await;
        self.inner.is_loading.store(false, Ordering::SeqCst);
        result
    }

    async fn bootstrap_inner(&self) -> Result<()> {
        let persisted = self.inner.store.load().await?;

        let Some(refresh_token) = persisted.refresh_token else {
            // No refresh token means no session, whatever else is stored.
            info!("no persisted refresh token, starting unauthenticated");
            return self.logout().await;
        };

        let mut state = self.inner.state.write().await;
        state.access_token = persisted.access_token.map(AccessToken::new);
        state.refresh_token = Some(RefreshToken::new(refresh_token));
        state.profile = persisted.user;

        info!("restored persisted session");
        Ok(())
    }

    /// Adopt a new set of credentials, persisting them first.
    ///
    /// Callable from the user-facing login flow and from the refresh flow
    /// alike. If persisting fails the in-memory state is left untouched.
    #[instrument(skip_all)]
    pub async fn login(
        &self,
        access_token: AccessToken,
        profile: UserProfile,
        refresh_token: RefreshToken,
    ) -> Result<()> {
        let mut state = self.inner.state.write().await;

        let persisted = PersistedCredentials {
            access_token: Some(access_token.as_str().to_string()),
            refresh_token: Some(refresh_token.as_str().to_string()),
            user: Some(profile.clone()),
        };
        self.inner.store.save(&persisted).await?;

        state.access_token = Some(access_token);
        state.refresh_token = Some(refresh_token);
        state.profile = Some(profile);

        debug!("session credentials updated");
        Ok(())
    }

    /// Clear the session from memory and from the credential store.
    ///
    /// Idempotent. The in-memory state is cleared even if the store clear
    /// fails, so a forced logout always takes local effect.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        let mut state = self.inner.state.write().await;
        *state = SessionState::default();

        if let Err(e) = self.inner.store.clear().await {
            warn!(error = %e, "failed to clear credential store");
            return Err(e);
        }

        debug!("session cleared");
        Ok(())
    }

    /// Returns the current access token, if any.
    pub async fn access_token(&self) -> Option<AccessToken> {
        self.inner.state.read().await.access_token.clone()
    }

    /// Returns the current refresh token, if any.
    pub async fn refresh_token(&self) -> Option<RefreshToken> {
        self.inner.state.read().await.refresh_token.clone()
    }

    /// Returns the last-known user profile, if any.
    pub async fn profile(&self) -> Option<UserProfile> {
        self.inner.state.read().await.profile.clone()
    }

    /// A session counts as authenticated exactly when a refresh token is
    /// present.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.state.read().await.refresh_token.is_some()
    }

    /// True only while the bootstrap read from persisted storage is pending.
    pub fn is_loading(&self) -> bool {
        self.inner.is_loading.load(Ordering::SeqCst)
    }

    /// The credential store backing this session.
    pub(crate) fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("is_loading", &self.is_loading())
            .field("tokens", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCredentialStore;

    fn manager_with(creds: PersistedCredentials) -> SessionManager {
        SessionManager::new(Arc::new(MemoryCredentialStore::with_credentials(creds)))
    }

    #[tokio::test]
    async fn bootstrap_restores_full_session() {
        let manager = manager_with(PersistedCredentials {
            access_token: Some("expired".into()),
            refresh_token: Some("rt1".into()),
            user: Some(UserProfile::new("Ana")),
        });

        assert!(manager.is_loading());
        manager.bootstrap().await.unwrap();

        assert!(!manager.is_loading());
        assert!(manager.is_authenticated().await);
        assert_eq!(manager.profile().await.unwrap().first_name, "Ana");
        assert_eq!(manager.access_token().await.unwrap().as_str(), "expired");
    }

    #[tokio::test]
    async fn bootstrap_with_empty_store_is_unauthenticated() {
        let manager = manager_with(PersistedCredentials::default());

        manager.bootstrap().await.unwrap();

        assert!(!manager.is_loading());
        assert!(!manager.is_authenticated().await);
        assert!(manager.access_token().await.is_none());
    }

    #[tokio::test]
    async fn bootstrap_rejects_partial_state_without_refresh_token() {
        let store = Arc::new(MemoryCredentialStore::with_credentials(
            PersistedCredentials {
                access_token: Some("at1".into()),
                refresh_token: None,
                user: Some(UserProfile::new("Ana")),
            },
        ));
        let manager = SessionManager::new(store.clone());

        manager.bootstrap().await.unwrap();

        assert!(!manager.is_authenticated().await);
        assert!(manager.access_token().await.is_none());
        // the store was cleared rather than left with orphaned fields
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let store = Arc::new(MemoryCredentialStore::new());
        let manager = SessionManager::new(store.clone());

        manager.bootstrap().await.unwrap();

        // A login after bootstrap must survive a stray second bootstrap call.
        manager
            .login(
                AccessToken::new("at1"),
                UserProfile::new("Ana"),
                RefreshToken::new("rt1"),
            )
            .await
            .unwrap();
        manager.bootstrap().await.unwrap();

        assert!(manager.is_authenticated().await);
        assert_eq!(manager.access_token().await.unwrap().as_str(), "at1");
    }

    #[tokio::test]
    async fn login_writes_through_to_store() {
        let store = Arc::new(MemoryCredentialStore::new());
        let manager = SessionManager::new(store.clone());
        manager.bootstrap().await.unwrap();

        manager
            .login(
                AccessToken::new("at1"),
                UserProfile::new("Ana"),
                RefreshToken::new("rt1"),
            )
            .await
            .unwrap();

        let persisted = store.snapshot().await;
        assert_eq!(persisted.access_token.as_deref(), Some("at1"));
        assert_eq!(persisted.refresh_token.as_deref(), Some("rt1"));
        assert_eq!(persisted.user.unwrap().first_name, "Ana");
    }

    #[tokio::test]
    async fn logout_twice_matches_logout_once() {
        let store = Arc::new(MemoryCredentialStore::new());
        let manager = SessionManager::new(store.clone());
        manager.bootstrap().await.unwrap();
        manager
            .login(
                AccessToken::new("at1"),
                UserProfile::new("Ana"),
                RefreshToken::new("rt1"),
            )
            .await
            .unwrap();

        manager.logout().await.unwrap();
        manager.logout().await.unwrap();

        assert!(!manager.is_authenticated().await);
        assert!(store.snapshot().await.is_empty());
    }
}
