//! Token refresh coordination.

use std::sync::Mutex as StdMutex;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use rolodex_core::error::{AuthError, Error};
use rolodex_core::{AccessToken, Result, UserProfile};

use crate::endpoints::{AUTH_REFRESH, RefreshResponse};
use crate::http::BackendClient;
use crate::session::SessionManager;

/// Observable phase of the refresh state machine.
///
/// The terminal `Refreshed`/`Failed` states are consumed as the return
/// value of [`RefreshCoordinator::refresh`]; the coordinator itself is
/// back to `Idle` by the time a caller observes the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

/// Outcome of one refresh exchange.
enum RefreshOutcome {
    Refreshed(AccessToken),
    Failed(AuthError),
}

/// Serializes concurrent token refreshes into a single in-flight exchange.
///
/// When several authenticated calls fail authorization at the same moment,
/// only the first to acquire the gate performs the HTTP exchange; the rest
/// wait on the gate and then share its outcome, adopting the rotated access
/// token or surfacing the same auth error. This keeps a burst of expired
/// calls from stampeding the refresh endpoint or racing each other with
/// stale tokens.
pub struct RefreshCoordinator {
    gate: Mutex<()>,
    state: StdMutex<RefreshState>,
    completed: StdMutex<CompletedExchange>,
}

/// Record of the most recently completed exchange, so gate waiters can
/// resolve against the winner's outcome instead of issuing their own.
/// Transport failures are not recorded; a waiter retries those itself.
#[derive(Default)]
struct CompletedExchange {
    generation: u64,
    failure: Option<AuthError>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self {
            gate: Mutex::new(()),
            state: StdMutex::new(RefreshState::Idle),
            completed: StdMutex::new(CompletedExchange::default()),
        }
    }

    /// Returns the current phase of the state machine.
    pub fn state(&self) -> RefreshState {
        *self.state.lock().expect("refresh state lock poisoned")
    }

    fn set_state(&self, state: RefreshState) {
        *self.state.lock().expect("refresh state lock poisoned") = state;
    }

    fn generation(&self) -> u64 {
        self.completed
            .lock()
            .expect("refresh outcome lock poisoned")
            .generation
    }

    fn shared_failure(&self) -> Option<AuthError> {
        self.completed
            .lock()
            .expect("refresh outcome lock poisoned")
            .failure
            .clone()
    }

    fn record_completion(&self, failure: Option<AuthError>) {
        let mut completed = self.completed.lock().expect("refresh outcome lock poisoned");
        completed.generation += 1;
        completed.failure = failure;
    }

    /// Obtain a fresh access token after an authorization failure.
    ///
    /// `failed_token` is the access token the failing call used (`None` when
    /// the call never had one). Callers that lose the race for the gate
    /// share the winner's outcome instead of issuing their own exchange:
    /// a rotated token on success, the winner's auth error on failure.
    ///
    /// On success the session is updated with the new access token, the
    /// *persisted* user profile, and the unchanged refresh token. On an
    /// auth failure the session is logged out before the error is returned;
    /// transport failures leave the session untouched.
    #[instrument(skip_all)]
    pub async fn refresh(
        &self,
        session: &SessionManager,
        http: &BackendClient,
        failed_token: Option<&str>,
    ) -> Result<AccessToken> {
        let observed = self.generation();
        let _guard = self.gate.lock().await;

        // An exchange completed while we waited for the gate: resolve
        // against its outcome instead of issuing a second one.
        if self.generation() != observed {
            return match self.shared_failure() {
                Some(err) => Err(err.into()),
                None => match session.access_token().await {
                    Some(current) => {
                        debug!("adopting access token from a concurrent refresh");
                        Ok(current)
                    }
                    // The winner succeeded but the session was logged out
                    // again before we woke up.
                    None => Err(AuthError::MissingRefreshToken.into()),
                },
            };
        }

        // The token changed under us without a refresh (e.g. a fresh login
        // on another task); use it rather than exchanging.
        if let Some(current) = session.access_token().await {
            let already_rotated = match failed_token {
                Some(failed) => current.as_str() != failed,
                None => true,
            };
            if already_rotated {
                debug!("access token already rotated, skipping refresh");
                return Ok(current);
            }
        }

        self.set_state(RefreshState::Refreshing);
        let outcome = self.exchange(session, http).await;
        self.set_state(RefreshState::Idle);

        match outcome? {
            RefreshOutcome::Refreshed(token) => {
                self.record_completion(None);
                Ok(token)
            }
            RefreshOutcome::Failed(err) => {
                self.record_completion(Some(err.clone()));
                Err(err.into())
            }
        }
    }

    async fn exchange(
        &self,
        session: &SessionManager,
        http: &BackendClient,
    ) -> Result<RefreshOutcome> {
        let Some(refresh_token) = session.refresh_token().await else {
            info!("refresh attempted with no refresh token");
            force_logout(session).await;
            return Ok(RefreshOutcome::Failed(AuthError::MissingRefreshToken));
        };

        info!("refreshing access token");
        let response: Result<RefreshResponse> = http
            .post_bearer_no_body(AUTH_REFRESH, refresh_token.as_str())
            .await;

        match response {
            Ok(grant) => {
                let new_token = AccessToken::new(grant.access_token);

                // Reconstruct the profile from the most recently persisted
                // value rather than an in-memory snapshot, so an intervening
                // logout/login elsewhere is not overwritten with stale data.
                let persisted_profile = session.store().load().await?.user;
                let profile = match persisted_profile {
                    Some(profile) => profile,
                    // A refresh token without a stored profile should not
                    // happen; an empty profile beats failing the refresh.
                    None => UserProfile::new(String::new()),
                };

                // The backend does not rotate refresh tokens; keep ours.
                session
                    .login(new_token.clone(), profile, refresh_token)
                    .await?;

                debug!("access token refreshed");
                Ok(RefreshOutcome::Refreshed(new_token))
            }
            Err(Error::Api(err)) => {
                warn!(status = err.status, "refresh rejected by backend");
                force_logout(session).await;
                Ok(RefreshOutcome::Failed(AuthError::RefreshRejected))
            }
            // Transport failures are not auth failures: no session mutation.
            Err(other) => Err(other),
        }
    }
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("state", &self.state())
            .finish()
    }
}

/// Log out as a side effect of an auth failure, keeping the auth error as
/// the one the caller sees even if clearing the store fails.
pub(crate) async fn force_logout(session: &SessionManager) {
    if let Err(e) = session.logout().await {
        warn!(error = %e, "forced logout could not clear the credential store");
    }
}
