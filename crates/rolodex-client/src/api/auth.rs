//! Account and session endpoints.

use reqwest::Method;
use tracing::{debug, info, instrument};

use rolodex_core::error::{AuthError, Error};
use rolodex_core::{AccessToken, RefreshToken, Result, UserProfile};

use crate::client::ApiClient;
use crate::endpoints::{
    AUTH_LOGIN, AUTH_LOGOUT, AUTH_ME, AUTH_REGISTER, AUTH_UPDATE, LoginRequest, RegisterRequest,
    TokenGrantResponse, UserEnvelope,
};

impl ApiClient {
    /// Log in with email and password, adopting the granted session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] when the backend rejects
    /// the login; other failures pass through unchanged.
    #[instrument(skip(self, password), fields(backend = %self.http().backend()))]
    pub async fn login_with_password(&self, email: &str, password: &str) -> Result<UserProfile> {
        info!("logging in");

        let request = LoginRequest { email, password };
        let grant: TokenGrantResponse =
            self.http().post(AUTH_LOGIN, &request).await.map_err(|e| match e {
                Error::Api(api) if api.status == 401 => AuthError::InvalidCredentials.into(),
                other => other,
            })?;

        self.adopt_grant(grant).await
    }

    /// Register a new account, adopting the granted session.
    #[instrument(skip(self, password), fields(backend = %self.http().backend()))]
    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile> {
        info!("registering account");

        let request = RegisterRequest {
            first_name,
            last_name,
            email,
            password,
        };
        let grant: TokenGrantResponse = self.http().post(AUTH_REGISTER, &request).await?;

        self.adopt_grant(grant).await
    }

    async fn adopt_grant(&self, grant: TokenGrantResponse) -> Result<UserProfile> {
        self.session()
            .login(
                AccessToken::new(grant.access_token),
                grant.user.clone(),
                RefreshToken::new(grant.refresh_token),
            )
            .await?;

        debug!("session adopted");
        Ok(grant.user)
    }

    /// Fetch the current user from the backend.
    ///
    /// Goes through the authenticated request path, so an expired access
    /// token is recovered transparently.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<UserProfile> {
        let envelope: UserEnvelope = self.get_json(AUTH_ME).await?;
        Ok(envelope.user)
    }

    /// Update the user's profile server-side and refresh the local copy.
    #[instrument(skip_all)]
    pub async fn update_profile(&self, profile: &UserProfile) -> Result<UserProfile> {
        let envelope: UserEnvelope = self.put_json(AUTH_UPDATE, profile).await?;

        // Re-persist the updated profile alongside the current tokens.
        let access = self.session().access_token().await;
        let refresh = self.session().refresh_token().await;
        if let (Some(access), Some(refresh)) = (access, refresh) {
            self.session()
                .login(access, envelope.user.clone(), refresh)
                .await?;
        }

        Ok(envelope.user)
    }

    /// Log out, revoking the session server-side on a best-effort basis.
    ///
    /// The local session is cleared even when the revocation call fails;
    /// the user always ends up logged out.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        if let Some(token) = self.session().access_token().await {
            let revoked = self
                .http()
                .send_bearer(Method::POST, AUTH_LOGOUT, None, None, token.as_str())
                .await;
            if let Err(e) = revoked {
                debug!(error = %e, "server-side logout failed, clearing locally");
            }
        }

        self.session().logout().await
    }
}
