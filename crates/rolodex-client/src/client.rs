//! The authenticated API client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use rolodex_core::error::AuthError;
use rolodex_core::store::CredentialStore;
use rolodex_core::types::BackendUrl;
use rolodex_core::{AccessToken, Result};

use crate::http::BackendClient;
use crate::refresh::{RefreshCoordinator, force_logout};
use crate::session::SessionManager;

/// The public entry point for every data-access call.
///
/// `ApiClient` attaches the current access token to outgoing requests,
/// detects authorization failures, drives the refresh coordinator, retries
/// the original request once, and forces a logout when recovery fails.
/// This is the only component permitted to log the user out as a side
/// effect of a failed data call.
///
/// Cheap to clone; clones share the same session and refresh coordinator.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use rolodex_client::{ApiClient, FileCredentialStore};
/// use rolodex_core::BackendUrl;
///
/// # async fn example() -> Result<(), rolodex_core::Error> {
/// let backend = BackendUrl::new("https://api.example.com")?;
/// let store = Arc::new(FileCredentialStore::new()?);
/// let client = ApiClient::new(backend, store);
///
/// client.session().bootstrap().await?;
/// if client.session().is_authenticated().await {
///     let contacts = client.list_contacts().await?;
///     println!("{} contacts", contacts.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    http: BackendClient,
    session: SessionManager,
    refresh: RefreshCoordinator,
}

impl ApiClient {
    /// Create a client for the given backend and credential store.
    pub fn new(backend: BackendUrl, store: Arc<dyn CredentialStore>) -> Self {
        Self::from_parts(BackendClient::new(backend), store)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(
        backend: BackendUrl,
        store: Arc<dyn CredentialStore>,
        timeout: Duration,
    ) -> Self {
        Self::from_parts(BackendClient::with_timeout(backend, timeout), store)
    }

    fn from_parts(http: BackendClient, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http,
                session: SessionManager::new(store),
                refresh: RefreshCoordinator::new(),
            }),
        }
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    pub(crate) fn http(&self) -> &BackendClient {
        &self.inner.http
    }

    /// Issue an authenticated request, recovering once from an expired
    /// access token.
    ///
    /// Non-401 responses are returned unchanged, whatever their status; a
    /// 401 triggers a (single-flight) token refresh followed by exactly one
    /// retry. A 401 on the retry is terminal: the session is logged out and
    /// [`AuthError::SessionExpired`] is returned. Caller-supplied headers
    /// cannot override the authorization header.
    #[instrument(skip(self, body, headers))]
    pub async fn authenticated_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        headers: Option<&HeaderMap>,
    ) -> Result<reqwest::Response> {
        let token = match self.inner.session.access_token().await {
            Some(token) => token,
            // No access token yet (e.g. cleared by a crash mid-login):
            // try to mint one from the refresh token before the first send.
            None => self.refresh_token_for(None).await?,
        };

        let response = self
            .inner
            .http
            .send_bearer(method.clone(), path, body, headers, token.as_str())
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!(path, "authorization failed, attempting token refresh");
        let new_token = self.refresh_token_for(Some(token.as_str())).await?;

        let retry = self
            .inner
            .http
            .send_bearer(method, path, body, headers, new_token.as_str())
            .await?;

        if retry.status() == StatusCode::UNAUTHORIZED {
            // A fresh token was still rejected; do not loop.
            warn!(path, "retried request still unauthorized, logging out");
            force_logout(&self.inner.session).await;
            return Err(AuthError::SessionExpired.into());
        }

        Ok(retry)
    }

    async fn refresh_token_for(&self, failed_token: Option<&str>) -> Result<AccessToken> {
        self.inner
            .refresh
            .refresh(&self.inner.session, &self.inner.http, failed_token)
            .await
    }

    // ========================================================================
    // Typed helpers
    // ========================================================================

    /// Authenticated GET, deserializing a JSON response.
    pub(crate) async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let response = self
            .authenticated_request(Method::GET, path, None, None)
            .await?;
        self.inner.http.handle_response(response).await
    }

    /// Authenticated POST with a JSON body, deserializing a JSON response.
    pub(crate) async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let body = body_value(body)?;
        let response = self
            .authenticated_request(Method::POST, path, Some(&body), None)
            .await?;
        self.inner.http.handle_response(response).await
    }

    /// Authenticated POST without a request body.
    pub(crate) async fn post_empty_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let response = self
            .authenticated_request(Method::POST, path, None, None)
            .await?;
        self.inner.http.handle_response(response).await
    }

    /// Authenticated PUT with a JSON body, deserializing a JSON response.
    pub(crate) async fn put_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let body = body_value(body)?;
        let response = self
            .authenticated_request(Method::PUT, path, Some(&body), None)
            .await?;
        self.inner.http.handle_response(response).await
    }

    /// Authenticated DELETE, discarding any response body.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let response = self
            .authenticated_request(Method::DELETE, path, None, None)
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            let error = self.inner.http.parse_error_response(response).await;
            Err(error.into())
        }
    }

    /// Authenticated DELETE with a JSON body, deserializing a JSON response.
    pub(crate) async fn delete_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let body = body_value(body)?;
        let response = self
            .authenticated_request(Method::DELETE, path, Some(&body), None)
            .await?;
        self.inner.http.handle_response(response).await
    }
}

/// Serialize a request body, mapping failure to an input error rather than
/// a transport one; nothing has gone over the wire yet.
fn body_value<B: Serialize>(body: &B) -> Result<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| {
        rolodex_core::error::InvalidInputError::RequestBody {
            message: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCredentialStore;
    use rolodex_core::Error;
    use rolodex_core::error::InvalidInputError;
    use std::collections::HashMap;

    #[tokio::test]
    async fn unserializable_body_is_an_input_error() {
        let backend = BackendUrl::new("https://api.example.com").unwrap();
        let client = ApiClient::new(backend, Arc::new(MemoryCredentialStore::new()));

        // Non-string map keys cannot be represented in JSON; this must fail
        // locally, before any request is issued.
        let mut body = HashMap::new();
        body.insert(vec![1u8], "x");
        let result: Result<serde_json::Value> = client.post_json("/contacts", &body).await;

        assert!(matches!(
            result,
            Err(Error::InvalidInput(InvalidInputError::RequestBody { .. }))
        ));
    }
}
