//! HTTP plumbing for backend requests.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use rolodex_core::error::{ApiError, Error, TransportError};
use rolodex_core::types::BackendUrl;

use crate::endpoints::BackendErrorResponse;

/// Default bound on any single backend request, refresh exchange included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Low-level HTTP client for the rolodex backend.
///
/// Handles URL construction, bearer authentication, and error-body parsing.
/// Session logic lives above this layer; `BackendClient` never inspects or
/// mutates session state.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    backend: BackendUrl,
}

impl BackendClient {
    /// Create a new client for the given backend with the default timeout.
    pub fn new(backend: BackendUrl) -> Self {
        Self::with_timeout(backend, DEFAULT_TIMEOUT)
    }

    /// Create a new client with an explicit request timeout.
    ///
    /// The timeout bounds every request issued through this client; an
    /// elapsed timeout surfaces as a transport error, never an auth error.
    pub fn with_timeout(backend: BackendUrl, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rolodex/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self { client, backend }
    }

    /// Returns the backend URL this client is configured for.
    pub fn backend(&self) -> &BackendUrl {
        &self.backend
    }

    /// Issue a bearer-authenticated request and return the raw response.
    ///
    /// Caller-supplied headers are applied first; the authorization and
    /// content-type headers are set afterwards so callers cannot override
    /// them.
    #[instrument(skip(self, body, extra_headers, token), fields(backend = %self.backend))]
    pub async fn send_bearer(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        extra_headers: Option<&HeaderMap>,
        token: &str,
    ) -> Result<reqwest::Response, Error> {
        let url = self.backend.endpoint(path);
        debug!(%method, path, "authenticated request");

        let mut request = self.client.request(method, &url);
        if let Some(headers) = extra_headers {
            request = request.headers(headers.clone());
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request = request.headers(self.auth_headers(token));

        let response = request.send().await.map_err(transport_error)?;
        trace!(status = %response.status(), "backend response");
        Ok(response)
    }

    /// Issue an unauthenticated POST with a JSON body.
    #[instrument(skip(self, body), fields(backend = %self.backend))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, Error>
    where
        B: serde::Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        let url = self.backend.endpoint(path);
        debug!(path, "request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_response(response).await
    }

    /// Issue a bearer-authenticated POST with no request body.
    ///
    /// Used for endpoints like the refresh exchange that authenticate the
    /// request itself with a token and accept no payload.
    #[instrument(skip(self, token), fields(backend = %self.backend))]
    pub async fn post_bearer_no_body<R>(&self, path: &str, token: &str) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let url = self.backend.endpoint(path);
        debug!(path, "authenticated request (no body)");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_response(response).await
    }

    /// Create authorization headers for authenticated requests.
    fn auth_headers(&self, token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).expect("invalid token characters"),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Handle a backend response, parsing the body or error.
    pub(crate) async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<R, Error> {
        let status = response.status();
        trace!(status = %status, "backend response");

        if status.is_success() {
            let body = response.json::<R>().await.map_err(transport_error)?;
            Ok(body)
        } else {
            let error = self.parse_error_response(response).await;
            Err(Error::Api(error))
        }
    }

    /// Parse a backend error response.
    pub(crate) async fn parse_error_response(&self, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();

        // Try to parse as the backend's error format
        match response.json::<BackendErrorResponse>().await {
            Ok(error_body) => ApiError::new(status, error_body.error, error_body.message),
            Err(_) => ApiError::new(status, None, None),
        }
    }
}

/// Map a reqwest error into the transport error taxonomy.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let backend = BackendUrl::new("https://api.example.com").unwrap();
        let client = BackendClient::new(backend.clone());
        assert_eq!(client.backend().as_str(), backend.as_str());
    }
}
