//! rolodex-client - Authenticated session layer and API client.
//!
//! This crate implements the session core of the rolodex contact manager:
//! a credential store, an in-memory session holder that writes through to
//! it, a single-flight token refresh coordinator, and an authenticated
//! request wrapper that recovers transparently from an expired access
//! token. High-level auth and contact operations are built on top.

mod api;
mod client;
mod endpoints;
mod http;
mod refresh;
mod session;
mod store;

pub use client::ApiClient;
pub use http::{BackendClient, DEFAULT_TIMEOUT};
pub use refresh::{RefreshCoordinator, RefreshState};
pub use session::SessionManager;
pub use store::{FileCredentialStore, MemoryCredentialStore};
