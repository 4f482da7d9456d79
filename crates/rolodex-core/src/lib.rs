//! rolodex-core - Core types and traits for the rolodex client.
//!
//! This crate holds the pieces shared by every rolodex frontend: opaque
//! token types, the user profile and contact records, the persisted
//! credential store contract, and the unified error type. It performs no
//! I/O of its own.

pub mod contact;
pub mod error;
pub mod profile;
pub mod store;
pub mod tokens;
pub mod types;

pub use contact::{Category, Contact, ContactAddress, ContactEmail, ContactLink, ContactPhone};
pub use error::Error;
pub use profile::UserProfile;
pub use store::{CredentialStore, PersistedCredentials};
pub use tokens::{AccessToken, RefreshToken};
pub use types::BackendUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
