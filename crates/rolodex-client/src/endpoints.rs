//! Backend endpoint paths and request/response types.

use serde::{Deserialize, Serialize};

use rolodex_core::UserProfile;
use rolodex_core::contact::{Category, Contact};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// POST /auth/login
pub const AUTH_LOGIN: &str = "/auth/login";

/// POST /auth/register
pub const AUTH_REGISTER: &str = "/auth/register";

/// POST /auth/refresh
pub const AUTH_REFRESH: &str = "/auth/refresh";

/// POST /auth/logout
pub const AUTH_LOGOUT: &str = "/auth/logout";

/// GET /auth/me
pub const AUTH_ME: &str = "/auth/me";

/// PUT /auth/update
pub const AUTH_UPDATE: &str = "/auth/update";

/// /contacts and /contacts/{id}
pub const CONTACTS: &str = "/contacts";

/// GET /contacts/favorites
pub const CONTACTS_FAVORITES: &str = "/contacts/favorites";

/// DELETE /contacts/bulk-delete
pub const CONTACTS_BULK_DELETE: &str = "/contacts/bulk-delete";

/// /categories and /categories/{id}
pub const CATEGORIES: &str = "/categories";

/// Returns the path for a single contact.
pub fn contact_path(id: i64) -> String {
    format!("{}/{}", CONTACTS, id)
}

/// Returns the path for toggling a contact's favorite flag.
pub fn favorite_path(id: i64) -> String {
    format!("{}/{}/favorite", CONTACTS, id)
}

/// Returns the path for a single category.
pub fn category_path(id: i64) -> String {
    format!("{}/{}", CATEGORIES, id)
}

/// Returns the path for a contact's category associations.
pub fn contact_categories_path(contact_id: i64) -> String {
    format!("/contact_categories/contacts/{}/categories", contact_id)
}

/// Returns the path for one contact-category association.
pub fn contact_category_path(contact_id: i64, category_id: i64) -> String {
    format!(
        "/contact_categories/contacts/{}/categories/{}",
        contact_id, category_id
    )
}

/// Returns the path listing the contacts in a category.
pub fn category_contacts_path(category_id: i64) -> String {
    format!("/contact_categories/categories/{}/contacts", category_id)
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for login.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Request body for registration.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Token grant returned by login and registration.
#[derive(Debug, Deserialize)]
pub struct TokenGrantResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

/// Response from the refresh exchange.
///
/// The backend also echoes the user record here, but the session layer
/// deliberately reconstructs the profile from persisted storage instead
/// (see the refresh coordinator). Only the access token is consumed.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Envelope for responses carrying a user record.
#[derive(Debug, Deserialize)]
pub struct UserEnvelope {
    pub user: UserProfile,
}

/// Envelope for responses carrying a single contact.
#[derive(Debug, Deserialize)]
pub struct ContactEnvelope {
    pub contact: Contact,
}

/// Envelope for responses carrying a contact list.
#[derive(Debug, Deserialize)]
pub struct ContactListEnvelope {
    pub contacts: Vec<Contact>,
}

/// Envelope for the favorites listing.
#[derive(Debug, Deserialize)]
pub struct FavoritesEnvelope {
    pub favorites: Vec<Contact>,
}

/// Request body for bulk contact deletion.
#[derive(Debug, Serialize)]
pub struct BulkDeleteRequest<'a> {
    pub contact_ids: &'a [i64],
}

/// Response from bulk contact deletion.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteResponse {
    pub deleted_count: u64,
}

/// Request body for creating or renaming a category.
#[derive(Debug, Serialize)]
pub struct CategoryRequest<'a> {
    pub name: &'a str,
}

/// Request body for contact-category association changes.
#[derive(Debug, Serialize)]
pub struct CategoryIdsRequest<'a> {
    pub category_ids: &'a [i64],
}

/// Envelope for responses carrying a single category.
#[derive(Debug, Deserialize)]
pub struct CategoryEnvelope {
    pub category: Category,
}

/// Envelope for responses carrying a category list.
#[derive(Debug, Deserialize)]
pub struct CategoryListEnvelope {
    pub categories: Vec<Category>,
}

/// Backend error response format.
#[derive(Debug, Deserialize)]
pub struct BackendErrorResponse {
    pub error: Option<String>,
    pub message: Option<String>,
}
