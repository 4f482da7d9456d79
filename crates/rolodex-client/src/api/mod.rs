//! High-level backend operations, grouped by concern.

mod auth;
mod categories;
mod contacts;
