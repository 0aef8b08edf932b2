//! User entity model and DTOs.

use messagely_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserProfile`] or [`UserSummary`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub join_at: Timestamp,
    pub last_login_at: Option<Timestamp>,
}

/// Full profile shown to the user themself.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub join_at: Timestamp,
    pub last_login_at: Option<Timestamp>,
}

/// Directory entry visible to any logged-in user. Omits contact details.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct UserSummary {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Counterpart details embedded in message views.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct UserContact {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// DTO for creating a new user. The password must already be hashed.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}
