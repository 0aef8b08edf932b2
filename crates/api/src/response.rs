//! Response envelopes for API handlers.
//!
//! Each resource is wrapped in a key naming what it is (`{ "user": ... }`,
//! `{ "messages": [...] }`). Use these instead of ad-hoc `serde_json::json!`
//! to get compile-time type safety and consistent serialization.

use serde::Serialize;

/// `{ "token": ... }` returned by login and registration.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `{ "users": [...] }`
#[derive(Debug, Serialize)]
pub struct UsersResponse<T: Serialize> {
    pub users: Vec<T>,
}

/// `{ "user": ... }`
#[derive(Debug, Serialize)]
pub struct UserResponse<T: Serialize> {
    pub user: T,
}

/// `{ "message": ... }`
#[derive(Debug, Serialize)]
pub struct MessageResponse<T: Serialize> {
    pub message: T,
}

/// `{ "messages": [...] }`
#[derive(Debug, Serialize)]
pub struct MessagesResponse<T: Serialize> {
    pub messages: Vec<T>,
}
