//! Handlers for the `/auth` resource (register, login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::auth::authenticator::RegisterUser;
use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::response::TokenResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "username must be 1-50 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 128, message = "password must be 1-128 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "first_name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "last_name must be 1-100 characters"))]
    pub last_name: String,
    #[validate(length(min = 1, max = 30, message = "phone must be 1-30 characters"))]
    pub phone: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/register
///
/// Create an account and return a session token for it. A taken username
/// yields 409 Conflict.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    input.validate()?;

    let token = state
        .authenticator()
        .register_and_issue(RegisterUser {
            username: input.username,
            password: input.password,
            first_name: input.first_name,
            last_name: input.last_name,
            phone: input.phone,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// POST /auth/login
///
/// Exchange username + password for a session token.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .authenticator()
        .login(&input.username, &input.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}
