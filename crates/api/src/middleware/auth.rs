//! Session-token authentication extractor for Axum handlers.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use messagely_core::error::CoreError;
use serde::Deserialize;

use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::state::AppState;

/// Query-string fallback for clients that cannot set headers.
#[derive(Debug, Deserialize)]
struct TokenQuery {
    #[serde(rename = "_token")]
    token: Option<String>,
}

/// Authenticated user recovered from the request's session token.
///
/// The token is read from `Authorization: Bearer <token>`, or from the
/// `_token` query parameter when no `Authorization` header is sent. Use this
/// as an extractor parameter in any handler that requires a logged-in caller:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(username = %user.username, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The verified username (from `claims.sub`).
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;
        let claims = verify_token(&token, &state.config.jwt)?;

        Ok(AuthUser {
            username: claims.sub,
        })
    }
}

fn extract_token(parts: &Parts) -> Result<String, AppError> {
    if let Some(header) = parts.headers.get("authorization") {
        let header = header.to_str().map_err(|_| invalid_format())?;
        return header
            .strip_prefix("Bearer ")
            .map(str::to_string)
            .ok_or_else(invalid_format);
    }

    Query::<TokenQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(query)| query.token)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing authentication token".into(),
            ))
        })
}

fn invalid_format() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid Authorization format. Expected: Bearer <token>".into(),
    ))
}
