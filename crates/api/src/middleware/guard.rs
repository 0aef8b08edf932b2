//! Resource-ownership extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose verified
//! identity does not satisfy the resource rule. Token verification always
//! runs first, so an anonymous caller never learns anything about the
//! resource.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use messagely_core::access;
use serde::Deserialize;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::extract::PathParam;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct UsernamePath {
    username: String,
}

/// Requires the caller to be the user named by the `{username}` path segment.
/// Rejects with 401 Unauthorized otherwise.
///
/// ```ignore
/// async fn own_profile(RequireSelf(user): RequireSelf) -> AppResult<Json<()>> {
///     // user.username is guaranteed to equal the path parameter here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireSelf(pub AuthUser);

impl FromRequestParts<AppState> for RequireSelf {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let PathParam(path) = PathParam::<UsernamePath>::from_request_parts(parts, state).await?;

        access::self_only(&user.username, &path.username).ensure()?;
        Ok(RequireSelf(user))
    }
}
