//! Handlers for the `/users` resource.
//!
//! The directory listing is open to any logged-in user; everything under
//! `/users/{username}` is restricted to that user by [`RequireSelf`].

use axum::extract::State;
use axum::Json;
use messagely_core::error::CoreError;
use messagely_db::models::message::{InboxEntry, OutboxEntry};
use messagely_db::models::user::{UserProfile, UserSummary};
use messagely_db::repositories::{MessageRepo, UserRepo};
use messagely_db::store::CredentialStore;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::guard::RequireSelf;
use crate::response::{MessagesResponse, UserResponse, UsersResponse};
use crate::state::AppState;

/// GET /users
pub async fn list_users(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<UsersResponse<UserSummary>>> {
    let users = state.credentials().list_all().await?;
    Ok(Json(UsersResponse { users }))
}

/// GET /users/{username}
///
/// Full profile, including phone and login timestamps.
pub async fn get_user(
    RequireSelf(user): RequireSelf,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse<UserProfile>>> {
    let profile = UserRepo::find_profile(&state.pool, &user.username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &user.username))?;

    Ok(Json(UserResponse { user: profile }))
}

/// GET /users/{username}/to
///
/// Messages received by the user, oldest first.
pub async fn messages_to(
    RequireSelf(user): RequireSelf,
    State(state): State<AppState>,
) -> AppResult<Json<MessagesResponse<InboxEntry>>> {
    let messages = MessageRepo::list_to(&state.pool, &user.username).await?;
    Ok(Json(MessagesResponse { messages }))
}

/// GET /users/{username}/from
///
/// Messages sent by the user, oldest first.
pub async fn messages_from(
    RequireSelf(user): RequireSelf,
    State(state): State<AppState>,
) -> AppResult<Json<MessagesResponse<OutboxEntry>>> {
    let messages = MessageRepo::list_from(&state.pool, &user.username).await?;
    Ok(Json(MessagesResponse { messages }))
}
