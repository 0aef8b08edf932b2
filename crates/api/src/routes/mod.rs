pub mod auth;
pub mod health;
pub mod messages;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                         service status (public)
///
/// /auth/register                  register (public)
/// /auth/login                     login (public)
///
/// /users                          directory (any authenticated user)
/// /users/{username}               profile (that user only)
/// /users/{username}/to            received messages (that user only)
/// /users/{username}/from          sent messages (that user only)
///
/// /messages                       send (any authenticated user, POST)
/// /messages/{id}                  detail (sender or recipient)
/// /messages/{id}/read             mark read (recipient only, POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/messages", messages::router())
}
