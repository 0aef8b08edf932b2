//! Route definitions for the `/messages` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::messages;
use crate::state::AppState;

/// Routes mounted at `/messages`.
///
/// ```text
/// POST /            -> create_message
/// GET  /{id}        -> get_message
/// POST /{id}/read   -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(messages::create_message))
        .route("/{id}", get(messages::get_message))
        .route("/{id}/read", post(messages::mark_read))
}
