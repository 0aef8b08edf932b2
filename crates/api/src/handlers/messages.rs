//! Handlers for the `/messages` resource.
//!
//! Unlike `/users/{username}`, the owner of a message is only known after it
//! has been loaded, so the participant checks run inside the handlers. A
//! message that does not exist is rejected exactly like one the caller is not
//! part of.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use messagely_core::access;
use messagely_core::error::CoreError;
use messagely_core::types::DbId;
use messagely_db::models::message::{CreateMessage, MessageDetail, ReadReceipt, SentMessage};
use messagely_db::repositories::{MessageRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, PathParam};
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Request body for `POST /messages`. The sender is always the caller.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[validate(length(min = 1, message = "to_username must not be empty"))]
    pub to_username: String,
    #[validate(length(min = 1, max = 5000, message = "body must be 1-5000 characters"))]
    pub body: String,
}

/// GET /messages/{id}
///
/// Only the sender or the recipient may read a message.
pub async fn get_message(
    user: AuthUser,
    State(state): State<AppState>,
    PathParam(id): PathParam<DbId>,
) -> AppResult<Json<MessageResponse<MessageDetail>>> {
    let message = MessageRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(access::denied)?;

    access::participant(&user.username, message.from_username(), message.to_username())
        .ensure()?;

    Ok(Json(MessageResponse { message }))
}

/// POST /messages
///
/// Send a message from the caller. The recipient must already exist.
pub async fn create_message(
    user: AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateMessageRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse<SentMessage>>)> {
    input.validate()?;

    if !UserRepo::exists(&state.pool, &input.to_username).await? {
        return Err(AppError::BadRequest(format!(
            "Recipient '{}' does not exist",
            input.to_username
        )));
    }

    let message = MessageRepo::create(
        &state.pool,
        &CreateMessage {
            from_username: user.username,
            to_username: input.to_username,
            body: input.body,
        },
    )
    .await?;
    tracing::info!(
        message_id = message.id,
        from = %message.from_username,
        to = %message.to_username,
        "Message sent",
    );

    Ok((StatusCode::CREATED, Json(MessageResponse { message })))
}

/// POST /messages/{id}/read
///
/// Only the recipient may mark a message as read.
pub async fn mark_read(
    user: AuthUser,
    State(state): State<AppState>,
    PathParam(id): PathParam<DbId>,
) -> AppResult<Json<MessageResponse<ReadReceipt>>> {
    let recipient = MessageRepo::find_recipient(&state.pool, id)
        .await?
        .ok_or_else(access::denied)?;

    access::recipient_only(&user.username, &recipient).ensure()?;

    let receipt = MessageRepo::mark_read(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Message", id))?;

    Ok(Json(MessageResponse { message: receipt }))
}
