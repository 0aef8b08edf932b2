//! Message entity model and DTOs.

use messagely_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::user::UserContact;

/// Response shape for a freshly sent message (no `read_at` yet).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SentMessage {
    pub id: DbId,
    pub from_username: String,
    pub to_username: String,
    pub body: String,
    pub sent_at: Timestamp,
}

/// Result of marking a message as read.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReadReceipt {
    pub id: DbId,
    pub read_at: Timestamp,
}

/// A message with both participants expanded.
#[derive(Debug, Clone, Serialize)]
pub struct MessageDetail {
    pub id: DbId,
    pub body: String,
    pub sent_at: Timestamp,
    pub read_at: Option<Timestamp>,
    pub from_user: UserContact,
    pub to_user: UserContact,
}

impl MessageDetail {
    pub fn from_username(&self) -> &str {
        &self.from_user.username
    }

    pub fn to_username(&self) -> &str {
        &self.to_user.username
    }
}

/// Flat join row backing [`MessageDetail`]; sender columns are prefixed
/// `from_`, recipient columns `to_`.
#[derive(Debug, FromRow)]
pub(crate) struct MessageDetailRow {
    pub id: DbId,
    pub body: String,
    pub sent_at: Timestamp,
    pub read_at: Option<Timestamp>,
    pub from_username: String,
    pub from_first_name: String,
    pub from_last_name: String,
    pub from_phone: String,
    pub to_username: String,
    pub to_first_name: String,
    pub to_last_name: String,
    pub to_phone: String,
}

impl From<MessageDetailRow> for MessageDetail {
    fn from(row: MessageDetailRow) -> Self {
        MessageDetail {
            id: row.id,
            body: row.body,
            sent_at: row.sent_at,
            read_at: row.read_at,
            from_user: UserContact {
                username: row.from_username,
                first_name: row.from_first_name,
                last_name: row.from_last_name,
                phone: row.from_phone,
            },
            to_user: UserContact {
                username: row.to_username,
                first_name: row.to_first_name,
                last_name: row.to_last_name,
                phone: row.to_phone,
            },
        }
    }
}

/// A message received by a user, with the sender expanded.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InboxEntry {
    pub id: DbId,
    pub body: String,
    pub sent_at: Timestamp,
    pub read_at: Option<Timestamp>,
    #[sqlx(flatten)]
    pub from_user: UserContact,
}

/// A message sent by a user, with the recipient expanded.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OutboxEntry {
    pub id: DbId,
    pub body: String,
    pub sent_at: Timestamp,
    pub read_at: Option<Timestamp>,
    #[sqlx(flatten)]
    pub to_user: UserContact,
}

/// DTO for creating a new message.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMessage {
    pub from_username: String,
    pub to_username: String,
    pub body: String,
}
