//! Repository for the `messages` table.

use messagely_core::types::DbId;
use sqlx::PgPool;

use crate::models::message::{
    CreateMessage, InboxEntry, MessageDetail, MessageDetailRow, OutboxEntry, ReadReceipt,
    SentMessage,
};

/// Provides CRUD operations for messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a new message, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMessage) -> Result<SentMessage, sqlx::Error> {
        sqlx::query_as::<_, SentMessage>(
            "INSERT INTO messages (from_username, to_username, body, sent_at)
             VALUES ($1, $2, $3, NOW())
             RETURNING id, from_username, to_username, body, sent_at",
        )
        .bind(&input.from_username)
        .bind(&input.to_username)
        .bind(&input.body)
        .fetch_one(pool)
        .await
    }

    /// Find a message with both participants expanded.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<MessageDetail>, sqlx::Error> {
        let row = sqlx::query_as::<_, MessageDetailRow>(
            "SELECT m.id, m.body, m.sent_at, m.read_at,
                    f.username AS from_username, f.first_name AS from_first_name,
                    f.last_name AS from_last_name, f.phone AS from_phone,
                    t.username AS to_username, t.first_name AS to_first_name,
                    t.last_name AS to_last_name, t.phone AS to_phone
             FROM messages AS m
                  JOIN users AS f ON m.from_username = f.username
                  JOIN users AS t ON m.to_username = t.username
             WHERE m.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(MessageDetail::from))
    }

    /// Look up only the recipient of a message.
    pub async fn find_recipient(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT to_username FROM messages WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|(to_username,)| to_username))
    }

    /// Stamp `read_at` with the current time.
    ///
    /// Returns `None` if no message with the given `id` exists.
    pub async fn mark_read(pool: &PgPool, id: DbId) -> Result<Option<ReadReceipt>, sqlx::Error> {
        sqlx::query_as::<_, ReadReceipt>(
            "UPDATE messages SET read_at = NOW()
             WHERE id = $1
             RETURNING id, read_at",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Messages sent to `username`, oldest first.
    pub async fn list_to(pool: &PgPool, username: &str) -> Result<Vec<InboxEntry>, sqlx::Error> {
        sqlx::query_as::<_, InboxEntry>(
            "SELECT m.id, m.body, m.sent_at, m.read_at,
                    f.username, f.first_name, f.last_name, f.phone
             FROM messages AS m
                  JOIN users AS f ON m.from_username = f.username
             WHERE m.to_username = $1
             ORDER BY m.id",
        )
        .bind(username)
        .fetch_all(pool)
        .await
    }

    /// Messages sent by `username`, oldest first.
    pub async fn list_from(pool: &PgPool, username: &str) -> Result<Vec<OutboxEntry>, sqlx::Error> {
        sqlx::query_as::<_, OutboxEntry>(
            "SELECT m.id, m.body, m.sent_at, m.read_at,
                    t.username, t.first_name, t.last_name, t.phone
             FROM messages AS m
                  JOIN users AS t ON m.to_username = t.username
             WHERE m.from_username = $1
             ORDER BY m.id",
        )
        .bind(username)
        .fetch_all(pool)
        .await
    }
}
