//! Repository for the `users` table.

use sqlx::PgPool;

use crate::models::user::{CreateUser, User, UserProfile, UserSummary};

/// Column list for the full credential row.
const COLUMNS: &str = "id, username, password_hash, first_name, last_name, phone, \
                        join_at, last_login_at";

/// Column list for profile reads (never includes the password hash).
const PROFILE_COLUMNS: &str = "username, first_name, last_name, phone, join_at, last_login_at";

/// Name of the uniqueness constraint on `users.username`.
pub const USERNAME_CONSTRAINT: &str = "uq_users_username";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// `join_at` and `last_login_at` are both stamped with the insert time.
    /// A duplicate username fails with a unique violation on
    /// [`USERNAME_CONSTRAINT`].
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, password_hash, first_name, last_name, phone,
                                join_at, last_login_at)
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone)
            .fetch_one(pool)
            .await
    }

    /// Find a user's credential row by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the public profile of a user.
    pub async fn find_profile(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Whether a user with this username exists.
    pub async fn exists(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// List every user ordered by username.
    pub async fn list(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            "SELECT username, first_name, last_name FROM users ORDER BY username",
        )
        .fetch_all(pool)
        .await
    }

    /// Set `last_login_at` to now.
    ///
    /// Returns `true` if the row was updated.
    pub async fn record_login(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE username = $1")
            .bind(username)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
