//! The credential store seam used by authentication.
//!
//! Authentication code depends on [`CredentialStore`] rather than on
//! [`UserRepo`] directly, so login and registration can be exercised against
//! any backing store. [`PgCredentialStore`] is the production implementation.
//!
//! All failures are reported as [`CoreError`]: a duplicate username becomes
//! [`CoreError::Conflict`] straight from the database constraint, and a missing
//! user becomes [`CoreError::NotFound`].

use std::future::Future;

use messagely_core::error::{CoreError, CoreResult};

use crate::models::user::{CreateUser, User, UserSummary};
use crate::repositories::user_repo::{UserRepo, USERNAME_CONSTRAINT};
use crate::{is_unique_violation, DbPool};

/// Persistence operations needed to register and authenticate users.
pub trait CredentialStore: Send + Sync {
    /// Insert a new credential. Fails with `Conflict` on a duplicate username.
    fn register(&self, input: &CreateUser) -> impl Future<Output = CoreResult<User>> + Send;

    /// Fetch a credential. Fails with `NotFound` if absent.
    fn find_by_username(&self, username: &str) -> impl Future<Output = CoreResult<User>> + Send;

    /// Stamp the last-login time. Fails with `NotFound` if absent.
    fn update_last_login(&self, username: &str) -> impl Future<Output = CoreResult<()>> + Send;

    /// Every user, ordered by username ascending.
    fn list_all(&self) -> impl Future<Output = CoreResult<Vec<UserSummary>>> + Send;
}

/// [`CredentialStore`] backed by the `users` table.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: DbPool,
}

impl PgCredentialStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CredentialStore for PgCredentialStore {
    async fn register(&self, input: &CreateUser) -> CoreResult<User> {
        UserRepo::create(&self.pool, input).await.map_err(|err| {
            if is_unique_violation(&err, USERNAME_CONSTRAINT) {
                CoreError::Conflict(format!("Username '{}' is already taken", input.username))
            } else {
                internal(err)
            }
        })
    }

    async fn find_by_username(&self, username: &str) -> CoreResult<User> {
        UserRepo::find_by_username(&self.pool, username)
            .await
            .map_err(internal)?
            .ok_or_else(|| CoreError::not_found("User", username))
    }

    async fn update_last_login(&self, username: &str) -> CoreResult<()> {
        let updated = UserRepo::record_login(&self.pool, username)
            .await
            .map_err(internal)?;
        if !updated {
            return Err(CoreError::not_found("User", username));
        }
        Ok(())
    }

    async fn list_all(&self) -> CoreResult<Vec<UserSummary>> {
        UserRepo::list(&self.pool).await.map_err(internal)
    }
}

fn internal(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Credential store error");
    CoreError::Internal(err.to_string())
}
