use std::sync::Arc;

use messagely_db::store::PgCredentialStore;

use crate::auth::authenticator::Authenticator;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// Nothing in it is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: messagely_db::DbPool,
    /// Server configuration (signing secret, hashing cost, ...).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Credential store over this state's pool.
    pub fn credentials(&self) -> PgCredentialStore {
        PgCredentialStore::new(self.pool.clone())
    }

    /// Authenticator wired to the Postgres credential store.
    pub fn authenticator(&self) -> Authenticator<'_, PgCredentialStore> {
        Authenticator::new(self.credentials(), &self.config.hashing, &self.config.jwt)
    }
}
