//! Login and registration flows.
//!
//! [`Authenticator`] ties the credential store, the password hasher and the
//! token issuer together. It is generic over [`CredentialStore`] so the flows
//! can run against the Postgres store in production and an in-memory store in
//! tests.

use messagely_core::error::{CoreError, CoreResult};
use messagely_db::models::user::CreateUser;
use messagely_db::store::CredentialStore;

use crate::auth::jwt::{self, JwtConfig};
use crate::auth::password::{self, HashConfig};

/// Message for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// The single error produced by a failed login.
///
/// Unknown usernames and wrong passwords both end here so neither the error
/// kind nor the message reveals which usernames are registered.
pub fn invalid_credentials() -> CoreError {
    CoreError::Unauthorized(INVALID_CREDENTIALS.into())
}

/// Fields required to register a new user.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Orchestrates credential checks and token issuance.
pub struct Authenticator<'a, S> {
    store: S,
    hashing: &'a HashConfig,
    jwt: &'a JwtConfig,
}

impl<'a, S: CredentialStore> Authenticator<'a, S> {
    pub fn new(store: S, hashing: &'a HashConfig, jwt: &'a JwtConfig) -> Self {
        Self {
            store,
            hashing,
            jwt,
        }
    }

    /// Verify `username`/`password` and return a fresh token.
    ///
    /// `last_login_at` is updated only after the password has been verified.
    pub async fn login(&self, username: &str, password: &str) -> CoreResult<String> {
        let stored_hash = match self.store.find_by_username(username).await {
            Ok(user) => Some(user.password_hash),
            Err(CoreError::NotFound { .. }) => None,
            Err(err) => return Err(err),
        };

        // Unknown users are checked against a decoy so both paths cost one
        // verification.
        let known_user = stored_hash.is_some();
        let hash = match stored_hash {
            Some(hash) => hash,
            None => password::decoy_hash(self.hashing).await?.to_string(),
        };
        let verified = password::verify_in_background(password.to_string(), hash).await?;

        if !(known_user && verified) {
            tracing::info!(username, "Login rejected");
            return Err(invalid_credentials());
        }

        self.store.update_last_login(username).await?;

        let token = jwt::issue_token(username, self.jwt)
            .map_err(|e| CoreError::Internal(format!("Token generation error: {e}")))?;

        tracing::info!(username, "Login succeeded");
        Ok(token)
    }

    /// Register a new user and log them straight in.
    ///
    /// A duplicate username fails with [`CoreError::Conflict`] and no token is
    /// issued.
    pub async fn register_and_issue(&self, input: RegisterUser) -> CoreResult<String> {
        let password_hash =
            password::hash_in_background(input.password.clone(), *self.hashing).await?;

        let user = self
            .store
            .register(&CreateUser {
                username: input.username,
                password_hash,
                first_name: input.first_name,
                last_name: input.last_name,
                phone: input.phone,
            })
            .await?;
        tracing::info!(username = %user.username, "User registered");

        self.login(&user.username, &input.password).await
    }
}
