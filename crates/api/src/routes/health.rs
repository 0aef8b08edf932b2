//! `GET /health`: database reachability plus the session settings clients
//! need to know about (whether tokens expire, and after how long).

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::auth::jwt::JwtConfig;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    pub auth: SessionSettings,
}

/// Public view of the token configuration. Never includes the secret.
#[derive(Debug, Serialize)]
pub struct SessionSettings {
    pub tokens_expire: bool,
    pub token_expiry_mins: Option<i64>,
}

impl From<&JwtConfig> for SessionSettings {
    fn from(config: &JwtConfig) -> Self {
        SessionSettings {
            tokens_expire: config.expiry_mins.is_some(),
            token_expiry_mins: config.expiry_mins,
        }
    }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match messagely_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Database unreachable during health check");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        auth: SessionSettings::from(&state.config.jwt),
    })
}
