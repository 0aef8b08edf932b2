//! Stateless session tokens.
//!
//! Tokens are HS256-signed JWTs containing a [`Claims`] payload. Nothing is
//! stored server-side: a token is trusted if and only if its signature verifies
//! under the process-wide secret (and, when expiry is enabled, it has not
//! expired). [`verify_token`] is the only place a client-supplied username is
//! turned into a trusted identity.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use messagely_core::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject -- the username the token was issued to.
    pub sub: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp), absent when expiry is disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Configuration for token issuance and verification.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in minutes. `None` issues tokens that never expire.
    pub expiry_mins: Option<i64>,
}

/// Default token lifetime in minutes (24 hours).
const DEFAULT_EXPIRY_MINS: i64 = 24 * 60;
/// Longest accepted token lifetime in minutes (one year).
pub const MAX_EXPIRY_MINS: i64 = 365 * 24 * 60;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var           | Required | Default |
    /// |-------------------|----------|---------|
    /// | `JWT_SECRET`      | **yes**  | --      |
    /// | `JWT_EXPIRY_MINS` | no       | `1440`  |
    ///
    /// `JWT_EXPIRY_MINS=0` disables expiry.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty, or if the expiry is not
    /// a non-negative integer.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let expiry_mins = parse_expiry_mins(std::env::var("JWT_EXPIRY_MINS").ok().as_deref())
            .unwrap_or_else(|e| panic!("{e}"));

        Self {
            secret,
            expiry_mins,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        match self.expiry_mins {
            Some(_) => validation.set_required_spec_claims(&["exp"]),
            None => {
                validation.required_spec_claims.clear();
                validation.validate_exp = false;
            }
        }
        validation
    }
}

/// Interpret a raw `JWT_EXPIRY_MINS` value.
///
/// Unset means the default lifetime; `0` means no expiry. Anything above
/// [`MAX_EXPIRY_MINS`] is rejected.
pub fn parse_expiry_mins(raw: Option<&str>) -> Result<Option<i64>, String> {
    let Some(raw) = raw else {
        return Ok(Some(DEFAULT_EXPIRY_MINS));
    };
    match raw.trim().parse::<i64>() {
        Ok(0) => Ok(None),
        Ok(mins) if (1..=MAX_EXPIRY_MINS).contains(&mins) => Ok(Some(mins)),
        _ => Err(format!(
            "JWT_EXPIRY_MINS must be an integer between 0 and {MAX_EXPIRY_MINS}, got '{raw}'"
        )),
    }
}

/// Issue a signed token for `username`.
pub fn issue_token(
    username: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: username.to_string(),
        iat: now,
        exp: config
            .expiry_mins
            .map(|mins| now.saturating_add(mins.saturating_mul(60))),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate a token and return its claims.
///
/// Any failure (bad signature, malformed token, expired) is reported as
/// [`CoreError::Unauthorized`].
pub fn verify_token(token: &str, config: &JwtConfig) -> CoreResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &config.validation(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "Token rejected");
        CoreError::Unauthorized("Invalid or expired token".into())
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    /// Helper to build a test config with a known secret.
    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_mins: Some(15),
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    #[test]
    fn test_issue_and_verify() {
        let config = test_config();
        let token = issue_token("alice", &config).expect("token generation should succeed");

        let claims = verify_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp, Some(claims.iat + 15 * 60));
    }

    #[test]
    fn test_token_carries_only_identity_claims() {
        let token = issue_token("alice", &test_config()).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        let payload =
            decode::<serde_json::Value>(&token, &DecodingKey::from_secret(&[]), &validation)
                .expect("payload should decode")
                .claims;

        let mut keys: Vec<_> = payload.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["exp", "iat", "sub"]);
    }

    #[test]
    fn test_corrupted_signature_fails() {
        let config = test_config();
        let token = issue_token("alice", &config).unwrap();

        let (head, signature) = token.rsplit_once('.').unwrap();
        let mut sig: Vec<char> = signature.chars().collect();
        sig[5] = if sig[5] == 'A' { 'B' } else { 'A' };
        let tampered = format!("{head}.{}", sig.into_iter().collect::<String>());

        let err = verify_token(&tampered, &config).unwrap_err();
        assert_matches!(err, CoreError::Unauthorized(_));
    }

    #[test]
    fn test_tampered_subject_fails() {
        let config = test_config();
        let alice = issue_token("alice", &config).unwrap();
        let mallory = sign(
            &Claims {
                sub: "bob".into(),
                iat: 0,
                exp: Some(i64::MAX / 2),
            },
            "some-other-secret",
        );

        // Bob's payload with Alice's signature.
        let parts: Vec<&str> = mallory.split('.').collect();
        let alice_sig = alice.rsplit('.').next().unwrap();
        let forged = format!("{}.{}.{}", parts[0], parts[1], alice_sig);

        assert!(verify_token(&forged, &config).is_err());
    }

    #[test]
    fn test_malformed_token_fails() {
        let config = test_config();
        for garbage in ["", "not-a-jwt", "a.b.c", "...."] {
            assert_matches!(
                verify_token(garbage, &config),
                Err(CoreError::Unauthorized(_)),
                "{garbage:?} must be rejected"
            );
        }
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Use a margin well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let token = sign(
            &Claims {
                sub: "alice".into(),
                iat: now - 600,
                exp: Some(now - 300),
            },
            &config.secret,
        );

        assert!(verify_token(&token, &config).is_err(), "expired token must fail");
    }

    #[test]
    fn test_missing_exp_fails_when_expiry_enabled() {
        let config = test_config();
        let token = sign(
            &Claims {
                sub: "alice".into(),
                iat: 0,
                exp: None,
            },
            &config.secret,
        );

        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn test_no_expiry_config() {
        let config = JwtConfig {
            expiry_mins: None,
            ..test_config()
        };
        let token = issue_token("alice", &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = JwtConfig {
            secret: "secret-alpha".to_string(),
            expiry_mins: Some(15),
        };
        let config_b = JwtConfig {
            secret: "secret-bravo".to_string(),
            expiry_mins: Some(15),
        };

        let token = issue_token("alice", &config_a).unwrap();

        assert!(
            verify_token(&token, &config_b).is_err(),
            "token signed with a different secret must fail"
        );
    }

    #[test]
    fn test_parse_expiry_mins() {
        assert_eq!(parse_expiry_mins(None), Ok(Some(DEFAULT_EXPIRY_MINS)));
        assert_eq!(parse_expiry_mins(Some("30")), Ok(Some(30)));
        assert_eq!(parse_expiry_mins(Some("0")), Ok(None));
        assert!(parse_expiry_mins(Some("-5")).is_err());
        assert!(parse_expiry_mins(Some("soon")).is_err());
        assert_eq!(parse_expiry_mins(Some("525600")), Ok(Some(MAX_EXPIRY_MINS)));
    }

    #[test]
    fn test_oversized_expiry_is_rejected() {
        let err = parse_expiry_mins(Some("9223372036854775807")).unwrap_err();
        assert!(err.contains("between 0 and"), "unexpected message: {err}");
        assert!(parse_expiry_mins(Some("525601")).is_err());
    }

    #[test]
    fn test_huge_expiry_does_not_overflow() {
        let config = JwtConfig {
            expiry_mins: Some(i64::MAX),
            ..test_config()
        };

        let token = issue_token("alice", &config).expect("issuing must not overflow");
        let claims = verify_token(&token, &config).expect("token must not be born expired");
        assert_eq!(claims.exp, Some(i64::MAX));
    }
}
