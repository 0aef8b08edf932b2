//! Argon2id password hashing and verification.
//!
//! All password hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`]. The PHC string format is used for storage so
//! that algorithm parameters and salt are embedded in the hash itself, which
//! lets verification keep working after the work factor is retuned.
//!
//! Hashing is CPU-bound; async callers should go through
//! [`hash_in_background`] / [`verify_in_background`] so request handling is
//! never stalled on the runtime's worker threads.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use messagely_core::error::{CoreError, CoreResult};
use tokio::sync::OnceCell;

/// Smallest accepted work factor (8 KiB, the Argon2 floor for one lane).
pub const MIN_WORK_FACTOR: u32 = 3;
/// Largest accepted work factor (4 GiB).
pub const MAX_WORK_FACTOR: u32 = 22;
/// Default work factor (32 MiB).
pub const DEFAULT_WORK_FACTOR: u32 = 15;

/// Argon2 passes over memory.
const TIME_COST: u32 = 2;
/// Argon2 lanes.
const PARALLELISM: u32 = 1;

/// Tunable cost of password hashing.
///
/// The memory cost is `2^work_factor` KiB, so each step up doubles the work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashConfig {
    pub work_factor: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            work_factor: DEFAULT_WORK_FACTOR,
        }
    }
}

impl HashConfig {
    /// Build a config, rejecting factors outside
    /// [`MIN_WORK_FACTOR`]..=[`MAX_WORK_FACTOR`].
    pub fn new(work_factor: u32) -> Result<Self, String> {
        if !(MIN_WORK_FACTOR..=MAX_WORK_FACTOR).contains(&work_factor) {
            return Err(format!(
                "Password work factor must be between {MIN_WORK_FACTOR} and {MAX_WORK_FACTOR}, got {work_factor}"
            ));
        }
        Ok(Self { work_factor })
    }

    /// Load the work factor from `PASSWORD_WORK_FACTOR` (default: `15`).
    ///
    /// # Panics
    ///
    /// Panics if the variable is set but is not a valid factor.
    pub fn from_env() -> Self {
        let work_factor: u32 = std::env::var("PASSWORD_WORK_FACTOR")
            .unwrap_or_else(|_| DEFAULT_WORK_FACTOR.to_string())
            .parse()
            .expect("PASSWORD_WORK_FACTOR must be a valid u32");

        Self::new(work_factor).unwrap_or_else(|e| panic!("{e}"))
    }

    fn hasher(&self) -> Result<Argon2<'static>, argon2::password_hash::Error> {
        let params = Params::new(1 << self.work_factor, TIME_COST, PARALLELISM, None)?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
pub fn hash_password(
    password: &str,
    config: &HashConfig,
) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = config.hasher()?.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// The digest comparison is constant-time. A stored value that does not parse
/// as a PHC string simply fails verification.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// [`hash_password`] on the blocking thread pool.
pub async fn hash_in_background(password: String, config: HashConfig) -> CoreResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password, &config))
        .await
        .map_err(|e| CoreError::Internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| CoreError::Internal(format!("Password hashing error: {e}")))
}

/// [`verify_password`] on the blocking thread pool.
pub async fn verify_in_background(password: String, hash: String) -> CoreResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| CoreError::Internal(format!("Password verification task failed: {e}")))
}

/// Plaintext behind every decoy hash.
const DECOY_PASSWORD: &str = "decoy-password";

/// A lazily computed throwaway hash, used to spend verification time on
/// unknown usernames.
///
/// The hash is computed on the blocking pool the first time it is requested
/// and reused afterwards.
pub struct DecoyHash {
    cell: OnceCell<String>,
}

impl DecoyHash {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }

    /// The cached hash, computing it with `config` on first use.
    pub async fn get(&self, config: &HashConfig) -> CoreResult<&str> {
        let config = *config;
        self.cell
            .get_or_try_init(|| hash_in_background(DECOY_PASSWORD.to_string(), config))
            .await
            .map(String::as_str)
    }
}

impl Default for DecoyHash {
    fn default() -> Self {
        Self::new()
    }
}

static DECOY: DecoyHash = DecoyHash::new();

/// The process-wide decoy hash. Computed once with the first config it is
/// asked for; `main` warms it before the server starts accepting logins.
pub async fn decoy_hash(config: &HashConfig) -> CoreResult<&'static str> {
    DECOY.get(config).await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    /// Cheap parameters so the suite stays fast.
    fn test_config() -> HashConfig {
        HashConfig::new(MIN_WORK_FACTOR + 1).expect("factor is in range")
    }

    #[test]
    fn test_hash_and_verify() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password, &test_config()).expect("hashing should succeed");

        // The hash must be a valid PHC string starting with the argon2id identifier.
        assert!(
            hash.starts_with("$argon2id$"),
            "expected argon2id PHC prefix"
        );
        assert!(!hash.contains(password), "hash must not embed the password");
        assert!(verify_password(password, &hash), "correct password should verify");
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("real-password", &test_config()).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let config = test_config();
        let first = hash_password("pw1", &config).expect("hashing should succeed");
        let second = hash_password("pw1", &config).expect("hashing should succeed");

        assert_ne!(first, second, "salts must differ between calls");
        assert!(verify_password("pw1", &first));
        assert!(verify_password("pw1", &second));
    }

    #[test]
    fn test_work_factor_is_encoded_in_hash() {
        let hash = hash_password("pw", &HashConfig::new(5).unwrap()).unwrap();
        assert!(hash.contains("m=32,"), "memory cost should be 2^5 KiB: {hash}");

        // Hashes made under an older factor still verify.
        assert!(verify_password("pw", &hash));
    }

    #[test]
    fn test_malformed_hash_returns_false() {
        assert!(!verify_password("pw", "not-a-hash"));
        assert!(!verify_password("pw", ""));
        assert!(!verify_password("pw", "$argon2id$v=19$garbage"));
    }

    #[test]
    fn test_work_factor_bounds() {
        assert!(HashConfig::new(MIN_WORK_FACTOR - 1).is_err());
        assert!(HashConfig::new(MAX_WORK_FACTOR + 1).is_err());
        assert!(HashConfig::new(MIN_WORK_FACTOR).is_ok());
        assert!(HashConfig::new(MAX_WORK_FACTOR).is_ok());

        let msg = HashConfig::new(40).unwrap_err();
        assert!(msg.contains("between 3 and 22"), "unexpected message: {msg}");
    }

    #[tokio::test]
    async fn test_background_round_trip() {
        let hash = hash_in_background("pw2".into(), test_config())
            .await
            .expect("hashing should succeed");

        assert!(verify_in_background("pw2".into(), hash.clone()).await.unwrap());
        assert!(!verify_in_background("nope".into(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_decoy_hash_does_not_stall_the_runtime() {
        let decoy = DecoyHash::new();
        let config = test_config();
        let other_task_ran = AtomicBool::new(false);

        // Single-threaded runtime: the second future can only run while the
        // first one is parked on the blocking pool.
        let (hash, ()) = tokio::join!(
            async {
                let hash = decoy.get(&config).await.expect("decoy should hash");
                assert!(
                    other_task_ran.load(Ordering::SeqCst),
                    "decoy hashing must yield to other tasks"
                );
                hash.to_string()
            },
            async { other_task_ran.store(true, Ordering::SeqCst) },
        );

        assert!(verify_password(DECOY_PASSWORD, &hash));
        assert_eq!(decoy.get(&config).await.unwrap(), hash, "decoy is cached");
    }
}
