//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing with a tunable work factor.
//! - [`jwt`] -- stateless session-token issuance and verification.
//! - [`authenticator`] -- the login and registration flows built on both.

pub mod authenticator;
pub mod jwt;
pub mod password;
