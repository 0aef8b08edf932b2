//! Access control extractors.
//!
//! - [`auth::AuthUser`] -- any authenticated user (verified session token).
//! - [`guard::RequireSelf`] -- the token's user must own the `{username}` path segment.

pub mod auth;
pub mod guard;
