//! Domain types shared by the database and HTTP layers.
//!
//! - [`error`] -- the [`error::CoreError`] taxonomy every layer converges on.
//! - [`types`] -- primitive aliases for ids and timestamps.
//! - [`access`] -- resource-level authorization predicates.

pub mod access;
pub mod error;
pub mod types;
