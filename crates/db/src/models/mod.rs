//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` structs matching the shapes the queries select
//! - A `Deserialize` create DTO for inserts

pub mod message;
pub mod user;
