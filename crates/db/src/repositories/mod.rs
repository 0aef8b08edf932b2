//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod message_repo;
pub mod user_repo;

pub use message_repo::MessageRepo;
pub use user_repo::UserRepo;
