//! Data models
//!
//! Shared between order-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All numeric IDs are `i64` (Postgres BIGINT).

pub mod order;
pub mod user;

// Re-exports
pub use order::*;
pub use user::*;
