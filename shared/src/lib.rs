//! Shared types for the order service
//!
//! Common types used across crates: the unified error system, domain models
//! and the request/response DTOs of the HTTP facade.

pub mod client;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
