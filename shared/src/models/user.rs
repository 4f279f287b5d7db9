//! User Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored user record
///
/// `hashed_password` is an Argon2 PHC string, never the plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
}
