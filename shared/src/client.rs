//! Client-facing request/response types
//!
//! Wire DTOs of the HTTP facade. Every payload travels inside
//! [`crate::error::ApiResponse`].

use serde::{Deserialize, Serialize};

use crate::models::{NewOrder, Order};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Signup request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Always `"Bearer"`
    pub token_type: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
    pub access_token: String,
    pub user_id: i64,
    pub username: String,
}

// =============================================================================
// Order API DTOs
// =============================================================================

/// Create order request body
pub type CreateOrderRequest = NewOrder;

/// Create order response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreated {
    pub consignment_id: String,
    pub merchant_order_id: String,
    pub order_status: String,
    pub delivery_fee: f64,
}

/// `GET /api/orders` query string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOrdersQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

/// Paginated order listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListData {
    pub orders: Vec<Order>,
    pub total: i64,
    pub current_page: i64,
    pub per_page: i64,
    pub total_in_page: i64,
    pub last_page: i64,
}

// =============================================================================
// Health
// =============================================================================

/// Backend reachability report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
    pub cache: String,
}
