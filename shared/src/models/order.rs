//! Delivery Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle status
///
/// Only `Pending -> Cancelled` is driven by this service. Any other status is
/// set by external systems and is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Cancelled => "Cancelled",
            Self::Other(s) => s.as_str(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Pending" => Self::Pending,
            "Cancelled" => Self::Cancelled,
            _ => Self::Other(value),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted delivery order
///
/// Derived commercial fields (`delivery_fee`, `delivery_charge`, `cod_fee`,
/// `total_fee`, `order_amount`, `cod_amount`) are computed once at creation
/// and never recomputed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    // === Identity ===
    pub consignment_id: String,
    pub merchant_order_id: String,
    pub user_id: i64,
    pub store_id: i64,
    pub created_at: DateTime<Utc>,

    // === Recipient ===
    pub recipient_name: String,
    pub recipient_phone: String,
    pub recipient_address: String,
    pub recipient_city: i64,
    pub recipient_zone: i64,
    pub recipient_area: i64,

    // === Item ===
    pub delivery_type: i64,
    pub item_type: i64,
    pub item_quantity: i64,
    pub item_weight: f64,
    pub amount_to_collect: f64,
    pub description: String,
    pub instruction: String,

    // === Derived pricing ===
    pub delivery_fee: f64,
    pub delivery_charge: f64,
    pub cod_fee: f64,
    pub total_fee: f64,
    pub order_amount: f64,
    pub cod_amount: f64,
    pub promo_discount: f64,
    pub discount: f64,

    // === Store metadata ===
    pub order_type: String,
    pub order_type_id: i64,
    pub store_name: String,
    pub store_contact_phone: String,

    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub status: OrderStatus,
}

/// Client-supplied order fields
///
/// Holds only what a merchant may set. Owner, identity, status and every
/// derived amount are filled in by the order engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOrder {
    #[serde(default)]
    pub store_id: i64,
    #[serde(default)]
    pub merchant_order_id: String,
    #[serde(default)]
    pub recipient_name: String,
    #[serde(default)]
    pub recipient_phone: String,
    #[serde(default)]
    pub recipient_address: String,
    #[serde(default)]
    pub recipient_city: i64,
    #[serde(default)]
    pub recipient_zone: i64,
    #[serde(default)]
    pub recipient_area: i64,
    #[serde(default)]
    pub delivery_type: i64,
    #[serde(default)]
    pub item_type: i64,
    #[serde(default)]
    pub special_instruction: String,
    #[serde(default)]
    pub item_quantity: i64,
    #[serde(default)]
    pub item_weight: f64,
    #[serde(default)]
    pub amount_to_collect: f64,
    #[serde(default)]
    pub item_description: String,
}

/// One page of an owner's orders plus the owner's total order count
///
/// This is also the payload stored in the listing cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: i64,
}

impl OrderPage {
    /// Number of pages for the given page size (`ceil(total / limit)`)
    pub fn last_page(&self, limit: i64) -> i64 {
        if limit <= 0 || self.total <= 0 {
            return 0;
        }
        self.total / limit + i64::from(self.total % limit != 0)
    }
}
