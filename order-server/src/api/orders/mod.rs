//! Order Routes

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Build orders router (authentication required)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders", get(handler::list).post(handler::create))
        .route("/api/orders/{consignment_id}/cancel", post(handler::cancel))
}
