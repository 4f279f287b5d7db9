//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 存储和缓存连通性 | 无 |
//!
//! 缓存不可用只会让状态变为 `degraded` (code = CacheError);
//! 存储不可用返回 503 (code = DatabaseError)。

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use shared::client::HealthStatus;

use crate::{ApiResponse, ErrorCode};
use crate::core::ServerState;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<ServerState>) -> (StatusCode, Json<ApiResponse<HealthStatus>>) {
    let database = match state.repo.ping().await {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            tracing::error!(error = %e, "Health check: store unreachable");
            "error".to_string()
        }
    };
    let cache = match state.cache.ping().await {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check: cache unreachable");
            "error".to_string()
        }
    };

    // 存储不可用 -> 503 DatabaseError; 仅缓存不可用 -> 200 CacheError (降级)
    let (http_status, code, status) = match (database.as_str(), cache.as_str()) {
        ("ok", "ok") => (StatusCode::OK, ErrorCode::Success, "ok"),
        ("ok", _) => (StatusCode::OK, ErrorCode::CacheError, "degraded"),
        _ => (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::DatabaseError,
            "error",
        ),
    };

    let report = ApiResponse {
        code: Some(code.code()),
        message: status.to_string(),
        data: Some(HealthStatus {
            status: status.to_string(),
            database,
            cache,
        }),
        details: None,
    };

    (http_status, Json(report))
}
