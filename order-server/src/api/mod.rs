//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查 (公共)
//! - [`auth`] - 注册/登录 (公共)、登出 (需认证)
//! - [`orders`] - 订单接口 (需认证)
//! - [`extract`] - 请求体/查询参数提取器 (解析失败返回 ApiResponse)

pub mod auth;
pub mod extract;
pub mod health;
pub mod orders;

use axum::Router;
use axum::middleware;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

/// 注册全部路由 (无中间件, 无状态)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        // Auth API - login/signup public, logout authenticated
        .merge(auth::router())
        // Orders API - authentication required
        .merge(orders::router())
}

/// 构建完整应用: 路由 + 认证中间件 + 状态 + 请求追踪
///
/// HTTP 服务器和集成测试 (oneshot) 共用
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // JWT 认证中间件 - require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
}
