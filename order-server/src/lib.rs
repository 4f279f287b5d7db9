//! Order Server - 配送订单管理服务
//!
//! # 架构概述
//!
//! - **认证** (`auth`): JWT 令牌签发/验证、吊销集合、认证中间件
//! - **订单** (`orders`): 订单生命周期引擎 (校验、计费、cache-aside 列表、取消)
//! - **存储** (`db`): PostgreSQL / 内存仓库
//! - **缓存** (`cache`): Redis / 进程内缓存
//! - **HTTP API** (`api`): JSON 接口
//!
//! # 模块结构
//!
//! ```text
//! order-server/src/
//! ├── core/          # 配置、状态、服务器、错误
//! ├── auth/          # JWT、吊销、中间件、注册登录
//! ├── orders/        # 订单引擎
//! ├── cache/         # 缓存适配器
//! ├── db/            # 存储适配器
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志
//! ```

pub mod api;
pub mod auth;
pub mod cache;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::{AuthService, CurrentUser, JwtService};
pub use cache::{CacheError, OrderCache};
pub use core::{Config, Server, ServerError, ServerState};
pub use db::{OrderRepository, StoreError};
pub use orders::OrderService;

// Re-export unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
