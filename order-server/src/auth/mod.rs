//! 认证模块
//!
//! - [`JwtService`] - 令牌签发/验证/吊销
//! - [`RevocationStore`] - 吊销集合
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件
//! - [`AuthService`] - 注册/登录/登出

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod revocation;
pub mod service;

pub use jwt::{Claims, CurrentUser, IssuedToken, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
pub use revocation::{MemoryRevocationStore, RevocationStore};
pub use service::AuthService;
