use thiserror::Error;

use crate::auth::JwtError;
use crate::cache::CacheError;

/// 启动和运行期错误
///
/// 请求级错误统一使用 [`shared::error::AppError`]，这里只覆盖进程启动、
/// 后端连接和监听失败。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("数据库迁移失败: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("缓存错误: {0}")]
    Cache(#[from] CacheError),

    #[error("JWT 配置错误: {0}")]
    Jwt(#[from] JwtError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
