//! 存储层
//!
//! [`OrderRepository`] 是订单引擎和认证流程依赖的唯一存储接口:
//! - [`PgOrderRepository`] - PostgreSQL (sqlx)
//! - [`MemoryOrderRepository`] - 进程内实现 (测试 / 无数据库开发模式)

pub mod memory;
pub mod postgres;

pub use memory::MemoryOrderRepository;
pub use postgres::PgOrderRepository;

use async_trait::async_trait;
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderPage, User};
use thiserror::Error;

/// 存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateUsername,

    #[error("consignment id already exists")]
    DuplicateConsignment,

    /// 订单不存在、不属于该用户或状态不是 Pending
    #[error("no matching pending order")]
    NoMatchingPendingOrder,

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => AppError::new(ErrorCode::UsernameExists),
            StoreError::DuplicateConsignment => AppError::new(ErrorCode::ConsignmentConflict),
            StoreError::NoMatchingPendingOrder => AppError::new(ErrorCode::OrderNotFound),
            StoreError::Database(detail) => {
                tracing::error!(error = %detail, "Storage operation failed");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

/// 用户和订单的持久化接口
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 按用户名查找用户
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// 创建用户, 用户名冲突返回 [`StoreError::DuplicateUsername`]
    async fn create_user(&self, username: &str, hashed_password: &str)
    -> Result<User, StoreError>;

    /// 写入订单, consignment id 冲突返回 [`StoreError::DuplicateConsignment`]
    async fn create_order(&self, order: &Order) -> Result<(), StoreError>;

    /// 按创建时间倒序分页查询, 同时返回该用户的订单总数
    ///
    /// `limit` 和 `page` 由调用方规范化 (均 >= 1)
    async fn list_orders(&self, user_id: i64, limit: i64, page: i64)
    -> Result<OrderPage, StoreError>;

    /// 条件更新: 仅当订单属于该用户且状态为 Pending 时置为 Cancelled
    async fn cancel_order(&self, consignment_id: &str, user_id: i64) -> Result<(), StoreError>;

    /// 连通性检查
    async fn ping(&self) -> Result<(), StoreError>;
}

impl std::fmt::Debug for dyn OrderRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn OrderRepository")
    }
}

/// 分页偏移量, 超出 i64 范围时饱和到 `i64::MAX` (结果为空页)
pub(crate) fn page_offset(limit: i64, page: i64) -> i64 {
    page.saturating_sub(1).max(0).saturating_mul(limit.max(0))
}
