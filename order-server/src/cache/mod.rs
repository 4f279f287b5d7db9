//! 订单列表缓存
//!
//! ```text
//! OrderCache (trait)
//!   ├── RedisCache   <- ConnectionManager, SCAN + DEL 前缀删除
//!   └── MemoryCache  <- DashMap, 惰性过期 + 定期清理
//! ```
//!
//! 缓存是尽力而为的: 订单引擎捕获所有 [`CacheError`] 并记录日志,
//! 读失败等同未命中, 失效失败等同 no-op。

pub mod keys;
pub mod memory;
pub mod redis;

pub use memory::MemoryCache;
pub use self::redis::RedisCache;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// 缓存错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// 键 -> 字节 的缓存接口
#[async_trait]
pub trait OrderCache: Send + Sync {
    /// 读取, 未命中返回 `None`
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// 写入并设置 TTL
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    /// 删除所有以 `prefix` 开头的键, 返回删除数量
    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError>;

    /// 连通性检查
    async fn ping(&self) -> Result<(), CacheError>;
}

impl std::fmt::Debug for dyn OrderCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn OrderCache")
    }
}
