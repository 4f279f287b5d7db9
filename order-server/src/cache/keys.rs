//! 缓存键
//!
//! - 列表页: `orders:user:<id>:page:<page>:limit:<limit>`
//! - 用户前缀: `orders:user:<id>:` (结尾的分隔符保证用户 1 的失效不会命中用户 12)

/// 单个列表页的键
pub fn list_key(user_id: i64, page: i64, limit: i64) -> String {
    format!("orders:user:{user_id}:page:{page}:limit:{limit}")
}

/// 某用户全部列表页的公共前缀
pub fn owner_prefix(user_id: i64) -> String {
    format!("orders:user:{user_id}:")
}
