//! 令牌吊销集合
//!
//! 以 jti 为键记录已登出的令牌。条目只需保留到令牌自身过期，
//! 之后由后台任务调用 [`RevocationStore::prune`] 清理。

use dashmap::DashMap;

/// 吊销集合抽象
///
/// 单实例部署使用 [`MemoryRevocationStore`]; 多实例部署可替换为外部存储。
pub trait RevocationStore: Send + Sync {
    /// 记录吊销, 重复调用无副作用
    fn revoke(&self, token_id: &str, expires_at: i64);

    /// jti 是否已吊销
    fn is_revoked(&self, token_id: &str) -> bool;

    /// 移除 `expires_at <= now` 的条目, 返回移除数量
    fn prune(&self, now: i64) -> usize;

    /// 当前条目数
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 进程内吊销集合 (DashMap: jti -> 过期时间戳)
#[derive(Debug, Default)]
pub struct MemoryRevocationStore {
    entries: DashMap<String, i64>,
}

impl MemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RevocationStore for MemoryRevocationStore {
    fn revoke(&self, token_id: &str, expires_at: i64) {
        self.entries
            .entry(token_id.to_string())
            .and_modify(|exp| *exp = (*exp).max(expires_at))
            .or_insert(expires_at);
    }

    fn is_revoked(&self, token_id: &str) -> bool {
        self.entries.contains_key(token_id)
    }

    fn prune(&self, now: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| *expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_is_idempotent() {
        let store = MemoryRevocationStore::new();
        store.revoke("a", 100);
        store.revoke("a", 100);
        assert!(store.is_revoked("a"));
        assert!(!store.is_revoked("b"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_prune_drops_only_expired_entries() {
        let store = MemoryRevocationStore::new();
        store.revoke("old", 100);
        store.revoke("edge", 200);
        store.revoke("live", 300);

        assert_eq!(store.prune(200), 2);
        assert!(!store.is_revoked("old"));
        assert!(!store.is_revoked("edge"));
        assert!(store.is_revoked("live"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_revocation() {
        let store = std::sync::Arc::new(MemoryRevocationStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for j in 0..100 {
                        store.revoke(&format!("{}-{}", i, j % 50), 1_000);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len(), 8 * 50);
    }
}
