use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthService, JwtService, MemoryRevocationStore, RevocationStore};
use crate::cache::{MemoryCache, OrderCache, RedisCache};
use crate::core::{Config, Result};
use crate::db::{MemoryOrderRepository, OrderRepository, PgOrderRepository};
use crate::orders::OrderService;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，作为 axum 路由状态传给每个处理函数。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | repo | 用户/订单仓库 |
/// | cache | 订单列表缓存 |
/// | memory_cache | 进程内缓存句柄 (仅在未配置 Redis 时存在, 用于定期清理) |
/// | jwt_service | JWT 令牌服务 |
/// | auth_service | 注册/登录/登出 |
/// | order_service | 订单引擎 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub repo: Arc<dyn OrderRepository>,
    pub cache: Arc<dyn OrderCache>,
    pub memory_cache: Option<Arc<MemoryCache>>,
    pub jwt_service: Arc<JwtService>,
    pub auth_service: AuthService,
    pub order_service: OrderService,
}

impl ServerState {
    /// 使用给定后端组装状态
    pub fn new(
        config: Config,
        repo: Arc<dyn OrderRepository>,
        cache: Arc<dyn OrderCache>,
        revocations: Arc<dyn RevocationStore>,
    ) -> Self {
        let jwt_service = Arc::new(JwtService::with_revocation_store(
            config.jwt.clone(),
            revocations,
        ));
        let auth_service = AuthService::new(repo.clone(), jwt_service.clone());
        let order_service = OrderService::new(
            repo.clone(),
            cache.clone(),
            Duration::from_secs(config.cache_ttl_secs),
        );

        Self {
            config,
            repo,
            cache,
            memory_cache: None,
            jwt_service,
            auth_service,
            order_service,
        }
    }

    /// 全内存后端 (测试 / 无数据库开发模式)
    pub fn in_memory(config: Config) -> Self {
        let memory_cache = Arc::new(MemoryCache::new());
        let mut state = Self::new(
            config,
            Arc::new(MemoryOrderRepository::new()),
            memory_cache.clone(),
            Arc::new(MemoryRevocationStore::new()),
        );
        state.memory_cache = Some(memory_cache);
        state
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 仓库 (DATABASE_URL -> PostgreSQL + 迁移, 否则内存仓库)
    /// 2. 缓存 (REDIS_URL -> Redis, 否则进程内缓存)
    /// 3. 令牌服务、认证服务、订单引擎
    /// 4. 初始账号
    pub async fn initialize(config: &Config) -> Result<Self> {
        let repo: Arc<dyn OrderRepository> = match &config.database_url {
            Some(url) => {
                let repo = PgOrderRepository::connect(url).await?;
                tracing::info!("Connected to PostgreSQL");
                Arc::new(repo)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store (data is not persisted)");
                Arc::new(MemoryOrderRepository::new())
            }
        };

        let (cache, memory_cache): (Arc<dyn OrderCache>, Option<Arc<MemoryCache>>) =
            match &config.redis_url {
                Some(url) => {
                    let cache = RedisCache::connect(url).await?;
                    cache.ping().await?;
                    tracing::info!("Connected to Redis");
                    let cache: Arc<dyn OrderCache> = Arc::new(cache);
                    (cache, None)
                }
                None => {
                    tracing::warn!("REDIS_URL not set, using in-process cache");
                    let memory = Arc::new(MemoryCache::new());
                    let cache: Arc<dyn OrderCache> = memory.clone();
                    (cache, Some(memory))
                }
            };

        let mut state = Self::new(
            config.clone(),
            repo,
            cache,
            Arc::new(MemoryRevocationStore::new()),
        );
        state.memory_cache = memory_cache;

        if let Some(seed) = &config.seed_user {
            state
                .auth_service
                .ensure_user(&seed.username, &seed.password)
                .await
                .map_err(|e| crate::core::ServerError::Internal(format!("Seed user: {}", e)))?;
            tracing::info!(username = %seed.username, "Seed user ready");
        }

        Ok(state)
    }

    /// 启动后台任务
    ///
    /// - 吊销集合清理 (移除已自然过期的令牌)
    /// - 进程内缓存过期清理
    pub fn start_background_tasks(&self) {
        let period = Duration::from_secs(self.config.revocation_sweep_secs.max(1));

        let jwt_service = self.jwt_service.clone();
        let memory_cache = self.memory_cache.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;

                let pruned = jwt_service.revocations().prune(shared::util::now_secs());
                if pruned > 0 {
                    tracing::debug!(pruned, "Pruned expired revocations");
                }

                if let Some(cache) = &memory_cache {
                    let swept = cache.sweep();
                    if swept > 0 {
                        tracing::debug!(swept, "Swept expired cache entries");
                    }
                }
            }
        });
    }
}
