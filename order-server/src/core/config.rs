use crate::auth::JwtConfig;
use crate::core::ServerError;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | ENVIRONMENT | development | 运行环境 |
/// | HTTP_PORT | 50051 | HTTP 服务端口 |
/// | DATABASE_URL | - | PostgreSQL 连接串 (非开发环境必填) |
/// | REDIS_URL | - | Redis 地址, 未设置时使用进程内缓存 |
/// | CACHE_TTL_SECS | 300 | 订单列表缓存 TTL (秒) |
/// | JWT_SECRET | - | JWT 密钥, 至少 32 字符 (非开发环境必填) |
/// | JWT_EXPIRATION_MINUTES | 1440 | 令牌有效期 (分钟) |
/// | JWT_ISSUER | order-server | 令牌签发者 |
/// | JWT_AUDIENCE | order-clients | 令牌受众 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | - | 日志目录 (按天滚动) |
/// | SEED_USERNAME / SEED_PASSWORD | - | 启动时创建的初始账号 |
/// | REVOCATION_SWEEP_SECS | 300 | 吊销集合清理间隔 (秒) |
///
/// # 示例
///
/// ```ignore
/// DATABASE_URL=postgres://localhost/orders HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 运行环境: development | staging | production
    pub environment: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// PostgreSQL 连接串, 开发环境可为空 (内存仓库)
    pub database_url: Option<String>,
    /// Redis 连接串, 为空时使用进程内缓存
    pub redis_url: Option<String>,
    /// 订单列表缓存 TTL (秒)
    pub cache_ttl_secs: u64,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 日志级别
    pub log_level: String,
    /// 日志目录
    pub log_dir: Option<String>,
    /// 启动时创建的初始账号
    pub seed_user: Option<SeedUser>,
    /// 吊销集合/进程内缓存清理间隔 (秒)
    pub revocation_sweep_secs: u64,
}

/// 启动时写入的初始账号
#[derive(Clone)]
pub struct SeedUser {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SeedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedUser")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 非开发环境缺少 `DATABASE_URL` 或 `JWT_SECRET` 时返回错误
    pub fn from_env() -> Result<Self, ServerError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let database_url = non_empty_var("DATABASE_URL");
        if database_url.is_none() && environment != "development" {
            return Err(ServerError::Config(format!(
                "DATABASE_URL must be set in {environment} environment"
            )));
        }

        let seed_user = match (non_empty_var("SEED_USERNAME"), non_empty_var("SEED_PASSWORD")) {
            (Some(username), Some(password)) => Some(SeedUser { username, password }),
            _ => None,
        };

        Ok(Self {
            http_port: parse_var("HTTP_PORT", 50051),
            database_url,
            redis_url: non_empty_var("REDIS_URL"),
            cache_ttl_secs: parse_var("CACHE_TTL_SECS", 300),
            jwt: JwtConfig::from_env(&environment)?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: non_empty_var("LOG_DIR"),
            seed_user,
            revocation_sweep_secs: parse_var("REVOCATION_SWEEP_SECS", 300),
            environment,
        })
    }

    /// 测试/嵌入用配置: 内存后端、固定密钥
    pub fn for_tests(jwt: JwtConfig) -> Self {
        Self {
            environment: "development".into(),
            http_port: 0,
            database_url: None,
            redis_url: None,
            cache_ttl_secs: 300,
            jwt,
            log_level: "info".into(),
            log_dir: None,
            seed_user: None,
            revocation_sweep_secs: 300,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
