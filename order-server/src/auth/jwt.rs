//! JWT 令牌服务
//!
//! 处理令牌的签发、验证和吊销。验证顺序固定为: 签名 -> 过期 -> 吊销集合。

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::revocation::{MemoryRevocationStore, RevocationStore};

/// JWT 密钥最小长度
pub const MIN_SECRET_LEN: usize = 32;

/// JWT 配置
#[derive(Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("expiration_minutes", &self.expiration_minutes)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

impl JwtConfig {
    /// 从环境变量加载
    ///
    /// 开发环境未设置 `JWT_SECRET` 时生成临时密钥，其他环境必须显式设置。
    pub fn from_env(environment: &str) -> Result<Self, JwtError> {
        let secret = load_jwt_secret(environment)?;

        Ok(Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "order-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "order-clients".to_string()),
        })
    }

    /// 指定密钥的配置, 其余字段取默认值
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes: 1440,
            issuer: "order-server".to_string(),
            audience: "order-clients".to_string(),
        }
    }

    /// 令牌有效期 (秒), 登录响应的 `expires_in` 使用同一值
    pub fn expiration_seconds(&self) -> i64 {
        self.expiration_minutes * 60
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 用户名
    pub username: String,
    /// 令牌 ID, 吊销集合以此为键
    pub jti: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌已吊销")]
    RevokedToken,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("密钥生成失败: {0}")]
    KeyGenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 签发结果
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// 编码后的令牌
    pub token: String,
    /// jti
    pub token_id: String,
    /// 过期时间戳 (秒)
    pub expires_at: i64,
    /// 剩余有效期 (秒)
    pub expires_in: i64,
}

/// 生成可打印的安全 JWT 密钥 (用于开发环境)
pub fn generate_secure_printable_jwt_secret() -> Result<String, JwtError> {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    rng.fill(&mut bytes).map_err(|_| {
        JwtError::KeyGenerationFailed("Failed to generate secure random key".to_string())
    })?;

    Ok(bytes
        .iter()
        .map(|b| ALLOWED[(*b as usize) % ALLOWED.len()] as char)
        .collect())
}

/// 从环境变量安全地加载 JWT 密钥
fn load_jwt_secret(environment: &str) -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < MIN_SECRET_LEN {
                return Err(JwtError::ConfigError(format!(
                    "JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"
                )));
            }
            Ok(secret)
        }
        Err(_) if environment == "development" => {
            tracing::warn!(
                "⚠️  JWT_SECRET not set! Generating secure temporary key for development."
            );
            generate_secure_printable_jwt_secret()
        }
        Err(_) => Err(JwtError::ConfigError(format!(
            "JWT_SECRET environment variable must be set in {environment} environment"
        ))),
    }
}

/// JWT 令牌服务
///
/// 持有吊销集合的共享引用, 可被多个请求并发使用。
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    revocations: Arc<dyn RevocationStore>,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .field("revoked", &self.revocations.len())
            .finish()
    }
}

impl JwtService {
    /// 使用内存吊销集合创建服务
    pub fn with_config(config: JwtConfig) -> Self {
        Self::with_revocation_store(config, Arc::new(MemoryRevocationStore::new()))
    }

    /// 使用指定吊销集合创建服务
    pub fn with_revocation_store(config: JwtConfig, revocations: Arc<dyn RevocationStore>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
            revocations,
        }
    }

    /// 吊销集合
    pub fn revocations(&self) -> &Arc<dyn RevocationStore> {
        &self.revocations
    }

    /// 为用户签发新令牌
    pub fn issue(&self, username: &str, user_id: i64) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);
        let token_id = uuid::Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            jti: token_id.clone(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))?;

        Ok(IssuedToken {
            token,
            token_id,
            expires_at: claims.exp,
            expires_in: self.config.expiration_seconds(),
        })
    }

    /// 验证并解码令牌
    ///
    /// 签名失败直接返回, 不会查询吊销集合。
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.decode(token)?;

        if self.revocations.is_revoked(&claims.jti) {
            return Err(JwtError::RevokedToken);
        }

        Ok(claims)
    }

    /// 吊销指定 jti, 幂等
    ///
    /// 条目保留到 `expires_at`, 此后令牌本身已无法通过验证。
    pub fn revoke(&self, token_id: &str, expires_at: i64) {
        self.revocations.revoke(token_id, expires_at);
    }

    fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);
        // 吊销条目在 exp 之后即被清理, 因此过期判定不能有宽限期
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建并注入请求扩展, 处理函数只从这里读取用户身份。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// 用户 ID
    pub id: i64,
    /// 用户名
    pub username: String,
    /// 当前令牌 jti (登出时吊销)
    pub token_id: String,
    /// 当前令牌过期时间戳
    pub token_expires_at: i64,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse()
            .map_err(|_| JwtError::InvalidToken(format!("Malformed subject: {}", claims.sub)))?;

        Ok(Self {
            id,
            username: claims.username,
            token_id: claims.jti,
            token_expires_at: claims.exp,
        })
    }
}
