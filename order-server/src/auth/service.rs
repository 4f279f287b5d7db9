//! 注册 / 登录 / 登出

use std::sync::Arc;

use shared::error::{AppError, AppResult};
use shared::models::User;

use super::jwt::{CurrentUser, IssuedToken, JwtService};
use super::password::{hash_password, verify_dummy, verify_password};
use crate::db::OrderRepository;

/// 认证服务
#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn OrderRepository>,
    jwt: Arc<JwtService>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("jwt", &self.jwt)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(repo: Arc<dyn OrderRepository>, jwt: Arc<JwtService>) -> Self {
        Self { repo, jwt }
    }

    /// 注册
    ///
    /// 用户名冲突返回 `UsernameExists`, 不会覆盖已有凭据。
    pub async fn signup(&self, username: &str, password: &str) -> AppResult<User> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::required("username and password are required"));
        }

        let hashed = hash_password(password)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;

        let user = self.repo.create_user(username, &hashed).await?;
        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// 登录
    ///
    /// 用户不存在和密码错误返回同一个 `InvalidCredentials`。
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(User, IssuedToken)> {
        let user = self.repo.find_user_by_username(username).await?;

        let user = match user {
            Some(u) if verify_password(password, &u.hashed_password) => u,
            Some(_) => {
                tracing::warn!(username = %username, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }
            None => {
                // 与密码错误路径保持相同的 Argon2 耗时
                verify_dummy(password);
                tracing::warn!(username = %username, "Login failed - user not found");
                return Err(AppError::invalid_credentials());
            }
        };

        let issued = self
            .jwt
            .issue(&user.username, user.id)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

        tracing::info!(user_id = user.id, username = %user.username, "User logged in");
        Ok((user, issued))
    }

    /// 登出: 吊销当前令牌, 重复调用无副作用
    pub fn logout(&self, user: &CurrentUser) {
        self.jwt.revoke(&user.token_id, user.token_expires_at);
        tracing::info!(user_id = user.id, username = %user.username, "User logged out");
    }

    /// 启动时写入初始账号 (已存在则跳过)
    pub async fn ensure_user(&self, username: &str, password: &str) -> AppResult<()> {
        if self.repo.find_user_by_username(username).await?.is_some() {
            tracing::debug!(username = %username, "Seed user already exists");
            return Ok(());
        }

        match self.signup(username, password).await {
            Ok(_) => Ok(()),
            // 并发启动时可能已被其他实例写入
            Err(e) if e.code == shared::error::ErrorCode::UsernameExists => Ok(()),
            Err(e) => Err(e),
        }
    }
}
