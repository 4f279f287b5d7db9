//! Argon2 密码哈希

use std::sync::LazyLock;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// 生成带随机盐的 Argon2 PHC 字符串
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// 校验密码, 哈希格式无法解析时视为不匹配
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// 未知用户登录时用于校验的占位哈希, 使两条失败路径耗时一致
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash_password("order-server-dummy-password").unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to prepare dummy password hash");
        String::new()
    })
});

/// 对占位哈希执行一次完整校验, 结果丢弃
pub fn verify_dummy(password: &str) {
    let _ = verify_password(password, &DUMMY_HASH);
}
