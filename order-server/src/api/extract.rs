//! 请求体/查询参数提取器
//!
//! 包装 axum 的 `Json` / `Query`, 把解析失败转换为 [`AppError`],
//! 保证错误响应同样是 `ApiResponse` 信封。
//!
//! | 失败 | 错误码 |
//! |------|--------|
//! | 字段类型不匹配 (JSON 数据错误 / 查询参数) | ValidationFailed |
//! | JSON 语法错误、缺少 Content-Type、读取请求体失败 | InvalidRequest |

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::AppError;

/// JSON 请求体
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

/// URL 查询参数
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(query_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    let message = rejection.body_text();
    tracing::debug!(error = %message, "Rejected request body");
    match rejection {
        JsonRejection::JsonDataError(_) => AppError::validation(message),
        _ => AppError::invalid_request(message),
    }
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    let message = rejection.body_text();
    tracing::debug!(error = %message, "Rejected query string");
    AppError::validation(message)
}
