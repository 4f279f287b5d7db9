//! Authentication Handlers

use axum::extract::State;
use shared::client::{LoginRequest, LoginResponse, SignupRequest};

use crate::api::extract::ApiJson;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::{ApiResponse, AppResult};

/// Signup handler
pub async fn signup(
    State(state): State<ServerState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .auth_service
        .signup(&req.username, &req.password)
        .await?;
    Ok(ApiResponse::ok_with_message("User registered successfully"))
}

/// Login handler
///
/// Authenticates user credentials and returns a bearer token
pub async fn login(
    State(state): State<ServerState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let (user, issued) = state
        .auth_service
        .login(&req.username, &req.password)
        .await?;

    Ok(ApiResponse::success(LoginResponse {
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
        access_token: issued.token,
        user_id: user.id,
        username: user.username,
    }))
}

/// Logout handler - revokes the token used for this request
pub async fn logout(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<()>> {
    state.auth_service.logout(&user);
    Ok(ApiResponse::ok_with_message("Logged out successfully"))
}
