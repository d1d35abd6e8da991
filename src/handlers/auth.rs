//! 认证相关的 HTTP 处理器

use crate::{auth::middleware::AuthContext, error::AppError, middleware::AppState, models::auth::*};
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

/// 登录
/// 失败时返回通用的 401，不区分用户名错误与密码错误
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth_service.login(req).await?;

    Ok(Json(response))
}

/// 获取当前用户信息
pub async fn get_current_user(auth_context: AuthContext) -> Result<impl IntoResponse, AppError> {
    Ok(Json(json!({
        "id": auth_context.user_id,
        "username": auth_context.username,
        "is_admin": auth_context.is_admin,
    })))
}
