//! JWT 认证中间件（访问守卫）
//! 校验请求令牌并解析出调用者身份，是所有受保护路由的前置条件

use crate::{auth::jwt::JwtService, error::AppError};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

impl AuthContext {
    /// 管理员角色检查
    /// 身份已确立但权限不足时返回 Forbidden（403，区别于 401）
    pub fn require_admin(&self) -> Result<(), AppError> {
        if !self.is_admin {
            tracing::warn!(
                username = %self.username,
                "Admin permission denied"
            );
            return Err(AppError::Forbidden);
        }
        Ok(())
    }
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// 从 Authorization 头提取令牌
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| {
            if s.starts_with("Bearer ") {
                Some(s[7..].to_string())
            } else {
                None
            }
        })
        .ok_or(AppError::Unauthorized)
}

/// JWT 认证中间件 - 必须认证
/// 令牌校验失败的具体原因（过期/签名/格式）统一折叠为 Unauthorized，
/// 不向调用方泄露失败类别
pub async fn jwt_auth_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 从 Authorization 头提取令牌
    let token = extract_token(req.headers())?;

    // 校验令牌
    let claims = jwt_service
        .verify_token(&token)
        .map_err(|_| AppError::Unauthorized)?;

    // subject 缺失或为空视为无效令牌
    if claims.sub.is_empty() {
        return Err(AppError::Unauthorized);
    }

    // 创建认证上下文
    let user_id = Uuid::parse_str(&claims.uid).map_err(|_| AppError::Unauthorized)?;
    let auth_context = AuthContext {
        user_id,
        username: claims.sub,
        is_admin: claims.is_admin,
    };

    // 附加到请求扩展
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
