//! 产品目录的 HTTP 处理器
//! 读操作要求认证，写操作要求管理员角色

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::product::*,
    repository::ProductRepository,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 列出产品
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Query(filters): Query<ProductListFilters>,
) -> Result<impl IntoResponse, AppError> {
    tracing::debug!(username = %auth_context.username, "Listing products");

    let repo = ProductRepository::new(state.db.clone());
    let products = repo.list(&filters).await?;

    Ok(Json(json!({
        "products": products,
        "count": products.len()
    })))
}

/// 获取产品详情
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.find_by_id(&id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(product))
}

/// 创建产品（仅管理员）
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_admin()?;

    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo.create(&req, auth_context.user_id).await?;

    tracing::info!(
        username = %auth_context.username,
        product_id = %product.id,
        "Product created"
    );

    Ok((StatusCode::CREATED, Json(product)))
}

/// 更新产品（仅管理员）
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_admin()?;

    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo.update(id, &req).await?.ok_or(AppError::NotFound)?;

    tracing::info!(
        username = %auth_context.username,
        product_id = %id,
        "Product updated"
    );

    Ok(Json(product))
}

/// 删除产品（仅管理员）
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    auth_context.require_admin()?;

    let repo = ProductRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(
        username = %auth_context.username,
        product_id = %id,
        "Product deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// 列出产品分类
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let repo = ProductRepository::new(state.db.clone());
    let categories = repo.list_categories().await?;

    Ok(Json(json!({ "categories": categories })))
}

/// 列出产品型号
pub async fn list_models(
    State(state): State<Arc<AppState>>,
    _auth_context: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let repo = ProductRepository::new(state.db.clone());
    let models = repo.list_models().await?;

    Ok(Json(json!({ "models": models })))
}
