//! Product catalog domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Product category (self-referencing lookup table)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductCategory {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product model (lookup table)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductModel {
    pub id: Uuid,
    pub name: String,
    pub catalog_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub product_number: String,
    pub color: Option<String>,
    pub standard_cost: Option<f64>,
    pub list_price: f64,
    pub size: Option<String>,
    pub weight: Option<f64>,
    pub category_id: Option<Uuid>,
    pub model_id: Option<Uuid>,
    pub sell_start_date: DateTime<Utc>,
    pub sell_end_date: Option<DateTime<Utc>>,
    pub discontinued_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
}

/// Create product request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub product_number: String,
    #[validate(length(max = 32))]
    pub color: Option<String>,
    #[validate(range(min = 0.0))]
    pub standard_cost: Option<f64>,
    #[validate(range(min = 0.0))]
    pub list_price: f64,
    #[validate(length(max = 16))]
    pub size: Option<String>,
    #[validate(range(min = 0.0))]
    pub weight: Option<f64>,
    pub category_id: Option<Uuid>,
    pub model_id: Option<Uuid>,
    pub sell_start_date: Option<DateTime<Utc>>,
    pub sell_end_date: Option<DateTime<Utc>>,
}

/// Update product request (partial update, all fields optional)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub product_number: Option<String>,
    #[validate(length(max = 32))]
    pub color: Option<String>,
    #[validate(range(min = 0.0))]
    pub standard_cost: Option<f64>,
    #[validate(range(min = 0.0))]
    pub list_price: Option<f64>,
    #[validate(length(max = 16))]
    pub size: Option<String>,
    #[validate(range(min = 0.0))]
    pub weight: Option<f64>,
    pub category_id: Option<Uuid>,
    pub model_id: Option<Uuid>,
    pub sell_start_date: Option<DateTime<Utc>>,
    pub sell_end_date: Option<DateTime<Utc>>,
    pub discontinued_date: Option<DateTime<Utc>>,
}

/// Product list filters (query string)
#[derive(Debug, Deserialize)]
pub struct ProductListFilters {
    pub category_id: Option<Uuid>,
    pub color: Option<String>,
    pub search: Option<String>, // 在 name/product_number 中搜索
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
