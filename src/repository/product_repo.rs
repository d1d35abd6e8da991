//! Product repository (数据库访问层)

use crate::{error::AppError, models::product::*};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ProductRepository {
    db: PgPool,
}

impl ProductRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 按过滤条件列出产品
    pub async fn list(&self, filters: &ProductListFilters) -> Result<Vec<Product>, AppError> {
        let limit = filters.limit.unwrap_or(50).clamp(1, 200);
        let offset = filters.offset.unwrap_or(0).max(0);

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE ($1::uuid IS NULL OR category_id = $1)
              AND ($2::text IS NULL OR color = $2)
              AND ($3::text IS NULL
                   OR name ILIKE '%' || $3 || '%'
                   OR product_number ILIKE '%' || $3 || '%')
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filters.category_id)
        .bind(&filters.color)
        .bind(&filters.search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// 根据 ID 查找产品
    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(product)
    }

    /// 创建产品
    pub async fn create(
        &self,
        req: &CreateProductRequest,
        created_by: Uuid,
    ) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                name, product_number, color, standard_cost, list_price,
                size, weight, category_id, model_id,
                sell_start_date, sell_end_date, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, NOW()), $11, $12)
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.product_number)
        .bind(&req.color)
        .bind(req.standard_cost)
        .bind(req.list_price)
        .bind(&req.size)
        .bind(req.weight)
        .bind(req.category_id)
        .bind(req.model_id)
        .bind(req.sell_start_date)
        .bind(req.sell_end_date)
        .bind(created_by)
        .fetch_one(&self.db)
        .await
        .map_err(Self::map_constraint_error)?;

        Ok(product)
    }

    /// 更新产品（部分更新，未提供的字段保持不变）
    pub async fn update(
        &self,
        id: Uuid,
        req: &UpdateProductRequest,
    ) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET
                name = COALESCE($2, name),
                product_number = COALESCE($3, product_number),
                color = COALESCE($4, color),
                standard_cost = COALESCE($5, standard_cost),
                list_price = COALESCE($6, list_price),
                size = COALESCE($7, size),
                weight = COALESCE($8, weight),
                category_id = COALESCE($9, category_id),
                model_id = COALESCE($10, model_id),
                sell_start_date = COALESCE($11, sell_start_date),
                sell_end_date = COALESCE($12, sell_end_date),
                discontinued_date = COALESCE($13, discontinued_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.product_number)
        .bind(&req.color)
        .bind(req.standard_cost)
        .bind(req.list_price)
        .bind(&req.size)
        .bind(req.weight)
        .bind(req.category_id)
        .bind(req.model_id)
        .bind(req.sell_start_date)
        .bind(req.sell_end_date)
        .bind(req.discontinued_date)
        .fetch_optional(&self.db)
        .await
        .map_err(Self::map_constraint_error)?;

        Ok(product)
    }

    /// 删除产品
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 列出产品分类
    pub async fn list_categories(&self) -> Result<Vec<ProductCategory>, AppError> {
        let categories =
            sqlx::query_as::<_, ProductCategory>("SELECT * FROM product_categories ORDER BY name")
                .fetch_all(&self.db)
                .await?;

        Ok(categories)
    }

    /// 列出产品型号
    pub async fn list_models(&self) -> Result<Vec<ProductModel>, AppError> {
        let models =
            sqlx::query_as::<_, ProductModel>("SELECT * FROM product_models ORDER BY name")
                .fetch_all(&self.db)
                .await?;

        Ok(models)
    }

    /// 唯一约束冲突转换为用户可见的 400
    fn map_constraint_error(e: sqlx::Error) -> AppError {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.code().as_deref() == Some("23505") {
                return AppError::BadRequest("product_number already exists".to_string());
            }
            if db_err.code().as_deref() == Some("23503") {
                return AppError::BadRequest("unknown category or model reference".to_string());
            }
        }
        AppError::Database(e)
    }
}
