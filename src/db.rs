//! 数据库连接池与迁移管理
//! 提供 PostgreSQL 连接池、迁移执行、健康检查和初始管理员种子

use crate::config::{BootstrapConfig, DatabaseConfig};
use secrecy::ExposeSecret;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// 创建数据库连接池
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, DbError> {
    let db_url = config.url.expose_secret();

    tracing::debug!("Creating database connection pool...");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
        .connect(db_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create database pool: {}", e);
            DbError::ConnectionFailed(e.to_string())
        })?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database pool created successfully"
    );

    Ok(pool)
}

/// 运行数据库迁移
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running database migrations...");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| {
            tracing::error!("Migration failed: {}", e);
            DbError::MigrationFailed(e.to_string())
        })?;

    tracing::info!("Migrations completed successfully");
    Ok(())
}

/// 播种初始管理员账户
/// 仅当配置提供了密码哈希且该用户名尚不存在时插入
pub async fn seed_bootstrap_admin(pool: &PgPool, config: &BootstrapConfig) -> Result<(), DbError> {
    let Some(password_hash) = &config.admin_password_hash else {
        tracing::debug!("No bootstrap admin password hash configured, skipping seed");
        return Ok(());
    };

    let result = sqlx::query(
        r#"
        INSERT INTO users (username, password_hash, is_admin)
        VALUES ($1, $2, TRUE)
        ON CONFLICT (username) DO NOTHING
        "#,
    )
    .bind(&config.admin_username)
    .bind(password_hash.expose_secret())
    .execute(pool)
    .await
    .map_err(|e| DbError::SeedFailed(e.to_string()))?;

    if result.rows_affected() > 0 {
        tracing::info!(username = %config.admin_username, "Bootstrap admin account created");
    } else {
        tracing::debug!(username = %config.admin_username, "Bootstrap admin already exists");
    }

    Ok(())
}

/// 数据库健康检查
pub async fn health_check(pool: &PgPool) -> HealthStatus {
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => {
            tracing::debug!("Database health check: OK");
            HealthStatus::Healthy
        }
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            HealthStatus::Unhealthy(e.to_string())
        }
    }
}

/// 数据库错误类型
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Seed failed: {0}")]
    SeedFailed(String),
}

/// 健康状态
#[derive(Debug, Clone)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}
