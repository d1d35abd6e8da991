//! 认证服务：凭证校验与令牌签发

use crate::{
    auth::jwt::JwtService,
    auth::password::PasswordHasher,
    error::AppError,
    models::{auth::*, user::User},
    repository::CredentialStore,
};
use std::sync::Arc;

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, jwt_service: Arc<JwtService>) -> Self {
        Self { store, jwt_service }
    }

    /// 用户登录：校验凭证并签发访问令牌
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let user = self.authenticate(&req.username, &req.password).await?;

        let access_token = self.jwt_service.issue_token(&user)?;

        tracing::info!(username = %user.username, "Login succeeded");

        Ok(LoginResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: self.jwt_service.expires_in_secs(),
        })
    }

    /// 校验用户名与密码
    /// 未知用户与密码错误返回同一错误，避免用户名枚举
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let hasher = PasswordHasher::new();
        hasher.verify(password, &user.password_hash)?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        AppConfig, BootstrapConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use secrecy::Secret;
    use std::collections::HashMap;
    use uuid::Uuid;

    /// 内存凭证存储（测试替身）
    struct InMemoryCredentialStore {
        users: HashMap<String, User>,
    }

    impl InMemoryCredentialStore {
        fn seeded(pairs: &[(&str, &str, bool)]) -> Self {
            let hasher = PasswordHasher::new();
            let mut users = HashMap::new();
            for (username, password, is_admin) in pairs {
                let user = User {
                    id: Uuid::new_v4(),
                    username: username.to_string(),
                    password_hash: hasher.hash(password).unwrap(),
                    is_admin: *is_admin,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                };
                users.insert(username.to_string(), user);
            }
            Self { users }
        }
    }

    #[async_trait]
    impl CredentialStore for InMemoryCredentialStore {
        async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
            Ok(self.users.get(username).cloned())
        }
    }

    fn test_jwt_service() -> Arc<JwtService> {
        let config = AppConfig {
            server: ServerConfig {
                addr: "127.0.0.1:3000".to_string(),
                graceful_shutdown_timeout_secs: 30,
            },
            database: DatabaseConfig {
                url: Secret::new("postgresql://localhost/test".to_string()),
                max_connections: 5,
                min_connections: 1,
                acquire_timeout_secs: 5,
                idle_timeout_secs: 300,
                max_lifetime_secs: 1800,
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: "pretty".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: Secret::new("test-secret-key-for-testing-only-min-32-chars".to_string()),
                algorithm: "HS256".to_string(),
                access_token_expire_minutes: 30,
            },
            bootstrap: BootstrapConfig {
                admin_username: "admin".to_string(),
                admin_password_hash: None,
            },
        };
        Arc::new(JwtService::from_config(&config).unwrap())
    }

    fn test_service(pairs: &[(&str, &str, bool)]) -> AuthService {
        AuthService::new(Arc::new(InMemoryCredentialStore::seeded(pairs)), test_jwt_service())
    }

    #[tokio::test]
    async fn test_authenticate_with_correct_password() {
        let service = test_service(&[("alice", "s3cret", false)]);

        let user = service.authenticate("alice", "s3cret").await.unwrap();
        assert_eq!(user.username, "alice");
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn test_authenticate_with_wrong_password() {
        let service = test_service(&[("alice", "s3cret", false)]);

        let result = service.authenticate("alice", "wrong").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_unknown_user_indistinguishable_from_wrong_password() {
        let service = test_service(&[("alice", "s3cret", false)]);

        let unknown = service.authenticate("nosuchuser", "s3cret").await;
        let wrong = service.authenticate("alice", "wrong").await;

        // 两种失败必须是同一错误，避免用户名枚举
        assert!(matches!(unknown, Err(AppError::Unauthorized)));
        assert!(matches!(wrong, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_login_issues_resolvable_token() {
        let jwt = test_jwt_service();
        let service = AuthService::new(
            Arc::new(InMemoryCredentialStore::seeded(&[("alice", "s3cret", false)])),
            jwt.clone(),
        );

        let response = service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "s3cret".to_string(),
            })
            .await
            .unwrap();

        assert!(!response.access_token.is_empty());
        assert_eq!(response.token_type, "bearer");
        assert_eq!(response.expires_in, 30 * 60);

        // 刚签发的令牌必须解析回原 subject
        let claims = jwt.verify_token(&response.access_token).unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_issues_no_token() {
        let service = test_service(&[("alice", "s3cret", false)]);

        let result = service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "wrong".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_tampered_token_does_not_resolve() {
        let jwt = test_jwt_service();
        let service = AuthService::new(
            Arc::new(InMemoryCredentialStore::seeded(&[("alice", "s3cret", false)])),
            jwt.clone(),
        );

        let response = service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "s3cret".to_string(),
            })
            .await
            .unwrap();

        let mut tampered = response.access_token.clone();
        tampered.push_str("alicex");
        assert!(jwt.verify_token(&tampered).is_err());
    }
}
