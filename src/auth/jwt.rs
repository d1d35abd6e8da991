//! JWT 令牌的签发与校验
//! 对称 HMAC 签名，过期时间来自配置

use crate::{config::AppConfig, error::AppError, models::user::User};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject（用户名）
    pub sub: String,

    /// 用户 ID
    pub uid: String,

    /// 管理员标志（签发时嵌入，校验时无需查库）
    pub is_admin: bool,

    /// 签发时间
    pub iat: i64,

    /// 过期时间
    pub exp: i64,

    /// JWT ID（令牌唯一标识）
    pub jti: String,
}

/// 令牌校验失败的内部分类
/// 不对外暴露：中间件统一折叠为 AppError::Unauthorized
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("malformed token")]
    Malformed,
}

/// JWT 服务
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    expire_minutes: u64,
}

impl JwtService {
    /// 从配置创建 JWT 服务
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.jwt_secret.expose_secret();

        // HS256 要求至少 32 字节密钥
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        let algorithm = match config.security.algorithm.as_str() {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => {
                return Err(AppError::Config(format!("Unsupported JWT algorithm: {}", other)))
            }
        };

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            expire_minutes: config.security.access_token_expire_minutes,
        })
    }

    /// 访问令牌有效期（秒）
    pub fn expires_in_secs(&self) -> u64 {
        self.expire_minutes * 60
    }

    /// 为用户签发访问令牌
    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.expire_minutes as i64);

        let claims = Claims {
            sub: user.username.clone(),
            uid: user.id.to_string(),
            is_admin: user.is_admin,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode access token: {:?}", e);
            AppError::Internal
        })
    }

    /// 校验并解码令牌
    /// 过期判定不留余地：now >= exp 即拒绝
    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    _ => TokenError::Malformed,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        AppConfig, BootstrapConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig,
    };
    use secrecy::Secret;

    fn test_config(secret: &str) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                addr: "127.0.0.1:3000".to_string(),
                graceful_shutdown_timeout_secs: 30,
            },
            database: DatabaseConfig {
                url: Secret::new("postgresql://localhost/test".to_string()),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_secs: 30,
                idle_timeout_secs: 600,
                max_lifetime_secs: 1800,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: Secret::new(secret.to_string()),
                algorithm: "HS256".to_string(),
                access_token_expire_minutes: 30,
            },
            bootstrap: BootstrapConfig {
                admin_username: "admin".to_string(),
                admin_password_hash: None,
            },
        }
    }

    fn test_user(username: &str, is_admin: bool) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: "unused".to_string(),
            is_admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service =
            JwtService::from_config(&test_config("test_secret_key_32_characters_long!")).unwrap();
        let user = test_user("alice", true);

        let token = service.issue_token(&user).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.uid, user.id.to_string());
        assert!(claims.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_just_expired_token_rejected() {
        let service =
            JwtService::from_config(&test_config("test_secret_key_32_characters_long!")).unwrap();

        // 手工构造一个刚过期 30 秒的令牌：签名有效也必须拒绝
        let now = Utc::now();
        let claims = Claims {
            sub: "alice".to_string(),
            uid: Uuid::new_v4().to_string(),
            is_admin: false,
            iat: (now - Duration::minutes(5)).timestamp(),
            exp: (now - Duration::seconds(30)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("test_secret_key_32_characters_long!".as_bytes()),
        )
        .unwrap();

        assert!(matches!(service.verify_token(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer =
            JwtService::from_config(&test_config("test_secret_key_32_characters_long!")).unwrap();
        let verifier =
            JwtService::from_config(&test_config("another_secret_key_32_chars_long!!!")).unwrap();

        let token = issuer.issue_token(&test_user("alice", false)).unwrap();

        assert!(matches!(
            verifier.verify_token(&token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service =
            JwtService::from_config(&test_config("test_secret_key_32_characters_long!")).unwrap();
        let token = service.issue_token(&test_user("alice", false)).unwrap();

        let mut tampered = token.clone();
        tampered.push_str("alicex");
        assert!(service.verify_token(&tampered).is_err());
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let service =
            JwtService::from_config(&test_config("test_secret_key_32_characters_long!")).unwrap();
        assert!(matches!(
            service.verify_token("not-a-jwt-at-all"),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn test_short_secret_rejected_at_construction() {
        assert!(JwtService::from_config(&test_config("short")).is_err());
    }
}
