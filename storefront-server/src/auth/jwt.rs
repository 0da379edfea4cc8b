//! JWT 验签与解析
//!
//! 令牌由店面信任的身份服务签发，本服务持同一 HS256 密钥，
//! 只做校验和身份还原，不管理用户账号。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 开发环境密钥，生产环境配置校验会拒绝它
pub const DEV_SECRET: &str = "storefront-dev-secret-do-not-use-in-production";

/// 密钥最小长度 (字节)
const MIN_SECRET_LEN: usize = 32;

/// 密钥与校验参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 对称密钥，与身份服务共享，至少 32 字节
    pub secret: String,
    /// 本服务自签令牌的有效期 (分钟)
    pub expiration_minutes: i64,
    /// 期望的 `iss` claim
    pub issuer: String,
    /// 期望的 `aud` claim
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: load_jwt_secret(),
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 不配置就是一天
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "storefront".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "storefront-api".to_string()),
        }
    }
}

impl JwtConfig {
    /// 是否仍在使用开发环境密钥
    pub fn uses_dev_secret(&self) -> bool {
        self.secret == DEV_SECRET
    }
}

/// 读 `JWT_SECRET`，太短或缺失时退回开发密钥并告警
fn load_jwt_secret() -> String {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= MIN_SECRET_LEN => secret,
        Ok(_) => {
            tracing::warn!(
                "JWT_SECRET is shorter than {} bytes, falling back to the development key",
                MIN_SECRET_LEN
            );
            DEV_SECRET.to_string()
        }
        Err(_) => {
            tracing::warn!("⚠️  JWT_SECRET not set! Using the development key.");
            DEV_SECRET.to_string()
        }
    }
}

/// 令牌携带的 Claims
///
/// 身份服务签发的令牌至少带 `sub` / `name` / `role` 三个业务字段。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户标识 (subject)
    pub sub: String,
    /// 显示名称
    pub name: String,
    /// 角色，`user` 或 `admin`
    pub role: String,
    /// 过期时间 (Unix 秒)
    pub exp: i64,
    /// 签发时间 (Unix 秒)
    pub iat: i64,
    /// 签发方
    pub iss: String,
    /// 接收方
    pub aud: String,
}

/// 令牌处理失败的几种情况
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// 持有编解码密钥的令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// 按环境变量里的配置构建
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 用显式配置构建，测试里常用
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 自签一枚令牌
    ///
    /// 线上令牌由身份服务签发，这里主要供测试与本地联调铸造
    /// 同密钥的令牌。
    pub fn generate_token(
        &self,
        user_id: &str,
        name: &str,
        role: &str,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 本服务接受的校验规则: HS256 + iss/aud + 必备 claim 集
    fn validation_rules(&self) -> Validation {
        let mut rules = Validation::new(Algorithm::HS256);
        rules.set_audience(&[&self.config.audience]);
        rules.set_issuer(&[&self.config.issuer]);
        rules.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);
        rules
    }

    /// 校验签名与各项 claim，通过后返回载荷
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation_rules())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            })?;
        Ok(data.claims)
    }

    /// 剥掉 `Bearer ` 前缀，取出令牌本体
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前用户上下文
///
/// 认证中间件从 Claims 构造后塞进请求扩展，处理函数直接当提取器用:
///
/// ```ignore
/// async fn profile(user: CurrentUser) -> String {
///     format!("{} ({})", user.name, user.role)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户标识，来自 `sub`
    pub id: String,
    /// 显示名称
    pub name: String,
    /// 角色，管理端鉴权用
    pub role: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            role: claims.role,
        }
    }
}

impl CurrentUser {
    /// 是否管理员 (`role == "admin"`)
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}
