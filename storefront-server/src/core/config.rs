use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::utils::AppError;

/// 店面服务全量配置
///
/// 每一项都有内置默认值，也都能用环境变量覆盖:
///
/// | 变量 | 默认 | 作用 |
/// |------|------|------|
/// | WORK_DIR | /var/lib/storefront | 数据与日志根目录 |
/// | HTTP_HOST | 0.0.0.0 | HTTP 监听地址 |
/// | HTTP_PORT | 3000 | HTTP 监听端口 |
/// | ENVIRONMENT | development | 运行环境标识 |
/// | JWT_SECRET | (开发密钥) | JWT 密钥，至少 32 字节 |
/// | JWT_ISSUER | storefront | JWT 签发者 |
/// | JWT_AUDIENCE | storefront-api | JWT 受众 |
/// | JWT_EXPIRATION_MINUTES | 1440 | 令牌有效期(分钟) |
/// | CATALOG_BASE_URL | http://localhost:9000 | 商品目录服务地址 |
/// | CATALOG_TIMEOUT_MS | 3000 | 目录请求超时(毫秒) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 优雅关闭排水窗口(毫秒) |
///
/// ```ignore
/// WORK_DIR=/data/storefront HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 数据库文件与滚动日志都放在这个目录下
    pub work_dir: String,
    /// HTTP 监听地址
    pub http_host: String,
    /// HTTP 监听端口
    pub http_port: u16,
    /// 运行环境 (development / staging / production)，production 下收紧校验
    pub environment: String,
    /// JWT 验签配置
    pub jwt: JwtConfig,
    /// 商品目录服务地址
    pub catalog_base_url: String,
    /// 目录请求超时 (毫秒)
    pub catalog_timeout_ms: u64,
    /// 收到关闭信号后的排水窗口 (毫秒)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// 读环境变量拼出配置，缺失项用默认值补齐
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/storefront".into()),
            http_host: std::env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            jwt: JwtConfig::default(),
            catalog_base_url: std::env::var("CATALOG_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:9000".into()),
            catalog_timeout_ms: std::env::var("CATALOG_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
        }
    }

    /// 在环境配置之上覆盖工作目录与端口，测试里配合 tempfile 使用
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 生产环境判定
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 开发环境判定
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 数据库目录 ({work_dir}/data)
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("data")
    }

    /// 日志目录 ({work_dir}/logs)
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.data_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }

    /// 校验配置组合
    ///
    /// 生产环境拒绝开发密钥启动。
    pub fn validate(&self) -> Result<(), AppError> {
        if self.is_production() && self.jwt.uses_dev_secret() {
            return Err(AppError::validation(
                "JWT_SECRET must be set to a strong value in production",
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
