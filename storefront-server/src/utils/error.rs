//! 统一错误处理
//!
//! [`AppError`] 是处理函数和服务共用的错误出口，[`AppResponse`] 是包住
//! 成功与失败两种结果的响应信封。错误在 `IntoResponse` 里统一映射成
//! HTTP 状态码加平台错误码，处理函数只管用 `?` 往上抛。
//!
//! # 错误码
//!
//! | 码段 | 含义 |
//! |------|------|
//! | E0000 | 成功 |
//! | E0xxx | 业务错误 (校验失败、记录不存在、状态冲突) |
//! | E2xxx | 权限不足 |
//! | E3xxx | 认证失败 (缺令牌、过期、验签不过) |
//! | E9xxx | 服务端故障 (数据库、内部错误、上游不可用) |
//!
//! ```ignore
//! async fn get_order(/* ... */) -> AppResult<Json<AppResponse<Order>>> {
//!     let order = service.find_order(&user, &id).await?;
//!     Ok(ok(order))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shared::DomainError;
use tracing::error;

use crate::db::repository::RepoError;
use crate::services::catalog::CatalogError;

/// API 响应信封
///
/// 成功与失败共用同一结构，`code` 为 `E0000` 时表示成功:
///
/// ```json
/// { "code": "E0000", "message": "Success", "data": { ... } }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppResponse<T> {
    /// 平台错误码，`E0000` 表示成功
    pub code: String,
    /// 面向客户端的消息
    pub message: String,
    /// 业务负载，失败响应里缺省
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// 链路追踪 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// 应用错误
///
/// 按认证、业务、系统三类划分。系统类错误在转响应时把细节写进日志，
/// 对客户端只暴露笼统消息。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 身份与权限 ==========
    #[error("Authentication required")]
    /// 请求未携带可用身份 (401)
    Unauthorized,

    #[error("Token expired")]
    /// 令牌超过有效期 (401)
    TokenExpired,

    #[error("Invalid token: {0}")]
    /// 令牌存在但没通过验证 (401)
    InvalidToken(String),

    #[error("Permission denied: {0}")]
    /// 身份合法但无权操作目标资源 (403)
    Forbidden(String),

    // ========== 业务结果 ==========
    #[error("Resource not found: {0}")]
    /// 目标记录不存在 (404)
    NotFound(String),

    #[error("Conflicting state: {0}")]
    /// 与资源当前状态相抵触的写入，如篡改已终结的结账 (409)
    Conflict(String),

    #[error("Validation failed: {0}")]
    /// 入参没通过业务校验 (400)
    Validation(String),

    #[error("Invalid request: {0}")]
    /// 请求本身不成立 (400)
    Invalid(String),

    // ========== 系统故障 ==========
    #[error("Database error: {0}")]
    /// 存储层故障 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 未归类的服务端错误 (500)
    Internal(String),

    #[error("Upstream service unavailable: {0}")]
    /// 上游目录服务暂时不可用 (502)，重试安全
    Unavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message): (StatusCode, &str, String) = match self {
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "E3001", "Please login first".into())
            }
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E3003", "Token expired".into()),
            // 验签细节不回传客户端
            AppError::InvalidToken(_) => {
                (StatusCode::UNAUTHORIZED, "E3002", "Invalid token".into())
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg),
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, "E0006", msg),
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".into(),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Unhandled internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".into(),
                )
            }
            AppError::Unavailable(msg) => {
                tracing::warn!(target: "upstream", error = %msg, "Upstream service unavailable");
                (
                    StatusCode::BAD_GATEWAY,
                    "E9003",
                    "Upstream service unavailable, please retry".into(),
                )
            }
        };

        let body = AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
            trace_id: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Database(msg) => AppError::Database(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotFound(msg) => AppError::NotFound(msg),
            DomainError::InvalidState(msg) => AppError::Conflict(msg),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Unavailable(msg) => AppError::Unavailable(msg),
            CatalogError::Malformed(msg) => {
                AppError::Unavailable(format!("catalog returned malformed data: {msg}"))
            }
        }
    }
}

// ========== 构造函数 ==========

impl AppError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn token_expired() -> Self {
        Self::TokenExpired
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// 处理函数与服务层通用的结果别名
pub type AppResult<T> = Result<T, AppError>;

// ========== 成功响应 ==========

/// 成功信封，默认 message
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    ok_with_message(data, "Success")
}

/// 成功信封，自定义 message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: message.into(),
        data: Some(data),
        trace_id: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_mapping() {
        let e: AppError = RepoError::NotFound("cart x".to_string()).into();
        assert!(matches!(e, AppError::NotFound(_)));

        let e: AppError = RepoError::Duplicate("again".to_string()).into();
        assert!(matches!(e, AppError::Conflict(_)));

        let e: AppError = RepoError::Database("boom".to_string()).into();
        assert!(matches!(e, AppError::Database(_)));
    }

    #[test]
    fn test_domain_error_mapping() {
        let e: AppError = DomainError::validation("bad quantity").into();
        assert!(matches!(e, AppError::Validation(_)));

        let e: AppError = DomainError::invalid_state("already finalized").into();
        assert!(matches!(e, AppError::Conflict(_)));
    }

    #[test]
    fn test_success_envelope_shape() {
        let body = ok(42);
        let json = serde_json::to_value(&body.0).unwrap();
        assert_eq!(json["code"], "E0000");
        assert_eq!(json["data"], 42);
        // Absent traceId is omitted, not null
        assert!(json.get("traceId").is_none());
    }
}
