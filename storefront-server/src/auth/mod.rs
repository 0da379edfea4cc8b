//! 认证模块
//!
//! JWT 的签发与校验 ([`JwtService`])、请求归属解析
//! ([`OwnerIdentity`] 统一游客和登录用户两种身份)，
//! 以及挂在路由上的 [`require_auth`] / [`require_admin`] 中间件。

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use extractor::OwnerIdentity;
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
