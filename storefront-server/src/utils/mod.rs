//! 横切工具
//!
//! 错误码与响应信封 ([`AppError`] / [`AppResponse`])、
//! 日志初始化、请求文本长度校验。

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResponse, AppResult};
pub use error::{ok, ok_with_message};
