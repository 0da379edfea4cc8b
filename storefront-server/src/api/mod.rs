//! HTTP 接口层
//!
//! 按资源拆路由，每个子模块自带 `router()`：
//! [`health`] 探活、[`cart`] 购物车 (游客/用户共用)、
//! [`checkout`] 结账流程、[`orders`] 用户侧订单查询、
//! [`admin_orders`] 管理端订单维护。

pub mod health;

pub mod admin_orders;
pub mod cart;
pub mod checkout;
pub mod orders;

// 各 handler 共用的响应别名
pub use crate::utils::{AppResponse, AppResult};
