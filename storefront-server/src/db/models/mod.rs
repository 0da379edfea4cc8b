//! 持久化文档模型

// SurrealDB 专有类型的序列化适配
pub mod serde_helpers;

// 购物车 -> 结账 -> 订单
pub mod cart;
pub mod checkout;
pub mod order;

pub use cart::Cart;
pub use checkout::Checkout;
pub use order::Order;
