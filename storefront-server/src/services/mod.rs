//! 业务服务层
//!
//! [`HttpService`] 托管路由，[`CartStore`] 负责购物车存取
//! (按归属键串行化写入)，[`CheckoutFlow`] 驱动结账状态机并落订单，
//! [`CatalogApi`] 封装商品目录的取数。

pub mod cart_store;
pub mod catalog;
pub mod checkout_flow;
pub mod http;

pub use cart_store::CartStore;
pub use catalog::{CatalogApi, CatalogError, CatalogProduct, HttpCatalog, InMemoryCatalog};
pub use checkout_flow::CheckoutFlow;
pub use http::HttpService;
