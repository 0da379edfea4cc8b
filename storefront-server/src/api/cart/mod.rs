//! Cart API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    // 购物车 CRUD：游客与登录用户皆可 (认证中间件放行)
    // 合并接口仅限登录用户
    Router::new()
        .route(
            "/",
            get(handler::get_cart)
                .post(handler::add_item)
                .put(handler::update_quantity)
                .delete(handler::remove_item),
        )
        .route("/merge", post(handler::merge))
}
