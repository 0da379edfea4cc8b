//! Order API 模块
//!
//! 面向店面用户的订单查询。订单只通过结账定稿产生，这里没有写接口。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/mine", get(handler::list_mine))
        .route("/{id}", get(handler::get_by_id))
}
