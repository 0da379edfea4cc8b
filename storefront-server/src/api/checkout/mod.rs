//! Checkout API 模块

mod handler;

use axum::{
    Router,
    routing::{post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/checkout", routes())
}

fn routes() -> Router<ServerState> {
    // 创建与支付对游客开放；finalize 需要登录 (认证中间件控制)
    Router::new()
        .route("/", post(handler::create))
        .route("/{id}/pay", put(handler::pay))
        .route("/{id}/finalize", post(handler::finalize))
}
