//! Admin Order API 模块
//!
//! 管理端订单操作，整组路由挂在管理员中间件之后。

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_all))
        .route(
            "/{id}",
            put(handler::update_status).delete(handler::delete),
        )
        .layer(middleware::from_fn(require_admin))
}
