//! 用户侧订单查询处理函数

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// GET /api/orders/mine - 当前用户的订单 (新在前)
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.list_by_user(&user.id).await?;
    Ok(ok(orders))
}

/// GET /api/orders/{id} - 单个订单 (非本人且非管理员返回 403)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;

    if !user.is_admin() && order.user_id != user.id {
        return Err(AppError::forbidden("Order belongs to another user"));
    }
    Ok(ok(order))
}
