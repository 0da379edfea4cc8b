//! Admin Order API Handlers
//!
//! Status moves forward only; `isDelivered` and `deliveredAt`, once set,
//! survive any later transition.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::OrderStatus;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::OrderRepository;
use crate::security_log;
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// PUT /api/admin/orders/{id} 请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// GET /api/admin/orders - 全部订单 (新在前)
pub async fn list_all(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.list_all().await?;
    Ok(ok(orders))
}

/// PUT /api/admin/orders/{id} - 推进订单状态
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;

    if !order.status.can_transition_to(req.status) {
        return Err(AppError::conflict(format!(
            "Order status cannot change from {:?} to {:?}",
            order.status, req.status
        )));
    }

    // 送达标志与时间戳只进不退
    let delivering = req.status.is_delivered();
    let is_delivered = order.is_delivered || delivering;
    let delivered_at = if delivering {
        order.delivered_at.or_else(|| Some(chrono::Utc::now()))
    } else {
        order.delivered_at
    };

    let record_id = order
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Order record has no id"))?;
    let updated = repo
        .update_status(&record_id, req.status, is_delivered, delivered_at)
        .await?;

    security_log!(
        "INFO",
        "order_status_updated",
        order_id = id.clone(),
        status = format!("{:?}", req.status),
        admin_id = user.id.clone()
    );
    Ok(ok(updated))
}

/// DELETE /api/admin/orders/{id} - 删除订单
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = OrderRepository::new(state.db.clone());
    let deleted = repo.delete(&id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Order {id} not found")));
    }

    security_log!(
        "WARN",
        "order_deleted",
        order_id = id.clone(),
        admin_id = user.id.clone()
    );
    Ok(ok(true))
}
