//! Checkout API Handlers
//!
//! The checkout body may carry the legacy client-side `checkoutItems` and
//! `totalPrice` fields; they are dropped on deserialization. Items and
//! totals always come from the stored cart.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use shared::{PaymentMethod, PaymentStatus, ShippingAddress};

use crate::auth::{CurrentUser, OwnerIdentity};
use crate::core::ServerState;
use crate::db::models::{Checkout, Order};
use crate::utils::validation::validate_shipping_address;
use crate::utils::{AppResponse, AppResult, ok};

/// POST /api/checkout 请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub guest_id: Option<String>,
}

/// PUT /api/checkout/{id}/pay 请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRequest {
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_details: Option<serde_json::Value>,
    #[serde(default)]
    pub guest_id: Option<String>,
}

/// POST /api/checkout - 从购物车创建结账 (201)
pub async fn create(
    State(state): State<ServerState>,
    identity: OwnerIdentity,
    Json(req): Json<CreateCheckoutRequest>,
) -> AppResult<(StatusCode, Json<AppResponse<Checkout>>)> {
    let owner = identity.resolve(req.guest_id.as_deref())?;
    validate_shipping_address(&req.shipping_address)?;

    let checkout = state
        .checkout_flow
        .create_checkout(&owner, req.shipping_address, req.payment_method)
        .await?;
    Ok((StatusCode::CREATED, ok(checkout)))
}

/// PUT /api/checkout/{id}/pay - 记录支付结果 (COD 即时捕获)
pub async fn pay(
    State(state): State<ServerState>,
    identity: OwnerIdentity,
    Path(id): Path<String>,
    Json(req): Json<PayRequest>,
) -> AppResult<Json<AppResponse<Checkout>>> {
    let caller = identity.resolve(req.guest_id.as_deref())?;
    let checkout = state
        .checkout_flow
        .record_payment(&caller, &id, req.payment_status, req.payment_details)
        .await?;
    Ok(ok(checkout))
}

/// POST /api/checkout/{id}/finalize - 定稿生成订单 (幂等，需登录)
pub async fn finalize(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.checkout_flow.finalize(&user, &id).await?;
    Ok(ok(order))
}
