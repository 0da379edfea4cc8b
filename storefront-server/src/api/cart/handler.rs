//! Cart API Handlers
//!
//! All cart routes resolve the owner through [`OwnerIdentity`]: a bearer
//! token names the user's cart, an anonymous request must carry a
//! `guestId` (body field or query parameter).

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::cart::CartLine;

use crate::auth::{CurrentUser, OwnerIdentity};
use crate::core::ServerState;
use crate::db::models::Cart;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text, validate_text_len,
};
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// POST /api/cart 请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
    pub quantity: i32,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub guest_id: Option<String>,
}

/// PUT /api/cart 请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub product_id: String,
    pub quantity: i32,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub guest_id: Option<String>,
}

/// DELETE /api/cart 请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemRequest {
    pub product_id: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub guest_id: Option<String>,
}

/// POST /api/cart/merge 请求体
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    pub guest_id: String,
}

/// GET /api/cart - 获取购物车 (无则返回空购物车，不落库)
pub async fn get_cart(
    State(state): State<ServerState>,
    identity: OwnerIdentity,
) -> AppResult<Json<AppResponse<Cart>>> {
    let owner = identity.resolve(None)?;
    let cart = state.cart_store.get_cart(&owner).await?;
    Ok(ok(cart))
}

/// POST /api/cart - 加入商品 (向目录查询快照)
pub async fn add_item(
    State(state): State<ServerState>,
    identity: OwnerIdentity,
    Json(req): Json<AddItemRequest>,
) -> AppResult<Json<AppResponse<Cart>>> {
    let owner = identity.resolve(req.guest_id.as_deref())?;
    validate_required_text(&req.product_id, "productId", MAX_NAME_LEN)?;
    validate_text_len(&req.size, "size", MAX_SHORT_TEXT_LEN)?;
    validate_text_len(&req.color, "color", MAX_SHORT_TEXT_LEN)?;

    // 快照目录里的名称与价格；客户端不提交价格
    let product = state
        .catalog
        .get_product(&req.product_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", req.product_id)))?;

    let line = CartLine {
        product_id: product.id,
        name: product.name,
        image: product.image,
        price: product.price,
        size: req.size,
        color: req.color,
        quantity: req.quantity,
    };

    let cart = state.cart_store.add_item(&owner, line).await?;
    Ok(ok(cart))
}

/// PUT /api/cart - 设定行数量 (小于 1 视为移除)
pub async fn update_quantity(
    State(state): State<ServerState>,
    identity: OwnerIdentity,
    Json(req): Json<UpdateQuantityRequest>,
) -> AppResult<Json<AppResponse<Cart>>> {
    let owner = identity.resolve(req.guest_id.as_deref())?;
    validate_required_text(&req.product_id, "productId", MAX_NAME_LEN)?;
    validate_text_len(&req.size, "size", MAX_SHORT_TEXT_LEN)?;
    validate_text_len(&req.color, "color", MAX_SHORT_TEXT_LEN)?;

    let cart = state
        .cart_store
        .update_quantity(&owner, &req.product_id, &req.size, &req.color, req.quantity)
        .await?;
    Ok(ok(cart))
}

/// DELETE /api/cart - 移除一行 (幂等，移除不存在的行为无操作)
pub async fn remove_item(
    State(state): State<ServerState>,
    identity: OwnerIdentity,
    Json(req): Json<RemoveItemRequest>,
) -> AppResult<Json<AppResponse<Cart>>> {
    let owner = identity.resolve(req.guest_id.as_deref())?;
    validate_required_text(&req.product_id, "productId", MAX_NAME_LEN)?;
    validate_text_len(&req.size, "size", MAX_SHORT_TEXT_LEN)?;
    validate_text_len(&req.color, "color", MAX_SHORT_TEXT_LEN)?;

    let cart = state
        .cart_store
        .remove_item(&owner, &req.product_id, &req.size, &req.color)
        .await?;
    Ok(ok(cart))
}

/// POST /api/cart/merge - 登录后合并游客购物车 (仅限登录用户)
pub async fn merge(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<MergeRequest>,
) -> AppResult<Json<AppResponse<Cart>>> {
    let user_key = shared::OwnerKey::user(&user.id);
    let guest_key = shared::OwnerKey::guest(req.guest_id)?;

    let cart = state.cart_store.merge(&user_key, &guest_key).await?;
    Ok(ok(cart))
}
