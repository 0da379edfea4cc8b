//! HTTP API 集成测试 - 经由 oneshot 走完整中间件栈
//!
//! Run: cargo test -p storefront-server --test http_api

use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use storefront_server::core::{Config, ServerState};
use storefront_server::services::{CatalogProduct, InMemoryCatalog};

struct TestServer {
    _tmp: tempfile::TempDir,
    state: ServerState,
    catalog: Arc<InMemoryCatalog>,
}

impl TestServer {
    async fn start() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(tmp.path().to_str().unwrap(), 0);

        let catalog = Arc::new(InMemoryCatalog::new());
        catalog.insert(CatalogProduct {
            id: "P100".to_string(),
            name: "Linen Shirt".to_string(),
            image: "/images/p100.jpg".to_string(),
            price: 49.9,
        });
        catalog.insert(CatalogProduct {
            id: "P200".to_string(),
            name: "Wool Scarf".to_string(),
            image: String::new(),
            price: 25.0,
        });

        let state = ServerState::initialize_with_catalog(&config, catalog.clone()).await;
        Self {
            _tmp: tmp,
            state,
            catalog,
        }
    }

    fn token(&self, user_id: &str, name: &str, role: &str) -> String {
        self.state
            .jwt_service
            .generate_token(user_id, name, role)
            .unwrap()
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(v) => builder
                .header("content-type", "application/json")
                .body(Body::from(v.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.state.http.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

fn shipping_address() -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "address": "12 Analytical Row",
        "city": "London",
        "postalCode": "EC1A 1AA",
        "country": "UK",
        "phone": "+44 20 0000 0000"
    })
}

#[tokio::test]
async fn test_health_endpoints_skip_auth() {
    let server = TestServer::start().await;

    let (status, body) = server.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = server.request("GET", "/health/detailed", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["database"]["status"], "ok");
}

#[tokio::test]
async fn test_guest_cart_crud() {
    let server = TestServer::start().await;
    let guest = "guest_crud1";

    // 加入商品: 价格来自目录快照，客户端不提交价格
    let (status, body) = server
        .request(
            "POST",
            "/api/cart",
            None,
            Some(json!({
                "productId": "P100",
                "quantity": 2,
                "size": "M",
                "color": "White",
                "guestId": guest
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "E0000");
    assert_eq!(body["data"]["lines"][0]["name"], "Linen Shirt");
    assert_eq!(body["data"]["lines"][0]["price"], 49.9);
    assert_eq!(body["data"]["totalPrice"], 99.8);

    // 查询参数方式读取
    let (status, body) = server
        .request("GET", &format!("/api/cart?guestId={}", guest), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["ownerKey"], format!("guest:{}", guest));

    // 设定数量 (覆盖，不累加)
    let (_, body) = server
        .request(
            "PUT",
            "/api/cart",
            None,
            Some(json!({
                "productId": "P100",
                "quantity": 5,
                "size": "M",
                "color": "White",
                "guestId": guest
            })),
        )
        .await;
    assert_eq!(body["data"]["lines"][0]["quantity"], 5);
    assert_eq!(body["data"]["totalPrice"], 249.5);

    // 第二行商品
    let (_, body) = server
        .request(
            "POST",
            "/api/cart",
            None,
            Some(json!({"productId": "P200", "quantity": 1, "guestId": guest})),
        )
        .await;
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["totalPrice"], 274.5);

    // 按 (productId, size, color) 移除一行
    let (status, body) = server
        .request(
            "DELETE",
            "/api/cart",
            None,
            Some(json!({
                "productId": "P100",
                "size": "M",
                "color": "White",
                "guestId": guest
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["lines"][0]["productId"], "P200");
    assert_eq!(body["data"]["totalPrice"], 25.0);

    // 移除不存在的行是无操作
    let (status, body) = server
        .request(
            "DELETE",
            "/api/cart",
            None,
            Some(json!({
                "productId": "P100",
                "size": "M",
                "color": "White",
                "guestId": guest
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 1);

    // 数量 0 等价移除
    let (status, body) = server
        .request(
            "PUT",
            "/api/cart",
            None,
            Some(json!({
                "productId": "P200",
                "quantity": 0,
                "guestId": guest
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["totalPrice"], 0.0);
}

#[tokio::test]
async fn test_cart_owner_resolution() {
    let server = TestServer::start().await;

    // 既无令牌也无 guestId
    let (status, body) = server.request("GET", "/api/cart", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    // guestId 形状不合法
    let (status, body) = server
        .request("GET", "/api/cart?guestId=nope", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    // 游客可达路由上出示的无效令牌仍然硬失败
    let (status, body) = server
        .request("GET", "/api/cart?guestId=guest_ok1", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3002");

    // 有效令牌时购物车跟随用户，query 里的 guestId 被忽略
    let token = server.token("u1", "Ada", "user");
    let (_, body) = server
        .request(
            "POST",
            "/api/cart",
            Some(&token),
            Some(json!({"productId": "P200", "quantity": 1, "guestId": "guest_ok1"})),
        )
        .await;
    assert_eq!(body["data"]["ownerKey"], "user:u1");
}

#[tokio::test]
async fn test_catalog_failures_map_to_envelope() {
    let server = TestServer::start().await;

    // 目录不认识的商品
    let (status, body) = server
        .request(
            "POST",
            "/api/cart",
            None,
            Some(json!({"productId": "P999", "quantity": 1, "guestId": "guest_cat1"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E0003");

    // 目录下游不可用: 502，客户端可重试
    server.catalog.set_unavailable(true);
    let (status, body) = server
        .request(
            "POST",
            "/api/cart",
            None,
            Some(json!({"productId": "P100", "quantity": 1, "guestId": "guest_cat1"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "E9003");
}

#[tokio::test]
async fn test_checkout_to_order_over_http() {
    let server = TestServer::start().await;
    let guest = "guest_flow1";

    server
        .request(
            "POST",
            "/api/cart",
            None,
            Some(json!({"productId": "P100", "quantity": 2, "guestId": guest})),
        )
        .await;

    // 空购物车不能结账
    let (status, body) = server
        .request(
            "POST",
            "/api/checkout",
            None,
            Some(json!({"shippingAddress": shipping_address(), "guestId": "guest_empty1"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E0002");

    // 创建结账 → 201 PENDING
    let (status, body) = server
        .request(
            "POST",
            "/api/checkout",
            None,
            Some(json!({"shippingAddress": shipping_address(), "guestId": guest})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["paymentStatus"], "PENDING");
    assert_eq!(body["data"]["isFinalized"], false);
    assert_eq!(body["data"]["totalPrice"], 99.8);
    let checkout_id = body["data"]["id"].as_str().unwrap().to_string();

    // 别的游客不能支付它
    let (status, body) = server
        .request(
            "PUT",
            &format!("/api/checkout/{}/pay", checkout_id),
            None,
            Some(json!({"paymentStatus": "PAID", "guestId": "guest_other1"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "E2001");

    // 本人支付 → PAID
    let (status, body) = server
        .request(
            "PUT",
            &format!("/api/checkout/{}/pay", checkout_id),
            None,
            Some(json!({"paymentStatus": "PAID", "guestId": guest})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["paymentStatus"], "PAID");
    assert!(body["data"]["paidAt"].is_string());
    assert_eq!(body["data"]["paymentDetails"]["method"], "COD");

    // 定稿需要登录
    let (status, body) = server
        .request(
            "POST",
            &format!("/api/checkout/{}/finalize", checkout_id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3001");

    // 登录用户定稿认领游客结账
    let token = server.token("u1", "Ada", "user");
    let (status, body) = server
        .request(
            "POST",
            &format!("/api/checkout/{}/finalize", checkout_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["checkoutId"], checkout_id.as_str());
    assert_eq!(body["data"]["userId"], "u1");
    assert_eq!(body["data"]["status"], "PROCESSING");
    assert_eq!(body["data"]["isPaid"], true);
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    // 再次定稿返回同一订单
    let (status, body) = server
        .request(
            "POST",
            &format!("/api/checkout/{}/finalize", checkout_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], order_id.as_str());

    // 定稿清空了游客购物车
    let (_, body) = server
        .request("GET", &format!("/api/cart?guestId={}", guest), None, None)
        .await;
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 0);

    // 订单出现在用户列表里
    let (status, body) = server
        .request("GET", "/api/orders/mine", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], order_id.as_str());
}

#[tokio::test]
async fn test_order_access_control() {
    let server = TestServer::start().await;
    let token_u1 = server.token("u1", "Ada", "user");

    // u1 下单
    server
        .request(
            "POST",
            "/api/cart",
            Some(&token_u1),
            Some(json!({"productId": "P200", "quantity": 1})),
        )
        .await;
    let (_, body) = server
        .request(
            "POST",
            "/api/checkout",
            Some(&token_u1),
            Some(json!({"shippingAddress": shipping_address()})),
        )
        .await;
    let checkout_id = body["data"]["id"].as_str().unwrap().to_string();
    server
        .request(
            "PUT",
            &format!("/api/checkout/{}/pay", checkout_id),
            Some(&token_u1),
            Some(json!({"paymentStatus": "PAID"})),
        )
        .await;
    let (_, body) = server
        .request(
            "POST",
            &format!("/api/checkout/{}/finalize", checkout_id),
            Some(&token_u1),
            None,
        )
        .await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    // 本人可读
    let (status, _) = server
        .request("GET", &format!("/api/orders/{}", order_id), Some(&token_u1), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // 他人不可读
    let token_u2 = server.token("u2", "Bob", "user");
    let (status, body) = server
        .request("GET", &format!("/api/orders/{}", order_id), Some(&token_u2), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "E2001");

    // 管理员可读任意订单
    let token_admin = server.token("a1", "Admin", "admin");
    let (status, _) = server
        .request(
            "GET",
            &format!("/api/orders/{}", order_id),
            Some(&token_admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // 他人的列表是空的
    let (_, body) = server
        .request("GET", "/api/orders/mine", Some(&token_u2), None)
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // 不存在的订单
    let (status, body) = server
        .request(
            "GET",
            "/api/orders/shop_order:doesnotexist",
            Some(&token_u1),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E0003");
}

#[tokio::test]
async fn test_admin_order_lifecycle() {
    let server = TestServer::start().await;
    let token_u1 = server.token("u1", "Ada", "user");
    let token_admin = server.token("a1", "Admin", "admin");

    // u1 下单
    server
        .request(
            "POST",
            "/api/cart",
            Some(&token_u1),
            Some(json!({"productId": "P100", "quantity": 1})),
        )
        .await;
    let (_, body) = server
        .request(
            "POST",
            "/api/checkout",
            Some(&token_u1),
            Some(json!({"shippingAddress": shipping_address()})),
        )
        .await;
    let checkout_id = body["data"]["id"].as_str().unwrap().to_string();
    server
        .request(
            "PUT",
            &format!("/api/checkout/{}/pay", checkout_id),
            Some(&token_u1),
            Some(json!({"paymentStatus": "PAID"})),
        )
        .await;
    let (_, body) = server
        .request(
            "POST",
            &format!("/api/checkout/{}/finalize", checkout_id),
            Some(&token_u1),
            None,
        )
        .await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    // 普通用户进不了管理端
    let (status, body) = server
        .request("GET", "/api/admin/orders", Some(&token_u1), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "E2001");

    // 管理员列出全部订单
    let (status, body) = server
        .request("GET", "/api/admin/orders", Some(&token_admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // 状态前进: PROCESSING → SHIPPED
    let (status, body) = server
        .request(
            "PUT",
            &format!("/api/admin/orders/{}", order_id),
            Some(&token_admin),
            Some(json!({"status": "SHIPPED"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "SHIPPED");
    assert_eq!(body["data"]["isDelivered"], false);

    // SHIPPED → DELIVERED: 送达标志与时间戳落盘
    let (status, body) = server
        .request(
            "PUT",
            &format!("/api/admin/orders/{}", order_id),
            Some(&token_admin),
            Some(json!({"status": "DELIVERED"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isDelivered"], true);
    assert!(body["data"]["deliveredAt"].is_string());

    // 终态不可回退
    let (status, body) = server
        .request(
            "PUT",
            &format!("/api/admin/orders/{}", order_id),
            Some(&token_admin),
            Some(json!({"status": "SHIPPED"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E0004");

    // 删除一次成功，再删 404
    let (status, body) = server
        .request(
            "DELETE",
            &format!("/api/admin/orders/{}", order_id),
            Some(&token_admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], true);

    let (status, body) = server
        .request(
            "DELETE",
            &format!("/api/admin/orders/{}", order_id),
            Some(&token_admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E0003");
}

#[tokio::test]
async fn test_cart_merge_requires_login() {
    let server = TestServer::start().await;
    let guest = "guest_premium";

    server
        .request(
            "POST",
            "/api/cart",
            None,
            Some(json!({"productId": "P100", "quantity": 1, "guestId": guest})),
        )
        .await;

    // 未登录不能合并
    let (status, body) = server
        .request(
            "POST",
            "/api/cart/merge",
            None,
            Some(json!({"guestId": guest})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E3001");

    // 登录后合并，游客购物车并入用户名下
    let token = server.token("u1", "Ada", "user");
    server
        .request(
            "POST",
            "/api/cart",
            Some(&token),
            Some(json!({"productId": "P200", "quantity": 1})),
        )
        .await;
    let (status, body) = server
        .request(
            "POST",
            "/api/cart/merge",
            Some(&token),
            Some(json!({"guestId": guest})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ownerKey"], "user:u1");
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["totalPrice"], 74.9);

    // 游客购物车已清空
    let (_, body) = server
        .request("GET", &format!("/api/cart?guestId={}", guest), None, None)
        .await;
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 0);
}
