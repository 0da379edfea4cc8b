use crate::auth::require_auth;
use crate::core::{Config, ServerState};
use crate::utils::AppError;
use axum::{Router, middleware};
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tower::Service;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

pub type OneshotResult =
    Result<http::Response<axum::body::Body>, Box<dyn std::error::Error + Send + Sync>>;

/// 访问日志中间件，每个请求一条 `http_access` 记录
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        target: "http_access",
        %method,
        %uri,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64
    );

    response
}

/// 组装全部资源路由 (不含状态与中间件)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // 探活
        .merge(crate::api::health::router())
        // 业务资源
        .merge(crate::api::cart::router())
        .merge(crate::api::checkout::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::admin_orders::router())
}

/// HTTP 服务
///
/// 路由在 `initialize` 时注入完整状态后缓存；`oneshot` 直接把
/// 请求喂给缓存的路由，集成测试靠它跳过真实监听端口。
#[derive(Clone, Debug)]
pub struct HttpService {
    config: Config,
    router: Arc<RwLock<Option<Router>>>,
}

impl HttpService {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            router: Arc::new(RwLock::new(None)),
        }
    }

    /// 注入状态并定型中间件栈
    ///
    /// 必须在 `ServerState` 装配完成后调用一次。层序自内向外：
    /// 认证 → CORS → 压缩 → 访问日志 → 请求 ID，请求按相反方向
    /// 穿过。认证放最内层，CORS 预检才不会被 401 拦下。
    pub fn initialize(&self, state: ServerState) {
        let app = build_app()
            // require_auth 自行放行游客可达路由与 /health
            .layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new())
            .layer(middleware::from_fn(log_request))
            // 生成 x-request-id 并原样回传
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

        let mut router = self.router.write().expect("router lock poisoned");
        *router = Some(app);
    }

    pub fn router(&self) -> Option<Router> {
        self.router.read().expect("router lock poisoned").clone()
    }

    /// 把单个请求送进缓存的路由，返回完整响应
    pub async fn oneshot(&self, request: http::Request<axum::body::Body>) -> OneshotResult {
        let Some(mut service) = self.router() else {
            return Err(AppError::internal("HttpService not initialized").into());
        };
        service
            .call(request)
            .await
            .map_err(|_| AppError::internal("Oneshot call failed").into())
    }

    /// 绑定监听地址并服务到关闭信号为止
    pub async fn start_server<F>(&self, shutdown_signal: F) -> Result<(), AppError>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let app = self
            .router()
            .ok_or_else(|| AppError::internal("HttpService not initialized with router"))?;

        let addr: SocketAddr = format!("{}:{}", self.config.http_host, self.config.http_port)
            .parse()
            .map_err(|e| AppError::internal(format!("Invalid listen address: {}", e)))?;
        tracing::info!("🚀 Starting HTTP server on {}", addr);

        let handle = axum_server::Handle::new();

        // 关闭信号到达后进入限时排水
        let handle_clone = handle.clone();
        let shutdown_timeout = std::time::Duration::from_millis(self.config.shutdown_timeout_ms);
        tokio::spawn(async move {
            shutdown_signal.await;
            handle_clone.graceful_shutdown(Some(shutdown_timeout));
        });

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}
