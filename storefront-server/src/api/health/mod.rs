//! 探活接口
//!
//! `/health` 返回进程存活与版本号，供负载均衡器探活；
//! `/health/detailed` 额外对嵌入式存储做一次往返并报告运行时长。
//! 两条路由都在认证中间件之外。

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::time::Instant;

use crate::core::ServerState;

// 进程启动时间，router() 装配时固定
static STARTED: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// 探活路由，不挂认证
pub fn router() -> Router<ServerState> {
    STARTED.get_or_init(Instant::now);
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
}

/// 探活响应
#[derive(Serialize)]
pub struct BasicHealth {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
}

/// 详细探活响应
#[derive(Serialize)]
pub struct DetailedHealth {
    status: &'static str,
    version: &'static str,
    /// 运行时长 (秒)
    uptime_seconds: u64,
    checks: Components,
}

/// 各组件探测结果
#[derive(Serialize)]
pub struct Components {
    database: ComponentHealth,
    catalog: ComponentHealth,
}

/// 单个组件的探测结果
#[derive(Serialize)]
pub struct ComponentHealth {
    /// ok | error
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ComponentHealth {
    fn pass(latency_ms: Option<u64>) -> Self {
        Self {
            status: "ok",
            latency_ms,
            message: None,
        }
    }

    fn fail(message: String) -> Self {
        Self {
            status: "error",
            latency_ms: None,
            message: Some(message),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// GET /health - 探活
pub async fn health() -> Json<BasicHealth> {
    Json(BasicHealth {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health/detailed - 组件级检查
pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealth> {
    let database = probe_database(&state).await;
    // 目录按需访问，不在这里探测上游
    let catalog = ComponentHealth::pass(None);

    let status = if database.is_ok() && catalog.is_ok() {
        "healthy"
    } else {
        "degraded"
    };

    Json(DetailedHealth {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: STARTED.get_or_init(Instant::now).elapsed().as_secs(),
        checks: Components { database, catalog },
    })
}

/// 对嵌入式存储做一次最小往返
async fn probe_database(state: &ServerState) -> ComponentHealth {
    let begin = Instant::now();
    match state.db.query("RETURN 1").await {
        Ok(_) => ComponentHealth::pass(Some(begin.elapsed().as_millis() as u64)),
        Err(e) => ComponentHealth::fail(format!("Database error: {}", e)),
    }
}
