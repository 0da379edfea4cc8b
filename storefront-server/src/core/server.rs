use crate::core::config::Config;
use crate::core::state::ServerState;
use crate::utils::AppError;

/// 等 Ctrl+C，然后触发限时排水
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received, draining connections...");
}

/// 店面服务器
///
/// 持有配置与（可选的）预初始化状态。`run` 启动 HTTP 服务并
/// 阻塞到收到 Ctrl+C。
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    /// 创建服务器，状态推迟到 `run` 时初始化
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// 复用外部已初始化的状态，测试里与 oneshot 共享同一份
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// 启动服务器并等待关闭信号
    pub async fn run(&self) -> Result<(), AppError> {
        let state = if let Some(state) = &self.state {
            state.clone()
        } else {
            ServerState::initialize(&self.config).await
        };

        tracing::info!(
            "Storefront server listening on {}:{} ({})",
            self.config.http_host,
            self.config.http_port,
            self.config.environment
        );

        state.http.start_server(shutdown_signal()).await
    }
}
