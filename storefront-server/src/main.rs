use storefront_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // dotenv、工作目录与日志先就位，之后的一切都可观测
    setup_environment()?;
    print_banner();

    let config = Config::from_env();
    tracing::info!(
        "🛍️ Storefront server v{} starting ({})",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    let state = ServerState::initialize(&config).await;

    Server::with_state(config, state)
        .run()
        .await
        .inspect_err(|e| tracing::error!("Server exited with error: {}", e))?;

    Ok(())
}
