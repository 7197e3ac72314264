use anyhow::Context;
use booking_server::{Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 工作目录, 日志)
    let config = setup_environment()?;

    print_banner();
    tracing::info!(
        restaurant_id = %config.restaurant_id,
        timezone = %config.timezone,
        environment = %config.environment,
        "🦀 Crab Booking Server starting..."
    );

    // 2. 初始化服务状态
    let state = ServerState::initialize(&config).context("Failed to initialize server state")?;

    // 3. 运行直到 Ctrl+C
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
