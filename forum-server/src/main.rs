use forum_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 加载 .env (可选)
    dotenvy::dotenv().ok();

    // 2. 加载配置
    let config = Config::from_env()?;

    // 3. 初始化日志
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    tracing::info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Forum server starting..."
    );
    if config.is_development() && std::env::var("JWT_SECRET").is_err() {
        tracing::warn!("JWT_SECRET not set, using a temporary development key");
    }

    // 4. 初始化服务器状态 (打开数据库并迁移)
    let state = ServerState::initialize(&config).await?;

    // 5. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
