use mcp_demo::{
    build_app,
    config::Config,
    http::handlers::{HEALTH_PATH, MCP_PATH},
    logging, AppState,
};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let bind_socket = config.bind_socket()?;
    let state = AppState::new(config.keepalive_interval);
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        mcp_endpoint = %format!("http://{bind_socket}{MCP_PATH}"),
        health_endpoint = %format!("http://{bind_socket}{HEALTH_PATH}"),
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
