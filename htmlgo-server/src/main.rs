use clap::Parser;
use htmlgo_server::{ServerConfig, app, logging};
use tracing::info;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    logging::init_tracing();
    let config = ServerConfig::parse();

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "Server started at http://{} (static files from {})",
        addr,
        config.static_dir.display()
    );

    axum::serve(listener, app(&config))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down server...");
}
