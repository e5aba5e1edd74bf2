//! todo-api バイナリのエントリポイント
//! MongoDB に接続して HTTP サーバを起動します。

use anyhow::Context;
use infrastructure::MongoTodoRepository;
use shared::Config;
use std::sync::Arc;
use todo_api::{app_with_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG 環境変数で制御可能（既定は info）
    shared::init_tracing().map_err(|e| anyhow::anyhow!("failed to init tracing: {e}"))?;

    let config = Config::from_env()?;
    let repo = MongoTodoRepository::connect(&config)
        .await
        .context("failed to connect to MongoDB")?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "server starting");

    let router = app_with_state(AppState::new(Arc::new(repo.clone())));
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    repo.shutdown().await;
    tracing::info!("server stopped");
    Ok(())
}

/// Ctrl+C または SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl_c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
