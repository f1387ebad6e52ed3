use tokio::signal::unix::{SignalKind, signal};

/// Completes when SIGTERM or SIGINT (Ctrl+C) is received.
pub async fn shutdown_signal() {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            tracing::error!(error = %e, "failed to install SIGTERM handler");
            return std::future::pending().await;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received SIGINT, initiating graceful shutdown");
        }
    }
}
