//! OS signal handling.

use tokio::sync::broadcast;

/// Resolve when Ctrl+C arrives or `shutdown` fires, whichever is first.
pub async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                // Fall back to the broadcast signal alone.
                let _ = shutdown.recv().await;
            } else {
                tracing::info!("Ctrl+C received");
            }
        }
        _ = shutdown.recv() => {
            tracing::info!("Shutdown triggered");
        }
    }
}
