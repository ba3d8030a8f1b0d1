use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::services::GeolocationService;

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// 等待 Ctrl+C，然后释放数据库句柄
pub async fn listen_for_shutdown(service: Arc<GeolocationService>) {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, closing databases...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    close_service(service).await;
}

/// 在超时内关闭数据库读取器
pub async fn close_service(service: Arc<GeolocationService>) {
    let task = tokio::task::spawn_blocking(move || service.close());

    match timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), task).await {
        Ok(Ok(())) => info!("Geolocation databases closed"),
        Ok(Err(e)) => error!("Closing geolocation databases failed: {}", e),
        Err(_) => error!(
            "Closing geolocation databases timed out after {} seconds",
            SHUTDOWN_TIMEOUT_SECS
        ),
    }
}
