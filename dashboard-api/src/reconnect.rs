/// Connection supervisor
///
/// Startup does not fail when a store is unreachable; the API serves
/// fallback data instead. This task wakes up periodically and, when either
/// pool is down, asks the store to connect again. It runs until the
/// shutdown token is cancelled.
///
/// # Example
///
/// ```no_run
/// use dashboard_api::reconnect;
/// use dashboard_shared::db::pool::DatabaseConfig;
/// use dashboard_shared::repository::{ClientRepository, ClientStore};
/// use std::{sync::Arc, time::Duration};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() {
/// let store: Arc<dyn ClientStore> = Arc::new(ClientRepository::new(
///     DatabaseConfig::default(),
///     DatabaseConfig::default(),
/// ));
/// let shutdown = CancellationToken::new();
///
/// let handle = reconnect::spawn(store, Duration::from_secs(30), shutdown.clone());
///
/// shutdown.cancel();
/// if let Some(handle) = handle {
///     handle.await.ok();
/// }
/// # }
/// ```

use dashboard_shared::repository::ClientStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Spawns the supervisor; a zero interval disables it
pub fn spawn(
    store: Arc<dyn ClientStore>,
    interval: Duration,
    shutdown: CancellationToken,
) -> Option<JoinHandle<()>> {
    if interval.is_zero() {
        info!("Store reconnect supervisor disabled");
        return None;
    }

    Some(tokio::spawn(supervise(store, interval, shutdown)))
}

/// Runs the reconnect loop until `shutdown` is cancelled
pub async fn supervise(store: Arc<dyn ClientStore>, interval: Duration, shutdown: CancellationToken) {
    info!(interval_seconds = interval.as_secs(), "Store reconnect supervisor started");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Store reconnect supervisor stopping");
                break;
            }
            _ = tokio::time::sleep(interval) => {
                let status = store.connection_status().await;
                if status.all_connected() {
                    debug!("Stores connected, nothing to do");
                    continue;
                }

                warn!(
                    store1_connected = status.store1_connected,
                    store2_connected = status.store2_connected,
                    "Store connection down, reconnecting"
                );

                match store.connect().await {
                    Ok(()) => info!("Store connection restored"),
                    Err(e) => warn!(error = %e, "Reconnect attempt failed, still serving fallback data"),
                }
            }
        }
    }
}
