//! Database connectivity: a lazily created pool, a shared readiness flag,
//! and the startup retry loop that keeps pinging until the database answers.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Interval between connection attempts at startup.
const RETRY_INTERVAL: Duration = Duration::from_secs(3);

/// Shared flag recording whether the database has answered yet. Cheap to
/// clone; read by the health endpoint and the readiness gate middleware.
#[derive(Clone, Default)]
pub struct DbStatus {
    connected: Arc<AtomicBool>,
}

impl DbStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }
}

/// Creates the pool without touching the network; the first real connection
/// is attempted by [`connect_with_retry`].
pub fn lazy_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(5).connect_lazy(database_url)
}

/// Pings the database every three seconds until it answers, then applies
/// migrations and flips the readiness flag. Runs as a background task so
/// the listener can come up first; requests arriving before the first
/// successful ping are answered 503 by the readiness gate.
pub async fn connect_with_retry(pool: PgPool, status: DbStatus) {
    loop {
        match sqlx::query("SELECT 1").execute(&pool).await {
            Ok(_) => {
                if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
                    log::error!("failed to apply migrations: {}", e);
                    tokio::time::sleep(RETRY_INTERVAL).await;
                    continue;
                }
                status.set_connected(true);
                log::info!("database connected");
                return;
            }
            Err(e) => {
                log::warn!("database not connected yet, retrying in 3s: {}", e);
                tokio::time::sleep(RETRY_INTERVAL).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_starts_disconnected() {
        let status = DbStatus::new();
        assert!(!status.is_connected());

        status.set_connected(true);
        assert!(status.is_connected());

        // Clones observe the same flag.
        let clone = status.clone();
        status.set_connected(false);
        assert!(!clone.is_connected());
    }
}
