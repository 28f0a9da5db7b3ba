//! Periodic removal of expired sessions.
//!
//! Expired sessions are already rejected by the access gate; the sweep only
//! keeps the table from growing without bound.

use std::time::Duration;

use chrono::Utc;
use skinledger_db::repositories::SessionRepo;
use skinledger_db::DbPool;
use tokio_util::sync::CancellationToken;

/// Delete every session that has expired by now. Returns the number removed.
pub async fn sweep_once(pool: &DbPool) -> Result<u64, sqlx::Error> {
    SessionRepo::purge_expired(pool, Utc::now()).await
}

/// Run the sweep every `every` until `cancel` is triggered.
///
/// The first sweep runs immediately. A failed sweep is logged and retried on
/// the next tick.
pub async fn run(pool: DbPool, every: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = every.as_secs(), "Session sweep started");

    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session sweep stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep_once(&pool).await {
                    Ok(0) => tracing::debug!("Session sweep: nothing expired"),
                    Ok(deleted) => {
                        tracing::info!(deleted, "Session sweep: purged expired sessions");
                    }
                    Err(e) => tracing::error!(error = %e, "Session sweep failed"),
                }
            }
        }
    }
}
