//! Periodic maintenance tasks.

use std::time::Duration;

use sqlx::PgPool;
use tokio::{task::JoinHandle, time::interval};

use crate::auth::refresh_token;

const TOKEN_CLEANUP_DELAY: Duration = Duration::from_secs(60 * 60);
const TOKEN_CLEANUP_PERIOD: Duration = Duration::from_secs(6 * 60 * 60);

/// Start all background jobs. The handles can be aborted on shutdown.
pub fn start_background_jobs(pool: PgPool) -> Vec<JoinHandle<()>> {
    vec![tokio::spawn(periodic_token_cleanup_job(pool))]
}

/// Delete expired refresh tokens every 6 hours, first run after an hour
async fn periodic_token_cleanup_job(pool: PgPool) {
    tokio::time::sleep(TOKEN_CLEANUP_DELAY).await;

    let mut interval = interval(TOKEN_CLEANUP_PERIOD);

    loop {
        interval.tick().await;

        match refresh_token::cleanup_expired_tokens(&pool).await {
            Ok(deleted) if deleted > 0 => {
                tracing::info!(deleted, "expired refresh tokens cleaned up");
            }
            Ok(_) => {
                tracing::debug!("token cleanup complete: no expired tokens found");
            }
            Err(e) => {
                tracing::error!(error = %e, "periodic token cleanup failed");
            }
        }
    }
}
