//! Background scheduler for periodic tracking cycles.
//!
//! Runs a fixed-interval cycle against the active window; the first cycle
//! fires immediately on startup.

use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};

use crate::main_lib::AppState;

/// Starts the background tracking scheduler.
pub fn start_tracking_scheduler(state: Arc<AppState>) {
    tokio::spawn(async move {
        info!(
            "tracking scheduler started ({}s interval)",
            state.config.poll_interval_secs
        );

        let mut poll = interval(Duration::from_secs(state.config.poll_interval_secs));

        loop {
            poll.tick().await;
            run_scheduled_cycle(&state).await;
        }
    });
}

/// Runs a single scheduled tracking cycle.
async fn run_scheduled_cycle(state: &Arc<AppState>) {
    match state.tracking_service.track_cycle(false).await {
        Ok(Some(status)) => {
            debug!(
                "checked {}: current {} (peak {:?})",
                status.key, status.record.current_price, status.record.peak_price
            );
        }
        Ok(None) => debug!("cycle skipped: window not initialized yet"),
        Err(e) => warn!("scheduled tracking cycle failed: {}", e),
    }
}
