//! Background removal of inactive files.

use crate::constants::SWEEP_INTERVAL_SECS;
use crate::state::AppState;
use actix_web::web;
use std::time::Duration;
use tracing::{info, warn};

/// Spawn the task that sweeps inactive files once per day. The first
/// tick is consumed so the sweep does not fire at boot.
pub fn spawn_sweep(state: web::Data<AppState>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
        interval.tick().await;
        loop {
            interval.tick().await;

            let provider = state.config.active_provider();
            info!(provider = %provider, "running inactive file sweep");

            let outcome = state
                .manager
                .sweep_inactive(provider, state.config.max_inactive())
                .await;

            if outcome.failed > 0 {
                warn!(
                    removed = outcome.removed,
                    failed = outcome.failed,
                    "sweep finished with failures"
                );
            } else {
                info!(removed = outcome.removed, "sweep finished");
            }
        }
    });
}
