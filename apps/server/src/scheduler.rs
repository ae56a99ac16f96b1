//! Background sync scheduler.
//!
//! One pass runs at startup (the first interval tick is immediate), then on
//! every tick, whenever a write asks for one, and whenever connectivity flips
//! back to online.

use std::sync::Arc;
use std::time::Duration;

use clubsite_core::sync::{SyncCoordinator, SyncReport};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Starts the scheduler on the current runtime.
pub fn start_sync_scheduler(sync: Arc<SyncCoordinator>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Sync scheduler started ({}s interval)", every.as_secs());
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut online = sync.connectivity().subscribe();

        loop {
            let trigger = tokio::select! {
                _ = ticker.tick() => "interval",
                _ = sync.sync_requested() => "write",
                changed = online.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    if !*online.borrow_and_update() {
                        continue;
                    }
                    "reconnect"
                }
            };
            let report = sync.run_pass().await;
            log_report(trigger, &report);
        }
        debug!("Sync scheduler stopped");
    })
}

fn log_report(trigger: &str, report: &SyncReport) {
    if !report.online {
        debug!("Sync ({}) skipped: remote store offline", trigger);
    } else if report.failed_total() > 0 {
        warn!(
            "Sync ({}) pushed {} record(s), {} still pending",
            trigger,
            report.synced_total(),
            report.failed_total()
        );
    } else if report.synced_total() > 0 {
        info!("Sync ({}) pushed {} record(s)", trigger, report.synced_total());
    } else {
        debug!("Sync ({}): nothing pending", trigger);
    }
}
