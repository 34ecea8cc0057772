//! Hold maturation sweep (锁定期成熟扫描)
//!
//! Periodically flips matured HOLD records to AVAILABLE. This is purely a
//! write-path tidy-up: the balance and fund-selection queries already treat
//! matured holds as available, so nothing depends on the sweep having run.

use crate::db::repository::EarningRepository;
use shared::util::now_millis;
use std::time::Duration;

pub struct SweepTask {
    earnings: EarningRepository,
    interval_secs: u64,
}

impl SweepTask {
    pub fn new(earnings: EarningRepository, interval_secs: u64) -> Self {
        Self {
            earnings,
            interval_secs,
        }
    }

    /// Spawn the sweep loop onto the runtime
    pub fn spawn(self) {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(self.interval_secs));
            // First tick fires immediately; skip it so startup stays quiet
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match self.earnings.mature_holds(now_millis()).await {
                    Ok(0) => {}
                    Ok(moved) => {
                        tracing::info!(moved, "Matured hold records promoted to AVAILABLE");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Hold maturation sweep failed");
                    }
                }
            }
        });
    }
}
