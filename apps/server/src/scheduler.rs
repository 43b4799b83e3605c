//! Background scheduler for periodic interest accrual.
//!
//! Disabled unless `CX_INTEREST_INTERVAL_SECS` is set.

use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

use crate::main_lib::AppState;

/// Starts crediting one period of interest every `period`.
///
/// The first run happens one full period after startup.
pub fn start_interest_scheduler(state: Arc<AppState>, period: Duration) {
    tokio::spawn(async move {
        info!("Interest scheduler started ({}s interval)", period.as_secs());

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            run_interest_accrual(&state).await;
        }
    });
}

async fn run_interest_accrual(state: &Arc<AppState>) {
    match state.account_service.accrue_interest_for_all().await {
        Ok(run) if run.failed > 0 => {
            warn!(
                "Interest accrual finished with {} failures ({} accounts credited, {} total)",
                run.failed, run.credited, run.total_interest
            );
        }
        Ok(run) => {
            info!(
                "Interest accrual credited {} accounts, {} total",
                run.credited, run.total_interest
            );
        }
        Err(e) => warn!("Interest accrual failed: {}", e),
    }
}
