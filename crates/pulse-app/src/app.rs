//! Main application orchestration.
//!
//! Wires the gateway client into the universe manager, warms the universe,
//! then runs three independently-timed cycles alongside the HTTP server:
//!
//! - fast refresh: refetch tracked tokens, advance weak cycles;
//! - candidate refresh: discovery sweep, then a cadence-gated rebalance;
//! - standalone rebalance: a safety-net tick at its own interval.
//!
//! The cycles deliberately run without mutual exclusion; each one replaces
//! shared state wholesale at completion. Cycle failures are logged at the
//! cycle boundary and never stop the schedule.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{error, warn};

use pulse_gateway::ScreenerClient;
use pulse_server::run_server;
use pulse_universe::UniverseManager;

use crate::config::AppConfig;
use crate::error::AppResult;

/// Main application.
pub struct Application {
    config: AppConfig,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Warm the universe, start the cycles, and serve the snapshot.
    pub async fn run(self) -> AppResult<()> {
        let client = ScreenerClient::new(self.config.gateway_config())?;
        let manager = Arc::new(UniverseManager::new(
            Arc::new(client),
            self.config.universe_config(),
        ));

        // A dead provider is not fatal at startup: the snapshot stays in
        // warming_up and the scheduled cycles keep retrying.
        if let Err(error) = manager.initialize().await {
            warn!(%error, "Initial warm-up failed, continuing on schedule");
        }

        spawn_cycles(manager.clone());

        run_server(manager, self.config.server.clone()).await?;
        Ok(())
    }
}

/// Spawn the three periodic cycles.
fn spawn_cycles(manager: Arc<UniverseManager>) {
    let config = manager.config();
    let fast_every = Duration::from_millis(config.fast_refresh_ms);
    let candidates_every = Duration::from_millis(config.candidate_refresh_ms);
    let rebalance_every = Duration::from_millis(config.rebalance_ms);

    {
        let manager = manager.clone();
        tokio::spawn(async move {
            let mut ticker = interval(fast_every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(error) = manager.refresh_tracked().await {
                    error!(%error, "Tracked-set refresh failed");
                }
            }
        });
    }

    {
        let manager = manager.clone();
        tokio::spawn(async move {
            let mut ticker = interval(candidates_every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match manager.refresh_candidate_pool().await {
                    Ok(()) => {
                        manager.rebalance(false);
                    }
                    Err(error) => error!(%error, "Candidate refresh failed"),
                }
            }
        });
    }

    tokio::spawn(async move {
        let mut ticker = interval(rebalance_every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            manager.rebalance(false);
        }
    });
}
