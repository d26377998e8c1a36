//! Periodic connection status polling
//!
//! Every `POLL_INTERVAL` (or immediately when nudged through the refresh
//! `Notify`) the poller reads the selected address, asks the tool whether it
//! is connected, and sends an `AppEvent::Status` to the UI. Failures become
//! `PollOutcome::Failed` and never stop the loop.

use crate::bluetooth::{self, BluetoothTool};
use crate::core::config::Config;
use crate::core::events::{AppEvent, EventSink};
use crate::core::shutdown::ShutdownSignal;
use crate::core::state::{PollOutcome, SharedConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Time between status polls
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Query the tool for `config`'s device
pub fn poll_once(tool: &dyn BluetoothTool, config: &Config) -> PollOutcome {
    if !config.has_device() {
        return PollOutcome::NoDevice;
    }

    match bluetooth::is_connected(tool, &config.mac_address) {
        Ok(true) => PollOutcome::Connected,
        Ok(false) => PollOutcome::Disconnected,
        Err(e) => {
            warn!("Status poll failed: {}", e);
            PollOutcome::Failed(e.to_string())
        }
    }
}

/// Status polling task
pub struct Poller<S: EventSink> {
    tool: Arc<dyn BluetoothTool>,
    config: SharedConfig,
    events: S,
    refresh: Arc<Notify>,
    interval: Duration,
}

impl<S: EventSink> Poller<S> {
    pub fn new(
        tool: Arc<dyn BluetoothTool>,
        config: SharedConfig,
        events: S,
        refresh: Arc<Notify>,
    ) -> Self {
        Self {
            tool,
            config,
            events,
            refresh,
            interval: POLL_INTERVAL,
        }
    }

    /// Override the poll interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Poll until shutdown is triggered or the event receiver goes away
    pub async fn run(self, mut shutdown: ShutdownSignal) {
        info!("Status poller started ({:?} interval)", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
                _ = self.refresh.notified() => {
                    debug!("Status refresh requested");
                    ticker.reset();
                }
            }

            let config = self.config.snapshot();
            let tool = Arc::clone(&self.tool);
            let query = config.clone();
            let poll = tokio::task::spawn_blocking(move || poll_once(&*tool, &query));

            let outcome = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                result = poll => match result {
                    Ok(outcome) => outcome,
                    Err(e) => PollOutcome::Failed(e.to_string()),
                },
            };

            if !self.events.send_event(AppEvent::Status { config, outcome }) {
                debug!("Event receiver closed");
                break;
            }
        }

        info!("Status poller stopped");
    }
}
