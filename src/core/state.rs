//! Application state shared between the poller and the dispatcher

use super::config::Config;
use parking_lot::RwLock;
use std::sync::Arc;

/// Result of one status poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// No device configured; the tool was not invoked
    NoDevice,
    /// Configured device is connected
    Connected,
    /// Configured device is not connected
    Disconnected,
    /// Status query failed
    Failed(String),
}

/// In-memory config shared across tasks
///
/// The dispatcher is the only writer. Readers take a snapshot and may see a
/// value that is one poll interval stale.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<Config>>,
}

impl SharedConfig {
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Copy of the current config
    pub fn snapshot(&self) -> Config {
        self.inner.read().clone()
    }

    /// Currently selected address (empty when unset)
    pub fn address(&self) -> String {
        self.inner.read().mac_address.clone()
    }

    /// Replace the whole config
    pub fn replace(&self, config: Config) {
        *self.inner.write() = config;
    }
}
