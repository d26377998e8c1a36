//! User action handling
//!
//! Menu actions are queued on a channel and handled one at a time by a single
//! task, so config writes and tool invocations never overlap. The dispatcher
//! is the only writer of the shared config.

use crate::bluetooth::{self, BluetoothTool};
use crate::core::config::{Config, ConfigStore};
use crate::core::events::{AppEvent, EventSink};
use crate::core::shutdown::ShutdownSignal;
use crate::core::state::SharedConfig;
use crate::dialog::Prompter;
use crate::error::Error;
use crate::login_item::LoginItem;
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};
use tracing::{debug, error, info, warn};

/// Actions the dispatcher handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    /// Connect if disconnected, disconnect if connected
    Toggle,
    /// Pick from the paired device list
    SelectDevice,
    /// Type an address by hand
    EnterAddress,
    /// Forget the selected device
    ClearDevice,
    /// Flip launch at login
    ToggleLoginItem,
}

/// What handling an action changed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Text for the status line
    pub message: Option<String>,
    /// The config was replaced and saved
    pub config_changed: bool,
    /// New login item state
    pub login_item: Option<bool>,
}

impl Outcome {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Handles user actions against the tool, dialogs, and persisted config
pub struct Dispatcher {
    tool: Arc<dyn BluetoothTool>,
    prompter: Arc<dyn Prompter>,
    store: ConfigStore,
    login_item: LoginItem,
    config: SharedConfig,
}

impl Dispatcher {
    pub fn new(
        tool: Arc<dyn BluetoothTool>,
        prompter: Arc<dyn Prompter>,
        store: ConfigStore,
        login_item: LoginItem,
        config: SharedConfig,
    ) -> Self {
        Self {
            tool,
            prompter,
            store,
            login_item,
            config,
        }
    }

    /// Handle one action synchronously. Blocks on the tool and dialogs.
    pub fn handle(&self, action: UserAction) -> Outcome {
        info!("Handling {:?}", action);
        match action {
            UserAction::Toggle => self.toggle(),
            UserAction::SelectDevice => self.select_device(),
            UserAction::EnterAddress => self.enter_address(),
            UserAction::ClearDevice => self.clear_device(),
            UserAction::ToggleLoginItem => self.toggle_login_item(),
        }
    }

    fn toggle(&self) -> Outcome {
        let address = self.config.address();
        if address.is_empty() {
            debug!("Toggle ignored, no device selected");
            return Outcome::default();
        }

        let tool = &*self.tool;
        let result = bluetooth::is_connected(tool, &address).and_then(|connected| {
            if connected {
                bluetooth::disconnect(tool, &address)
            } else {
                bluetooth::connect(tool, &address)
            }
        });

        match result {
            Ok(()) => Outcome::default(),
            Err(e) => {
                warn!("Toggle failed: {}", e);
                Outcome::message(format!("Error: {}", e))
            }
        }
    }

    fn select_device(&self) -> Outcome {
        let picked = bluetooth::list_paired(&*self.tool)
            .and_then(|devices| self.prompter.choose_device(&devices));

        match picked {
            Ok(device) => {
                info!("Selected device: {} ({})", device.name, device.address);
                let message = format!("Device selected: {}", device.name);
                self.store_config(Config::with_device(device.address, device.name), message)
            }
            Err(e) => self.failure(e),
        }
    }

    fn enter_address(&self) -> Outcome {
        let current = self.config.snapshot();
        let entered = match self.prompter.enter_address(&current.mac_address) {
            Ok(entered) => entered.trim().to_string(),
            Err(e) => return self.failure(e),
        };

        if entered.is_empty() || entered == current.mac_address {
            debug!("Address unchanged");
            return Outcome::default();
        }

        let message = format!("Device set: {}", entered);
        self.store_config(Config::with_device(entered, ""), message)
    }

    fn clear_device(&self) -> Outcome {
        match self.store.clear() {
            Ok(()) => {
                info!("Cleared selected device");
                self.config.replace(Config::default());
                Outcome {
                    config_changed: true,
                    ..Outcome::default()
                }
            }
            Err(e) => {
                error!("{}", e);
                Outcome::message(format!("Error clearing config: {}", e))
            }
        }
    }

    fn toggle_login_item(&self) -> Outcome {
        match self.login_item.toggle() {
            Ok(enabled) => Outcome {
                login_item: Some(enabled),
                ..Outcome::default()
            },
            Err(e) => {
                error!("{}", e);
                Outcome {
                    message: Some(format!("Error: {}", e)),
                    login_item: Some(self.login_item.is_enabled()),
                    ..Outcome::default()
                }
            }
        }
    }

    /// Save `config`, then make it the in-memory config
    fn store_config(&self, config: Config, message: String) -> Outcome {
        if let Err(e) = self.store.save(&config) {
            error!("{}", e);
            return Outcome::message(format!("Error saving config: {}", e));
        }

        self.config.replace(config);
        Outcome {
            message: Some(message),
            config_changed: true,
            login_item: None,
        }
    }

    fn failure(&self, e: Error) -> Outcome {
        if e.is_canceled() {
            debug!("Dialog canceled");
            return Outcome::default();
        }
        warn!("{}", e);
        Outcome::message(format!("Error: {}", e))
    }
}

/// Handle queued actions until shutdown, forwarding outcomes to the UI
pub async fn run<S: EventSink>(
    dispatcher: Arc<Dispatcher>,
    mut actions: mpsc::UnboundedReceiver<UserAction>,
    events: S,
    refresh: Arc<Notify>,
    mut shutdown: ShutdownSignal,
) {
    info!("Dispatcher started");

    loop {
        let action = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            action = actions.recv() => match action {
                Some(action) => action,
                None => break,
            },
        };

        let worker = Arc::clone(&dispatcher);
        let handling = tokio::task::spawn_blocking(move || worker.handle(action));

        let outcome = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            result = handling => match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Action {:?} panicked: {}", action, e);
                    continue;
                }
            },
        };

        // A message stays up until the next scheduled poll
        if outcome.config_changed && outcome.message.is_none() {
            refresh.notify_one();
        }
        if let Some(enabled) = outcome.login_item {
            events.send_event(AppEvent::LoginItemChanged(enabled));
        }
        if let Some(message) = outcome.message {
            events.send_event(AppEvent::Message(message));
        }
    }

    info!("Dispatcher stopped");
}
