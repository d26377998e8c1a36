//! macbuds - Entry Point
//!
//! Sets up logging, loads the config, starts the status poller and the action
//! dispatcher on a tokio runtime, and runs the winit event loop that owns the
//! tray on the main thread.

use anyhow::Result;
use macbuds::{
    bluetooth::{Blueutil, BluetoothTool},
    core::{
        config::ConfigStore,
        events::{AppEvent, EventSender},
        shutdown::{self, ShutdownTrigger},
        state::SharedConfig,
    },
    dialog::AppleScriptPrompter,
    dispatcher::{self, Dispatcher, UserAction},
    login_item::LoginItem,
    poller::Poller,
    tray::{MenuView, TrayAction, TrayManager},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, Notify};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::WindowId,
};

/// How long exit waits for in-flight blueutil calls
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(500);

/// Main application handler for winit event loop
struct App {
    /// Event sender handed to the tray's menu thread
    event_tx: EventSender,
    /// Events from the tray, poller, and dispatcher
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Queue into the dispatcher task
    action_tx: mpsc::UnboundedSender<UserAction>,
    /// Tray manager, created once the event loop is running
    tray_manager: Option<TrayManager>,
    login_item: LoginItem,
    /// Runtime hosting the poller and dispatcher
    runtime: Option<Runtime>,
    shutdown: ShutdownTrigger,
}

impl App {
    /// Process an application event
    fn handle_event(&mut self, event: AppEvent, event_loop: &ActiveEventLoop) {
        let Some(tray) = self.tray_manager.as_mut() else {
            return;
        };

        match event {
            AppEvent::TrayAction(action) => {
                info!("Tray action: {:?}", action);
                if action == TrayAction::Quit {
                    info!("Quitting application...");
                    event_loop.exit();
                } else if let Some(user_action) = action.user_action() {
                    if let Err(e) = self.action_tx.send(user_action) {
                        error!("Dispatcher is gone: {}", e);
                    }
                }
            }
            AppEvent::Status { config, outcome } => {
                tray.apply(&MenuView::new(&config, &outcome));
            }
            AppEvent::Message(message) => {
                tray.set_status(&message);
            }
            AppEvent::LoginItemChanged(enabled) => {
                tray.set_login_item(enabled);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        if self.tray_manager.is_some() {
            return;
        }

        // The tray must be created after the event loop has started on macOS
        match TrayManager::new(self.event_tx.clone(), self.login_item.is_enabled()) {
            Ok(tray) => {
                self.tray_manager = Some(tray);
                info!("Tray manager initialized");
            }
            Err(e) => {
                error!("Failed to initialize tray manager: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        _event: WindowEvent,
    ) {
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Leave events queued until the tray exists
        if self.tray_manager.is_none() {
            return;
        }

        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event, event_loop);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        info!("Application exiting, stopping background tasks...");
        self.shutdown.trigger();
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);
        }
    }
}

/// Load the config or exit: an unreadable config is the one fatal error
fn load_config_or_exit(store: &ConfigStore) -> macbuds::Config {
    match store.load() {
        Ok(config) => config,
        Err(e) => {
            error!("Error loading config: {}", e);
            let _ = rfd::MessageDialog::new()
                .set_title("macbuds")
                .set_description(e.to_string())
                .set_level(rfd::MessageLevel::Error)
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
            std::process::exit(1);
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting macbuds");

    let store = ConfigStore::new()?;
    let config = load_config_or_exit(&store);
    info!("Configuration loaded from {:?}", store.path());

    let login_item = LoginItem::for_current_exe()?;
    let tool: Arc<dyn BluetoothTool> = Arc::new(Blueutil::locate());
    let shared = SharedConfig::new(config);

    // Create event loop and the waking sender
    let event_loop = EventLoop::new()?;
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let event_sender = EventSender::new(event_tx, event_loop.create_proxy());

    #[cfg(target_os = "macos")]
    macbuds::macos::set_accessory_activation_policy();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("macbuds-worker")
        .build()?;

    let refresh = Arc::new(Notify::new());
    let (shutdown_trigger, shutdown_signal) = shutdown::channel();

    let poller = Poller::new(
        Arc::clone(&tool),
        shared.clone(),
        event_sender.clone(),
        Arc::clone(&refresh),
    );
    runtime.spawn(poller.run(shutdown_signal.clone()));

    let dispatcher = Arc::new(Dispatcher::new(
        tool,
        Arc::new(AppleScriptPrompter::new()),
        store,
        login_item.clone(),
        shared,
    ));
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    runtime.spawn(dispatcher::run(
        dispatcher,
        action_rx,
        event_sender.clone(),
        refresh,
        shutdown_signal,
    ));

    let mut app = App {
        event_tx: event_sender,
        event_rx,
        action_tx,
        tray_manager: None,
        login_item,
        runtime: Some(runtime),
        shutdown: shutdown_trigger,
    };

    event_loop.run_app(&mut app)?;

    // Normally taken in `exiting`
    if let Some(runtime) = app.runtime.take() {
        app.shutdown.trigger();
        runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);
    }

    Ok(())
}
