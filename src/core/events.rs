//! Application event definitions

use super::config::Config;
use super::state::PollOutcome;
use crate::tray::TrayAction;
use tokio::sync::mpsc;
use winit::event_loop::EventLoopProxy;

/// Application-wide events delivered to the UI thread
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Tray menu action triggered
    TrayAction(TrayAction),

    /// A status poll finished for `config`
    Status { config: Config, outcome: PollOutcome },

    /// Transient message for the status line (action result or error)
    Message(String),

    /// Login item registration changed
    LoginItemChanged(bool),
}

/// Destination for events produced by background tasks
pub trait EventSink: Clone + Send + 'static {
    /// Deliver an event; returns false once the receiving side is gone
    fn send_event(&self, event: AppEvent) -> bool;
}

/// Wrapper around `mpsc::UnboundedSender<AppEvent>` that also wakes the winit
/// event loop via `EventLoopProxy` after every send, so the loop can stay in
/// `ControlFlow::Wait` between events.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<AppEvent>,
    proxy: EventLoopProxy<()>,
}

impl EventSender {
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>, proxy: EventLoopProxy<()>) -> Self {
        Self { tx, proxy }
    }

    pub fn send(&self, event: AppEvent) -> Result<(), mpsc::error::SendError<AppEvent>> {
        let result = self.tx.send(event);
        let _ = self.proxy.send_event(());
        result
    }
}

impl EventSink for EventSender {
    fn send_event(&self, event: AppEvent) -> bool {
        self.send(event).is_ok()
    }
}

impl EventSink for mpsc::UnboundedSender<AppEvent> {
    fn send_event(&self, event: AppEvent) -> bool {
        self.send(event).is_ok()
    }
}
