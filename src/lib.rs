//! macbuds
//!
//! A macOS menu bar utility that connects and disconnects one paired
//! Bluetooth device through the `blueutil` command-line tool.
//!
//! # Features
//! - Lists paired devices and lets the user pick one, or type an address
//! - Polls the selected device's connection state every two seconds
//! - Toggles connect/disconnect from the menu
//! - Persists the selection as JSON in the user config directory
//! - Registers itself as a launch agent for launch at login

pub mod bluetooth;
pub mod core;
pub mod dialog;
pub mod dispatcher;
pub mod error;
pub mod login_item;
#[cfg(target_os = "macos")]
pub mod macos;
pub mod poller;
pub mod tray;

pub use bluetooth::{Blueutil, BluetoothTool, Device};
pub use crate::core::config::{Config, ConfigStore};
pub use crate::core::events::{AppEvent, EventSender, EventSink};
pub use crate::core::state::{PollOutcome, SharedConfig};
pub use dispatcher::{Dispatcher, Outcome, UserAction};
pub use error::{Error, Result};
pub use login_item::LoginItem;
