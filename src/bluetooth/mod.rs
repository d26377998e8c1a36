//! Bluetooth module - blueutil invocation and output parsing

mod connection;
mod login_path;
mod paired;
mod tool;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::{connect, disconnect, is_connected};
pub use paired::{list_paired, parse_device_line, parse_paired_output, Device};
pub use tool::{Blueutil, BluetoothTool, TOOL_NAME};
