//! Connection status and connect/disconnect commands

use super::tool::BluetoothTool;
use crate::error::Result;
use tracing::{debug, info};

/// Whether `address` is connected.
///
/// An empty address is "not connected" and does not touch the tool. Otherwise
/// the tool's trimmed output must be exactly `1`.
pub fn is_connected(tool: &dyn BluetoothTool, address: &str) -> Result<bool> {
    if address.is_empty() {
        return Ok(false);
    }

    let output = tool.run(&["--is-connected", address])?;
    let connected = output.trim() == "1";
    debug!("{} connected: {}", address, connected);
    Ok(connected)
}

pub fn connect(tool: &dyn BluetoothTool, address: &str) -> Result<()> {
    info!("Connecting to {}", address);
    tool.run(&["--connect", address]).map(|_| ())
}

pub fn disconnect(tool: &dyn BluetoothTool, address: &str) -> Result<()> {
    info!("Disconnecting from {}", address);
    tool.run(&["--disconnect", address]).map(|_| ())
}
