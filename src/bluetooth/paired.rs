//! Paired device enumeration
//!
//! `blueutil --paired` prints one device per line, e.g.
//!
//! ```text
//! address: 28-6f-40-1b-2a-55, connected (master, -52 dBm), not favourite, paired, name: "My Buds", recent access date: 2024-05-01 10:00:00 +0000
//! ```

use super::tool::BluetoothTool;
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

/// Address runs up to the first comma or whitespace
static ADDRESS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\baddress:\s*([^,\s]+)").unwrap());

/// Quoted name; the closing quote is the first one followed by a comma or end of line
static NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bname:\s*"(.*?)"\s*(?:,|$)"#).unwrap());

/// A paired Bluetooth device
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Device {
    /// Hardware address as printed by blueutil
    pub address: String,
    /// Human-readable name
    pub name: String,
}

impl Device {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
        }
    }

    /// Label used in pickers: `Name (address)`
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.address)
    }
}

/// Parse one output line; `None` when either field is missing or empty
pub fn parse_device_line(line: &str) -> Option<Device> {
    let line = line.trim();
    let address = ADDRESS_REGEX.captures(line)?.get(1)?.as_str();
    let name = NAME_REGEX.captures(line)?.get(1)?.as_str();

    if address.is_empty() || name.is_empty() {
        return None;
    }

    Some(Device::new(address, name))
}

/// Parse the full `--paired` output, keeping tool order and skipping malformed lines
pub fn parse_paired_output(output: &str) -> Vec<Device> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let device = parse_device_line(line);
            if device.is_none() {
                debug!("Skipping unparseable line: {}", line);
            }
            device
        })
        .collect()
}

/// List paired devices via the tool
pub fn list_paired(tool: &dyn BluetoothTool) -> Result<Vec<Device>> {
    let output = tool.run(&["--paired"])?;
    let devices = parse_paired_output(&output);

    if devices.is_empty() {
        return Err(Error::NoDevicesFound);
    }

    info!("Found {} paired devices", devices.len());
    Ok(devices)
}
