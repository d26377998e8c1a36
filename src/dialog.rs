//! Device picker and address entry dialogs
//!
//! Dialogs are shown through AppleScript (`osascript`), which runs them in a
//! separate process so the caller does not need to be on the main thread.

use crate::bluetooth::Device;
use crate::error::{Error, Result};
use std::process::{Command, Stdio};
use tracing::debug;

const PICKER_TITLE: &str = "Select Bluetooth Device";
const PICKER_PROMPT: &str = "Select a Bluetooth device to control:";
const ENTRY_TITLE: &str = "Enter Device Address";
const ENTRY_PROMPT: &str = "Enter the Bluetooth address of the device (e.g. 11-22-33-44-55-66):";

/// AppleScript error number for "User canceled"
const USER_CANCELED: &str = "(-128)";

/// Asks the user to pick or type a device
pub trait Prompter: Send + Sync {
    /// Pick one of `devices`; `DialogCanceled` when dismissed
    fn choose_device(&self, devices: &[Device]) -> Result<Device>;

    /// Free-text address entry prefilled with `current`; `DialogCanceled` when dismissed
    fn enter_address(&self, current: &str) -> Result<String>;
}

/// Native dialogs via `osascript`
#[derive(Debug, Default, Clone)]
pub struct AppleScriptPrompter;

impl AppleScriptPrompter {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, script: &[String]) -> Result<String> {
        let mut command = Command::new("osascript");
        for line in script {
            command.arg("-e").arg(line);
        }

        let output = command
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::Dialog(e.to_string()))?;

        if !output.status.success() {
            return Err(failure_from_stderr(&String::from_utf8_lossy(&output.stderr)));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .trim_end_matches(['\r', '\n'])
            .to_string())
    }
}

impl Prompter for AppleScriptPrompter {
    fn choose_device(&self, devices: &[Device]) -> Result<Device> {
        let labels: Vec<String> = devices.iter().map(Device::display_label).collect();
        let picked = self.run(&picker_script(&labels))?;
        debug!("Picker returned {:?}", picked);

        labels
            .iter()
            .position(|label| *label == picked)
            .map(|idx| devices[idx].clone())
            .ok_or_else(|| Error::Dialog(format!("unexpected selection: {}", picked)))
    }

    fn enter_address(&self, current: &str) -> Result<String> {
        self.run(&entry_script(current))
    }
}

fn picker_script(labels: &[String]) -> Vec<String> {
    let items = labels
        .iter()
        .map(|l| applescript_string(l))
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        format!(
            "set picked to choose from list {{{}}} with title {} with prompt {}",
            items,
            applescript_string(PICKER_TITLE),
            applescript_string(PICKER_PROMPT)
        ),
        "if picked is false then error number -128".to_string(),
        "return item 1 of picked".to_string(),
    ]
}

fn entry_script(current: &str) -> Vec<String> {
    vec![
        format!(
            "set answer to display dialog {} default answer {} with title {}",
            applescript_string(ENTRY_PROMPT),
            applescript_string(current),
            applescript_string(ENTRY_TITLE)
        ),
        "return text returned of answer".to_string(),
    ]
}

/// Quote `s` as an AppleScript string literal
fn applescript_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn failure_from_stderr(stderr: &str) -> Error {
    if stderr.contains(USER_CANCELED) {
        Error::DialogCanceled
    } else {
        Error::Dialog(stderr.trim().to_string())
    }
}
