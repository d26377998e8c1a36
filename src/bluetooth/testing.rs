//! Scripted `BluetoothTool` for unit tests

use super::tool::BluetoothTool;
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Returns a fixed response per leading flag and records every invocation.
/// Flags without a scripted response succeed with empty output.
#[derive(Default)]
pub struct ScriptedTool {
    responses: HashMap<String, std::result::Result<String, String>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, flag: &str, response: std::result::Result<&str, &str>) -> Self {
        self.responses.insert(
            flag.to_string(),
            response.map(str::to_string).map_err(str::to_string),
        );
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }
}

impl BluetoothTool for ScriptedTool {
    fn run(&self, args: &[&str]) -> Result<String> {
        self.calls
            .lock()
            .push(args.iter().map(|a| a.to_string()).collect());

        let flag = args.first().copied().unwrap_or_default();
        match self.responses.get(flag) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(reason)) => Err(Error::ToolInvocation {
                command: format!("blueutil {}", args.join(" ")),
                reason: reason.clone(),
            }),
            None => Ok(String::new()),
        }
    }
}
