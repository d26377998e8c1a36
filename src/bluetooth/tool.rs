//! blueutil invocation
//!
//! Every Bluetooth operation is a single run of the `blueutil` executable
//! with positional flags. The `BluetoothTool` trait is the seam the rest of
//! the crate talks to, so tests can script the tool's output.

use super::login_path;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Name of the external executable
pub const TOOL_NAME: &str = "blueutil";

/// Locations Homebrew installs into, checked after the PATH lookups
const HOMEBREW_BIN_DIRS: &[&str] = &["/opt/homebrew/bin", "/usr/local/bin"];

/// Runs the external Bluetooth tool
pub trait BluetoothTool: Send + Sync {
    /// Run the tool with `args`, returning its standard output.
    ///
    /// A spawn failure or non-zero exit is a `ToolInvocation` error.
    fn run(&self, args: &[&str]) -> Result<String>;
}

/// The real `blueutil` executable
#[derive(Debug, Clone)]
pub struct Blueutil {
    program: PathBuf,
}

impl Blueutil {
    /// Use an explicit executable path
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Find blueutil: bundled copy next to our executable, then the login
    /// shell PATH, then the process PATH, then Homebrew prefixes. Falls back
    /// to the bare name so a missing tool surfaces as an invocation error.
    pub fn locate() -> Self {
        let bundled = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(TOOL_NAME)));

        let mut search_path = Vec::new();
        if let Some(path) = login_path::resolve_login_path() {
            search_path.extend(std::env::split_paths(&path));
        }
        if let Some(path) = std::env::var_os("PATH") {
            search_path.extend(std::env::split_paths(&path));
        }
        search_path.extend(HOMEBREW_BIN_DIRS.iter().map(PathBuf::from));

        match find_program(bundled.as_deref(), &search_path) {
            Some(program) => {
                info!("Using blueutil at {:?}", program);
                Self { program }
            }
            None => {
                warn!("blueutil not found, relying on spawn-time lookup");
                Self {
                    program: PathBuf::from(TOOL_NAME),
                }
            }
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut command = self.program.display().to_string();
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }
        command
    }
}

impl BluetoothTool for Blueutil {
    fn run(&self, args: &[&str]) -> Result<String> {
        debug!("Running {}", self.describe(args));

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::ToolInvocation {
                command: self.describe(args),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => output.status.to_string(),
                msg => msg.to_string(),
            };
            return Err(Error::ToolInvocation {
                command: self.describe(args),
                reason,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Pick the bundled program if it exists, else the first match on `search_path`
fn find_program(bundled: Option<&Path>, search_path: &[PathBuf]) -> Option<PathBuf> {
    if let Some(bundled) = bundled {
        if bundled.is_file() {
            return Some(bundled.to_path_buf());
        }
    }

    search_path
        .iter()
        .map(|dir| dir.join(TOOL_NAME))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_program_prefers_bundled() {
        let bundle = TempDir::new().unwrap();
        let path_dir = TempDir::new().unwrap();
        let bundled = bundle.path().join(TOOL_NAME);
        std::fs::write(&bundled, "").unwrap();
        std::fs::write(path_dir.path().join(TOOL_NAME), "").unwrap();

        let found = find_program(Some(&bundled), &[path_dir.path().to_path_buf()]);
        assert_eq!(found, Some(bundled));
    }

    #[test]
    fn test_find_program_searches_path_in_order() {
        let empty = TempDir::new().unwrap();
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::write(first.path().join(TOOL_NAME), "").unwrap();
        std::fs::write(second.path().join(TOOL_NAME), "").unwrap();

        let missing_bundle = empty.path().join(TOOL_NAME);
        let found = find_program(
            Some(&missing_bundle),
            &[
                empty.path().to_path_buf(),
                first.path().to_path_buf(),
                second.path().to_path_buf(),
            ],
        );
        assert_eq!(found, Some(first.path().join(TOOL_NAME)));
    }

    #[test]
    fn test_find_program_none() {
        let empty = TempDir::new().unwrap();
        assert_eq!(find_program(None, &[empty.path().to_path_buf()]), None);
    }

    #[test]
    fn test_missing_program_is_invocation_error() {
        let dir = TempDir::new().unwrap();
        let tool = Blueutil::new(dir.path().join("no-such-blueutil"));
        let err = tool.run(&["--paired"]).unwrap_err();
        assert!(matches!(err, Error::ToolInvocation { .. }));
        assert!(err.to_string().contains("--paired"));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_invocation_error() {
        let tool = Blueutil::new("false");
        assert!(matches!(
            tool.run(&[]),
            Err(Error::ToolInvocation { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_is_returned() {
        let tool = Blueutil::new("echo");
        assert_eq!(tool.run(&["1"]).unwrap(), "1\n");
    }
}
