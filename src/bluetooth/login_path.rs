//! Capture the user's login shell PATH for locating blueutil.
//!
//! A menu bar app launched from Finder or launchd inherits a bare-bones
//! environment (PATH = /usr/bin:/bin:/usr/sbin:/sbin), which misses Homebrew.
//! This runs the user's login shell once to read the PATH it would set up.

use std::time::Duration;
use tracing::{info, warn};

/// Upper bound on how long the login shell may take
const LOGIN_SHELL_TIMEOUT: Duration = Duration::from_secs(5);

/// Run `$SHELL -l -c '/usr/bin/env -0'` and return its PATH entry.
///
/// Returns `None` on any failure; callers fall back to the process PATH.
#[cfg(unix)]
pub fn resolve_login_path() -> Option<String> {
    use std::process::{Command, Stdio};
    use std::sync::mpsc;

    let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
    info!("Resolving login PATH from shell: {}", shell);

    let mut child = match Command::new(&shell)
        .args(["-l", "-c", "/usr/bin/env -0"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to spawn login shell '{}': {}", shell, e);
            return None;
        }
    };

    let stdout = child.stdout.take();
    let (tx, rx) = mpsc::channel();

    // Drain stdout on a helper thread so a stuck shell cannot block us past the timeout
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut stdout) = stdout {
            use std::io::Read;
            let _ = stdout.read_to_end(&mut buf);
        }
        let status = child.wait();
        let _ = tx.send((status, buf));
    });

    match rx.recv_timeout(LOGIN_SHELL_TIMEOUT) {
        Ok((Ok(status), data)) if status.success() => {
            let path = path_from_env_dump(&data);
            if path.is_none() {
                warn!("Login shell produced no PATH");
            }
            path
        }
        Ok((Ok(status), _)) => {
            warn!("Login shell '{}' exited with status: {}", shell, status);
            None
        }
        Ok((Err(e), _)) => {
            warn!("Login shell '{}' wait failed: {}", shell, e);
            None
        }
        Err(_) => {
            warn!("Login shell '{}' timed out after {:?}", shell, LOGIN_SHELL_TIMEOUT);
            None
        }
    }
}

#[cfg(not(unix))]
pub fn resolve_login_path() -> Option<String> {
    None
}

/// Extract PATH from NUL-delimited `env -0` output
fn path_from_env_dump(data: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(data);
    text.split('\0')
        .filter_map(|entry| entry.split_once('='))
        .find(|(key, _)| *key == "PATH")
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_from_env_dump() {
        let data = b"HOME=/Users/me\0PATH=/opt/homebrew/bin:/usr/bin\0LANG=en_US.UTF-8\0";
        assert_eq!(
            path_from_env_dump(data).as_deref(),
            Some("/opt/homebrew/bin:/usr/bin")
        );
    }

    #[test]
    fn test_path_value_may_contain_equals() {
        let data = b"PATH=/a=b:/c\0";
        assert_eq!(path_from_env_dump(data).as_deref(), Some("/a=b:/c"));
    }

    #[test]
    fn test_missing_or_empty_path() {
        assert_eq!(path_from_env_dump(b"HOME=/Users/me\0"), None);
        assert_eq!(path_from_env_dump(b"PATH=\0"), None);
        assert_eq!(path_from_env_dump(b""), None);
    }
}
