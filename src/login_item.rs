//! Launch-at-login via a launchd user agent
//!
//! The plist under `~/Library/LaunchAgents` is the only state: if the file
//! exists, launch at login is on. launchd picks it up at the next login.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// launchd label and plist file stem
pub const AGENT_LABEL: &str = "org.rc6.macbuds";

/// Registration of one executable as a login item
#[derive(Debug, Clone)]
pub struct LoginItem {
    plist_path: PathBuf,
    program: PathBuf,
}

impl LoginItem {
    /// Login item for the running executable in the user's LaunchAgents folder
    pub fn for_current_exe() -> Result<Self> {
        let home = dirs::home_dir().ok_or(Error::NoHomeDir)?;
        let plist_path = home
            .join("Library")
            .join("LaunchAgents")
            .join(format!("{}.plist", AGENT_LABEL));
        let program = std::env::current_exe().map_err(|source| Error::LoginItem {
            path: plist_path.clone(),
            source,
        })?;
        Ok(Self::new(plist_path, program))
    }

    pub fn new(plist_path: impl Into<PathBuf>, program: impl Into<PathBuf>) -> Self {
        Self {
            plist_path: plist_path.into(),
            program: program.into(),
        }
    }

    pub fn plist_path(&self) -> &Path {
        &self.plist_path
    }

    pub fn is_enabled(&self) -> bool {
        self.plist_path.exists()
    }

    /// Write the plist, creating the LaunchAgents folder if needed
    pub fn enable(&self) -> Result<()> {
        if let Some(dir) = self.plist_path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| self.error(e))?;
        }
        std::fs::write(&self.plist_path, self.plist()).map_err(|e| self.error(e))?;
        info!("Launch at login enabled: {:?}", self.plist_path);
        Ok(())
    }

    /// Remove the plist; already absent is fine
    pub fn disable(&self) -> Result<()> {
        match std::fs::remove_file(&self.plist_path) {
            Ok(()) => {
                info!("Launch at login disabled: {:?}", self.plist_path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.error(e)),
        }
    }

    /// Flip the registration and return the new state
    pub fn toggle(&self) -> Result<bool> {
        if self.is_enabled() {
            self.disable()?;
            Ok(false)
        } else {
            self.enable()?;
            Ok(true)
        }
    }

    fn plist(&self) -> String {
        let program = xml_escape(&self.program.to_string_lossy());
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{AGENT_LABEL}</string>
    <key>ProgramArguments</key>
    <array>
        <string>{program}</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
    <key>KeepAlive</key>
    <false/>
</dict>
</plist>
"#
        )
    }

    fn error(&self, source: std::io::Error) -> Error {
        Error::LoginItem {
            path: self.plist_path.clone(),
            source,
        }
    }
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
