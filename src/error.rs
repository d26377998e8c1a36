//! Error types shared by the library modules

use std::path::PathBuf;
use thiserror::Error;

/// Boxed source error for config persistence (I/O or JSON)
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum Error {
    /// blueutil could not be spawned or exited with a non-zero status
    #[error("{command} failed: {reason}")]
    ToolInvocation { command: String, reason: String },

    /// `--paired` produced no parseable device lines
    #[error("no paired devices found")]
    NoDevicesFound,

    #[error("failed to load config {path:?}: {source}")]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: BoxedSource,
    },

    #[error("failed to save config {path:?}: {source}")]
    ConfigSave {
        path: PathBuf,
        #[source]
        source: BoxedSource,
    },

    /// The user dismissed a picker or entry dialog
    #[error("dialog canceled")]
    DialogCanceled,

    #[error("dialog failed: {0}")]
    Dialog(String),

    #[error("login item {path:?}: {source}")]
    LoginItem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not determine the user config directory")]
    NoConfigDir,

    #[error("could not determine the home directory")]
    NoHomeDir,
}

impl Error {
    /// Whether this error only reflects a user dismissing a dialog
    pub fn is_canceled(&self) -> bool {
        matches!(self, Error::DialogCanceled)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
