//! Error taxonomy for talking to the wrapped CLI.
//!
//! None of these are fatal to the process. Parse misses are not errors and
//! never show up here.

use std::path::PathBuf;
use std::time::Duration;

/// Failure while locating, probing, or invoking the VPN CLI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No executable resolved from any source.
    #[error("AdGuard VPN CLI executable not found")]
    ExecutableNotFound,
    /// The executable exists but cannot be run by us.
    #[error("Permission denied for {}: {detail}", path.display())]
    PermissionDenied { path: PathBuf, detail: String },
    /// The CLI reported the session is not authenticated.
    #[error("Not logged in: {detail}")]
    NotLoggedIn { detail: String },
    /// Non-zero exit status.
    #[error("Command error ({code}): {stderr}")]
    CommandFailed { code: i32, stderr: String },
    /// The time budget ran out and the process was killed.
    #[error("Command timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
    /// The process could not be started at all.
    #[error("Error executing command: {0}")]
    Spawn(String),
    /// Every public IP service failed.
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),
}

impl Error {
    /// True when the failure should clear the logged-in flag.
    #[must_use]
    pub const fn is_not_logged_in(&self) -> bool {
        matches!(self, Self::NotLoggedIn { .. })
    }

    /// Text used when matching failure hints and success phrases.
    #[must_use]
    pub fn detail_text(&self) -> String {
        match self {
            Self::NotLoggedIn { detail } => detail.clone(),
            Self::CommandFailed { stderr, .. } => format!("Error: {stderr}"),
            other => format!("Error: {other}"),
        }
    }
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, Error>;
