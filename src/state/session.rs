//! Session facts about the wrapped CLI.

use std::path::PathBuf;

/// Where the executable path came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocateSource {
    /// `--cli`, `ADGUARDVPN_CLI`, or `cli_path` in the config file.
    Override,
    /// One of the conventional install locations.
    Candidate,
    /// Next to our own binary.
    AppDir,
    /// Resolved from `PATH`.
    Path,
    /// Chosen by the user at runtime.
    Manual,
    /// Nothing matched; default path assumed.
    Fallback,
}

impl LocateSource {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Override => "explicit override",
            Self::Candidate => "install location",
            Self::AppDir => "application directory",
            Self::Path => "PATH lookup",
            Self::Manual => "manual selection",
            Self::Fallback => "default (not found)",
        }
    }
}

/// State the controller keeps about the CLI and the account.
///
/// Owned by `App`; only its transition functions write it.
#[derive(Clone, Debug)]
pub struct Session {
    pub executable: PathBuf,
    pub source: LocateSource,
    pub logged_in: bool,
    /// `Some(reason)` when the startup probe found the CLI unusable.
    pub permission_problem: Option<String>,
    /// First line of `--version`.
    pub cli_version: Option<String>,
}

impl Session {
    #[must_use]
    pub const fn new(executable: PathBuf, source: LocateSource) -> Self {
        Self {
            executable,
            source,
            logged_in: false,
            permission_problem: None,
            cli_version: None,
        }
    }
}
