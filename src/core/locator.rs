//! Locating and probing the `adguardvpn-cli` executable.

use std::path::{Path, PathBuf};

use crate::constants;
use crate::core::interpreter;
use crate::core::runner::CommandRunner;
use crate::error::{Error, Result};
use crate::logger;
use crate::state::LocateSource;
use crate::utils;

/// Result of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub path: PathBuf,
    pub source: LocateSource,
}

impl Resolution {
    /// False when nothing matched and the default path was assumed.
    #[must_use]
    pub fn found(&self) -> bool {
        self.source != LocateSource::Fallback
    }
}

/// Ordered search for the CLI.
///
/// Order: explicit override, conventional install locations, next to our
/// own binary, `PATH`, then [`constants::CLI_FALLBACK_PATH`].
#[derive(Clone, Debug)]
pub struct Locator {
    override_path: Option<PathBuf>,
    candidates: Vec<PathBuf>,
    app_dir: Option<PathBuf>,
    binary_name: String,
}

impl Locator {
    #[must_use]
    pub fn new(override_path: Option<PathBuf>) -> Self {
        let app_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(constants::CLI_BINARY_NAME)));
        Self {
            override_path,
            candidates: constants::CLI_CANDIDATE_PATHS
                .iter()
                .map(|p| utils::expand_home(p))
                .collect(),
            app_dir,
            binary_name: constants::CLI_BINARY_NAME.to_string(),
        }
    }

    /// Replace the install locations, app-dir entry, and PATH name.
    #[must_use]
    pub fn with_search(mut self, candidates: Vec<PathBuf>, app_dir: Option<PathBuf>, binary_name: &str) -> Self {
        self.candidates = candidates;
        self.app_dir = app_dir;
        self.binary_name = binary_name.to_string();
        self
    }

    /// Resolve the executable. Never fails; see [`Resolution::found`].
    #[must_use]
    pub fn locate(&self) -> Resolution {
        if let Some(path) = &self.override_path {
            logger::info("CLI", &format!("Checking override: {}", path.display()));
            if utils::is_executable(path) {
                return resolved(path.clone(), LocateSource::Override);
            }
            logger::warn("CLI", &format!("Override {} is not an executable file", path.display()));
        }

        for path in &self.candidates {
            logger::info("CLI", &format!("Checking: {}", path.display()));
            if utils::is_executable(path) {
                return resolved(path.clone(), LocateSource::Candidate);
            }
        }

        if let Some(path) = &self.app_dir {
            logger::info("CLI", &format!("Checking: {}", path.display()));
            if utils::is_executable(path) {
                return resolved(path.clone(), LocateSource::AppDir);
            }
        }

        logger::info("CLI", &format!("Checking PATH for {}", self.binary_name));
        if let Ok(path) = which::which(&self.binary_name) {
            return resolved(path, LocateSource::Path);
        }

        logger::warn(
            "CLI",
            &format!(
                "Executable not found, using default {}",
                constants::CLI_FALLBACK_PATH
            ),
        );
        Resolution {
            path: PathBuf::from(constants::CLI_FALLBACK_PATH),
            source: LocateSource::Fallback,
        }
    }
}

fn resolved(path: PathBuf, source: LocateSource) -> Resolution {
    logger::info(
        "CLI",
        &format!("Found executable at {} ({})", path.display(), source.describe()),
    );
    Resolution { path, source }
}

/// Accept a user-chosen path if it is an executable file.
///
/// # Errors
///
/// [`Error::ExecutableNotFound`] for a missing path,
/// [`Error::PermissionDenied`] for a file without execute permission.
pub fn validate_selection(raw: &str) -> Result<PathBuf> {
    let path = utils::expand_home(raw.trim());
    if !path.is_file() {
        return Err(Error::ExecutableNotFound);
    }
    if !utils::is_executable(&path) {
        return Err(Error::PermissionDenied {
            path,
            detail: "file is not executable".to_string(),
        });
    }
    Ok(path)
}

/// Check the executable can actually run: file present, execute bit set,
/// and `--version` exiting 0 within the probe budget.
///
/// Returns the first line of the version output.
///
/// # Errors
///
/// [`Error::PermissionDenied`] with the reason in `detail`.
pub fn probe(runner: &dyn CommandRunner) -> Result<String> {
    let path = runner.executable().to_path_buf();
    let denied = |detail: String| Error::PermissionDenied {
        path: path.clone(),
        detail,
    };

    if !Path::new(&path).exists() {
        return Err(denied("executable does not exist".to_string()));
    }
    if !utils::is_executable(&path) {
        return Err(denied("execute permission missing".to_string()));
    }
    let output = runner
        .run_with_timeout(&["--version".to_string()], constants::PERMISSION_PROBE_TIMEOUT)
        .map_err(|e| denied(e.to_string()))?;
    Ok(interpreter::first_line(&output.stdout).unwrap_or_else(|| constants::MSG_UNKNOWN.to_string()))
}
