//! Small filesystem and platform helpers.

use std::path::{Path, PathBuf};

/// Current user's home directory.
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Expand a leading `~/` to the home directory.
#[must_use]
pub fn expand_home(path_str: &str) -> PathBuf {
    if let Some(stripped) = path_str.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path_str)
}

/// Regular file with at least one execute bit set.
#[cfg(unix)]
#[must_use]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

/// Regular file; execute permission is not modelled outside unix.
#[cfg(not(unix))]
#[must_use]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Whether we run with an effective UID of 0.
#[cfg(unix)]
#[must_use]
pub fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    #[allow(unsafe_code)]
    unsafe {
        libc::geteuid() == 0
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_root() -> bool {
    false
}

/// Open a URL in the user's browser.
///
/// # Errors
///
/// Returns the launcher's error text.
pub fn open_link(url: &str) -> Result<(), String> {
    open::that(url).map_err(|e| e.to_string())
}
