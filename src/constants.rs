//! Application-wide constants and configuration values.
//!
//! This module defines the static values used throughout the app, including
//! timing intervals, the executable search list, public IP endpoints, and the
//! phrases the wrapped CLI prints that we react to.

use std::time::Duration;

// === Application Metadata ===

/// Application name (from Cargo.toml).
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
/// Current application version (from Cargo.toml).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Short technical summary of the application (from Cargo.toml).
pub const APP_SUMMARY: &str = env!("CARGO_PKG_DESCRIPTION");

/// Project links shown on the About tab.
pub const LINK_WEBSITE: &str = "https://adguard-vpn.com";
pub const LINK_CLI_REPO: &str = "https://github.com/AdguardTeam/AdguardVPNCLI";

// === Timing Configuration ===

/// UI refresh rate in milliseconds.
pub const DEFAULT_TICK_RATE: u64 = 250;
/// Interval between background status polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
/// Delay before the follow-up status query after a successful connect.
pub const DEFAULT_CONNECT_REFRESH_DELAY_SECS: u64 = 2;
/// Time budget for the `--version` permission probe.
pub const PERMISSION_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
/// How long info/success toasts stay on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);
/// Maximum number of entries kept by the in-memory log.
pub const MAX_LOG_ENTRIES: usize = 1000;
/// Log files above this size are rotated.
pub const LOG_ROTATE_BYTES: u64 = 5 * 1024 * 1024;

// === Path Configuration ===

/// Name of the app config directory under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "adguard-tui";
/// Name of the config file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Name of the logs subdirectory.
pub const LOGS_DIR_NAME: &str = "logs";
/// Environment variable overriding the config directory.
pub const ENV_CONFIG_DIR: &str = "ADGUARD_TUI_CONFIG_DIR";
/// Environment variable overriding the CLI executable.
pub const ENV_CLI_PATH: &str = "ADGUARDVPN_CLI";

// === Wrapped CLI ===

/// Executable name looked up on PATH.
pub const CLI_BINARY_NAME: &str = "adguardvpn-cli";
/// Conventional install locations, tried in order. `~/` is expanded.
pub const CLI_CANDIDATE_PATHS: [&str; 5] = [
    "/usr/bin/adguardvpn-cli",
    "/usr/local/bin/adguardvpn-cli",
    "/opt/adguardvpn_cli/adguardvpn-cli",
    "~/.local/bin/adguardvpn-cli",
    "/usr/bin/adguardvpn",
];
/// Path used when nothing else resolves.
pub const CLI_FALLBACK_PATH: &str = "/usr/bin/adguardvpn-cli";
/// Default target for `export-logs`.
pub const DEFAULT_EXPORT_PATH: &str = "~/adguardvpn-logs.zip";

// === Telemetry API Endpoints ===

/// Public IP services returning JSON with an `ip` or `origin` field.
pub const IP_SERVICES: [&str; 3] = [
    "https://api.ipify.org/?format=json",
    "https://httpbin.org/ip",
    "https://api.myip.com",
];
/// Per-attempt timeout for public IP services in seconds.
pub const IP_LOOKUP_TIMEOUT_SECS: u64 = 3;

// === CLI Output Phrases ===

pub const PHRASE_MUST_LOG_IN: &str = "you must log in";
pub const PHRASE_NOT_LOGGED_IN: &str = "you are not logged in";
pub const PHRASE_VPN_DISCONNECTED: &str = "VPN is disconnected";
pub const PHRASE_LOGGED_IN: &str = "successfully logged in";
pub const PHRASE_ALREADY_LOGGED_IN: &str = "you are already logged in";
pub const PHRASE_LOGGED_OUT: &str = "successfully logged out";
pub const PHRASE_UPDATE_AVAILABLE: &str = "update available";
pub const LABEL_EXCLUSION_MODE: &str = "Exclusion mode:";
pub const LABEL_SITE_EXCLUSIONS: &str = "Site exclusions:";
pub const LABEL_VPN_MODE: &str = "VPN mode:";
pub const LABEL_SOCKS_PORT: &str = "SOCKS port:";
pub const LABEL_SOCKS_HOST: &str = "SOCKS host:";
pub const LABEL_DNS_SERVER: &str = "DNS server:";
pub const LABEL_UPDATE_CHANNEL: &str = "Update channel:";

// === UI Messages ===

/// Location placeholder when the CLI reports a blank location.
pub const MSG_UNKNOWN_LOCATION: &str = "Unknown location";
pub const MSG_NOT_CONNECTED: &str = "Not connected";
pub const MSG_DETECTING: &str = "Detecting...";
pub const MSG_IP_UNAVAILABLE: &str = "IP not available";
pub const MSG_UNKNOWN: &str = "Unknown";
pub const MSG_LOADING_LOCATIONS: &str = "Loading locations...";
pub const MSG_NO_LOCATIONS: &str = "No locations found or not logged in";
pub const MSG_LOADING_EXCLUSIONS: &str = "Loading exclusions...";
pub const MSG_NO_EXCLUSIONS: &str = "No exclusions set";
pub const MSG_EXCLUSIONS_UNAVAILABLE: &str = "Could not retrieve exclusions";
pub const MSG_NOT_LOGGED_IN: &str = "Not logged in. Please log in first.";
pub const MSG_CONNECT_IN_PROGRESS: &str = "Connection in progress...";
pub const MSG_CONNECT_FAILED: &str = "Failed to connect to VPN.";
pub const HINT_PRIVILEGES: &str =
    "This may be a permissions issue. Try running the application with sudo or from the terminal.";
pub const HINT_SERVICE: &str = "Failed to start the VPN process. The VPN service may not be installed or may require elevated privileges.";
pub const MSG_LOGIN_REQUIRED_FIELDS: &str = "Username and password are required";
pub const MSG_LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
pub const MSG_LOGGING_IN: &str = "Logging in...";
pub const MSG_LOGIN_PROMPT: &str = "You need to log in to use AdGuard VPN. Would you like to log in now?";
pub const MSG_EXECUTABLE_NOT_FOUND: &str = "AdGuard VPN CLI executable was not found in common locations. Would you like to select it manually?";
pub const MSG_PERMISSION_WARNING: &str = "The application may not have the necessary permissions to run AdGuard VPN commands. You might need to run with elevated privileges or ensure the VPN CLI has the proper permissions.";
