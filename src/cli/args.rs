//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::constants;

/// AdGuard TUI - terminal front-end for the AdGuard VPN CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the adguardvpn-cli executable (skips the built-in search)
    #[arg(long, value_name = "PATH", env = constants::ENV_CLI_PATH, global = true)]
    pub cli: Option<PathBuf>,

    /// Directory holding config.toml and logs
    #[arg(long, value_name = "DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the resolved adguardvpn-cli executable and how it was found
    Locate,
    /// Query the VPN status once and print the parsed result
    Status,
    /// List VPN locations sorted by ping
    Locations,
    /// Print diagnostics: versions, OS, CLI path, permission check, config
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommand_with_global_flags() {
        let args = Args::try_parse_from(["adguard-tui", "status", "--cli", "/opt/vpn/adguardvpn-cli"])
            .expect("valid args");
        assert!(matches!(args.command, Some(Commands::Status)));
        assert_eq!(args.cli, Some(PathBuf::from("/opt/vpn/adguardvpn-cli")));
    }

    #[test]
    fn test_no_subcommand_runs_tui() {
        let args = Args::try_parse_from(["adguard-tui", "--config-dir", "/tmp/adg"]).expect("valid args");
        assert!(args.command.is_none());
        assert_eq!(args.config_dir, Some(PathBuf::from("/tmp/adg")));
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Args::try_parse_from(["adguard-tui", "import"]).is_err());
    }
}
