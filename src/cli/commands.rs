//! Headless subcommands.
//!
//! Each runs one query against the wrapped CLI, prints a plain-text result
//! and exits without starting the TUI.

use std::fmt::Write as _;
use std::path::Path;

use color_eyre::Result;

use crate::cli::args::Commands;
use crate::config::{AppConfig, ConfigDirSource};
use crate::constants;
use crate::core::interpreter::{self, StatusReport};
use crate::core::locator::{self, Resolution};
use crate::core::runner::{CliRunner, CommandRunner};
use crate::core::system;
use crate::state::{sort_locations, LocationColumn, LocationEntry, SortOrder};

/// Everything `main` resolved before dispatching.
pub struct Context<'a> {
    pub config_dir: &'a Path,
    pub config_source: ConfigDirSource,
    pub config: &'a AppConfig,
    pub resolution: &'a Resolution,
}

/// Run a headless subcommand.
///
/// # Errors
///
/// Returns the CLI failure when the wrapped command does not succeed.
pub fn handle_command(command: &Commands, ctx: &Context<'_>) -> Result<()> {
    let runner = CliRunner::new(ctx.resolution.path.clone());
    match command {
        Commands::Locate => {
            print_locate(ctx.resolution);
            Ok(())
        }
        Commands::Status => {
            let output = runner.run(&["status".to_string()])?;
            print!("{}", format_status(&interpreter::parse_status(&output.stdout)));
            Ok(())
        }
        Commands::Locations => {
            let output = runner.run(&["list-locations".to_string()])?;
            let mut entries = interpreter::parse_locations(&output.stdout);
            sort_locations(&mut entries, LocationColumn::Ping, SortOrder::Ascending);
            print!("{}", format_locations(&entries));
            Ok(())
        }
        Commands::Info => {
            print_info(ctx, &runner);
            Ok(())
        }
    }
}

fn print_locate(resolution: &Resolution) {
    println!("{}", resolution.path.display());
    println!("  found via: {}", resolution.source.describe());
    if !resolution.found() {
        eprintln!(
            "  {} is not installed in any known location",
            constants::CLI_BINARY_NAME
        );
    }
}

fn format_status(report: &StatusReport) -> String {
    match report {
        StatusReport::Disconnected => "Status:    Disconnected\n".to_string(),
        StatusReport::Connected {
            location,
            protocol,
            interface,
        } => {
            let mut out = String::from("Status:    Connected\n");
            let _ = writeln!(out, "Location:  {location}");
            if interface.is_empty() {
                let _ = writeln!(out, "Protocol:  {protocol}");
            } else {
                let _ = writeln!(out, "Protocol:  {protocol} ({interface})");
            }
            out
        }
    }
}

fn format_locations(entries: &[LocationEntry]) -> String {
    if entries.is_empty() {
        return format!("{}\n", constants::MSG_NO_LOCATIONS);
    }
    let country_width = entries
        .iter()
        .map(|e| e.country.chars().count())
        .max()
        .unwrap_or(0)
        .max("COUNTRY".len());
    let city_width = entries
        .iter()
        .map(|e| e.city.chars().count())
        .max()
        .unwrap_or(0)
        .max("CITY".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<country_width$} {:<city_width$} PING",
        "ISO", "COUNTRY", "CITY"
    );
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<4} {:<country_width$} {:<city_width$} {}",
            entry.iso_code, entry.country, entry.city, entry.ping
        );
    }
    out
}

fn print_info(ctx: &Context<'_>, runner: &dyn CommandRunner) {
    let probe = match locator::probe(runner) {
        Ok(version) => version,
        Err(err) => format!("FAILED ({err})"),
    };
    let config_file = ctx.config_dir.join(constants::CONFIG_FILE_NAME);
    let config_status = if config_file.is_file() {
        "found"
    } else {
        "not found (using defaults)"
    };

    println!("{} Diagnostics", constants::APP_NAME);
    println!("==================\n");
    println!("  Version:      {}", constants::APP_VERSION);
    println!(
        "  OS:           {} ({})",
        system::os_info(),
        std::env::consts::ARCH
    );
    if crate::utils::is_root() {
        println!("  Running as:   root");
    } else {
        println!("  Running as:   user");
    }

    println!("\n  AdGuard VPN CLI:");
    println!("    Path:        {}", ctx.resolution.path.display());
    println!("    Found via:   {}", ctx.resolution.source.describe());
    println!("    Probe:       {probe}");

    println!("\n  Config:");
    println!(
        "    Directory:   {} ({})",
        ctx.config_dir.display(),
        ctx.config_source.describe()
    );
    println!("    config.toml: {config_status}");
    println!("\n  Effective settings:");
    for line in ctx.config.to_toml().lines() {
        println!("    {line}");
    }
    println!();
}
