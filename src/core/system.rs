//! Host system probes: interface addresses, the process table, OS details.

use std::path::Path;
use std::process::Command;

use crate::core::interpreter;

/// Trimmed stdout of a successful command.
fn cmd_stdout(cmd: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(cmd).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// IPv4 address configured on `interface`, via `ip addr show`.
#[must_use]
pub fn interface_ipv4(interface: &str) -> Option<String> {
    if interface.is_empty() {
        return None;
    }
    let out = cmd_stdout("ip", &["addr", "show", interface])?;
    interpreter::parse_interface_ipv4(&out)
}

/// `ps -A` lists a process whose command name is the executable's file name.
///
/// `None` when the process table could not be read.
#[must_use]
pub fn cli_process_running(executable: &Path) -> Option<bool> {
    let name = executable.file_name()?.to_string_lossy().into_owned();
    let table = cmd_stdout("ps", &["-A"])?;
    Some(process_table_contains(&table, &name))
}

/// True when any `ps -A` row runs `name` (or a path to it).
///
/// Linux prints the bare command name while macOS prints the whole command
/// line, so every word from the CMD column onward is compared.
#[must_use]
pub fn process_table_contains(table: &str, name: &str) -> bool {
    // ps truncates command names to 15 characters on Linux.
    let truncated: String = name.chars().take(15).collect();
    table.lines().skip(1).any(|line| {
        line.split_whitespace().skip(3).any(|word| {
            let base = word.rsplit('/').next().unwrap_or(word);
            base == name || base == truncated
        })
    })
}

/// Human-readable OS name and kernel.
#[must_use]
pub fn os_info() -> String {
    let kernel = cmd_stdout("uname", &["-r"]).unwrap_or_default();

    #[cfg(target_os = "linux")]
    let name = linux_distro_name().unwrap_or_else(|| "Linux".to_string());
    #[cfg(target_os = "macos")]
    let name = cmd_stdout("sw_vers", &["-productVersion"])
        .map_or_else(|| "macOS".to_string(), |v| format!("macOS {v}"));
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    let name = std::env::consts::OS.to_string();

    if kernel.is_empty() {
        name
    } else {
        format!("{name} (kernel {kernel})")
    }
}

#[cfg(target_os = "linux")]
fn linux_distro_name() -> Option<String> {
    let content = std::fs::read_to_string("/etc/os-release").ok()?;
    content
        .lines()
        .find_map(|line| line.strip_prefix("PRETTY_NAME="))
        .map(|value| value.trim_matches('"').to_string())
}
