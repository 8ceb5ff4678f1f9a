//! IP address discovery for an established tunnel.
//!
//! Sources are tried in order until one yields an address: the tunnel
//! interface, the CLI config dump, verbose status output, then public JSON
//! services over HTTPS.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::constants;
use crate::core::interpreter;
use crate::core::runner::CommandRunner;
use crate::core::system;
use crate::error::{Error, Result};
use crate::logger;

/// Where an address was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IpSource {
    Interface(String),
    ConfigDump,
    VerboseStatus,
    Service(String),
}

impl std::fmt::Display for IpSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interface(name) => write!(f, "interface {name}"),
            Self::ConfigDump => write!(f, "config show"),
            Self::VerboseStatus => write!(f, "status --verbose"),
            Self::Service(url) => write!(f, "{url}"),
        }
    }
}

/// Run the full cascade.
///
/// # Errors
///
/// [`Error::NetworkUnavailable`] when every source came up empty.
pub fn discover(
    runner: &dyn CommandRunner,
    interface: &str,
    services: &[String],
    timeout: Duration,
) -> Result<(String, IpSource)> {
    discover_with(runner, interface, system::interface_ipv4, || {
        fetch_public_ip(services, timeout)
    })
}

fn discover_with(
    runner: &dyn CommandRunner,
    interface: &str,
    interface_lookup: impl Fn(&str) -> Option<String>,
    http_lookup: impl FnOnce() -> Result<(String, String)>,
) -> Result<(String, IpSource)> {
    if !interface.is_empty() {
        if let Some(ip) = interface_lookup(interface) {
            return Ok((ip, IpSource::Interface(interface.to_string())));
        }
    }

    let args = |list: &[&str]| list.iter().map(ToString::to_string).collect::<Vec<_>>();
    if let Ok(out) = runner.run_quiet(&args(&["config", "show"])) {
        if let Some(ip) = interpreter::parse_ip_label(&out.stdout) {
            return Ok((ip, IpSource::ConfigDump));
        }
    }
    if let Ok(out) = runner.run_quiet(&args(&["status", "--verbose"])) {
        if let Some(ip) = interpreter::find_ipv4(&out.stdout) {
            return Ok((ip, IpSource::VerboseStatus));
        }
    }

    let (ip, url) = http_lookup()?;
    Ok((ip, IpSource::Service(url)))
}

/// Ask each JSON service in turn.
///
/// Returns the address and the URL that answered.
///
/// # Errors
///
/// [`Error::NetworkUnavailable`] when no service answered with an address.
pub fn fetch_public_ip(services: &[String], timeout: Duration) -> Result<(String, String)> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(format!("{}/{}", constants::APP_NAME, constants::APP_VERSION))
        .build()
        .map_err(|e| Error::NetworkUnavailable(e.to_string()))?;

    let mut last_error = "no services configured".to_string();
    for url in services {
        match fetch_one(&client, url) {
            Ok(ip) => return Ok((ip, url.clone())),
            Err(e) => {
                logger::warn("NET", &format!("{url}: {e}"));
                last_error = e;
            }
        }
    }
    Err(Error::NetworkUnavailable(last_error))
}

fn fetch_one(client: &Client, url: &str) -> std::result::Result<String, String> {
    let response = client.get(url).send().map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }
    let body: serde_json::Value = response.json().map_err(|e| e.to_string())?;
    interpreter::ip_from_service_json(&body).ok_or_else(|| "no ip field in response".to_string())
}
