//! Parsers for the text the VPN CLI prints.
//!
//! Every function here is pure and total. A miss returns a sentinel
//! (`None`, [`StatusReport::Disconnected`], an empty list) instead of an
//! error, so callers never have to distinguish "unparseable" from "absent".

use std::sync::OnceLock;

use regex::Regex;

use crate::constants;
use crate::state::{ExclusionMode, ExclusionSet, LocationEntry, Ping, Settings, UpdateChannel, VpnMode};

fn ansi_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("valid ansi regex")
    })
}

fn status_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Connected to (.*?) in (.*?) mode, running on (\S*)").expect("valid status regex")
    })
}

fn ip_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:IP Address|External IP|VPN IP):\s*(\S+)").expect("valid ip label regex")
    })
}

fn dotted_quad_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("valid ipv4 regex"))
}

fn inet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"inet\s+(\d+\.\d+\.\d+\.\d+)").expect("valid inet regex"))
}

fn column_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").expect("valid column regex"))
}

/// Remove ANSI escape sequences (`ESC [ params final` and `ESC letter`).
///
/// Repeats until nothing matches, since removing one sequence can splice
/// together another (`ESC ESC[0m [0m`).
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    let mut clean = text.to_string();
    while ansi_re().is_match(&clean) {
        clean = ansi_re().replace_all(&clean, "").into_owned();
    }
    clean
}

/// Outcome of parsing `status` output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusReport {
    Connected {
        location: String,
        protocol: String,
        interface: String,
    },
    Disconnected,
}

/// Parse `status` output.
///
/// Connected only when the "Connected to ..." sentence is present and the
/// "VPN is disconnected" phrase is not. A blank location becomes
/// [`constants::MSG_UNKNOWN_LOCATION`].
#[must_use]
pub fn parse_status(text: &str) -> StatusReport {
    let clean = strip_ansi(text);
    if clean.contains(constants::PHRASE_VPN_DISCONNECTED) {
        return StatusReport::Disconnected;
    }
    let Some(caps) = status_re().captures(&clean) else {
        return StatusReport::Disconnected;
    };

    let location = caps.get(1).map_or("", |m| m.as_str().trim());
    let location = if location.is_empty() {
        constants::MSG_UNKNOWN_LOCATION.to_string()
    } else {
        location.to_string()
    };
    StatusReport::Connected {
        location,
        protocol: caps.get(2).map_or("", |m| m.as_str().trim()).to_string(),
        interface: caps.get(3).map_or("", |m| m.as_str().trim()).to_string(),
    }
}

/// `IP Address:` / `External IP:` / `VPN IP:` value from a config dump.
#[must_use]
pub fn parse_ip_label(text: &str) -> Option<String> {
    let clean = strip_ansi(text);
    ip_label_re()
        .captures(&clean)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// First dotted quad anywhere in the text.
#[must_use]
pub fn find_ipv4(text: &str) -> Option<String> {
    let clean = strip_ansi(text);
    dotted_quad_re()
        .find(&clean)
        .map(|m| m.as_str().to_string())
}

/// First `inet a.b.c.d` of `ip addr show` output.
#[must_use]
pub fn parse_interface_ipv4(text: &str) -> Option<String> {
    inet_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Address field of a public IP service response (`ip`, then `origin`).
#[must_use]
pub fn ip_from_service_json(value: &serde_json::Value) -> Option<String> {
    ["ip", "origin"]
        .iter()
        .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(ToString::to_string)
}

/// Parse `list-locations`.
///
/// Rows before a header holding both `ISO` and `COUNTRY` are ignored. After
/// it, columns are separated by two or more spaces and rows with fewer than
/// four columns are dropped.
#[must_use]
pub fn parse_locations(text: &str) -> Vec<LocationEntry> {
    let clean = strip_ansi(text);
    let mut header_found = false;
    let mut entries = Vec::new();

    for line in clean.lines() {
        if !header_found {
            header_found = line.contains("ISO") && line.contains("COUNTRY");
            continue;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let columns: Vec<&str> = column_split_re().split(line).collect();
        if columns.len() < 4 {
            continue;
        }
        entries.push(LocationEntry {
            iso_code: columns[0].to_string(),
            country: columns[1].to_string(),
            city: columns[2].to_string(),
            ping: Ping::parse(columns[3]),
        });
    }
    entries
}

/// Parse `site-exclusions show`.
#[must_use]
pub fn parse_exclusions(text: &str) -> ExclusionSet {
    let clean = strip_ansi(text);
    let mut set = ExclusionSet::default();

    for line in clean.lines() {
        if let Some((_, mode)) = line.split_once(constants::LABEL_EXCLUSION_MODE) {
            // An unrecognised mode word still counts as a mode line.
            set.mode = Some(ExclusionMode::parse(mode).unwrap_or_default());
            continue;
        }
        let site = line.trim();
        if site.is_empty() || line.contains(constants::LABEL_SITE_EXCLUSIONS) {
            continue;
        }
        set.sites.push(site.to_string());
    }
    set
}

/// Parse `config show` on top of `base`.
///
/// Only the known keys are read; anything missing or unrecognised keeps the
/// value from `base`.
#[must_use]
pub fn parse_config(text: &str, base: &Settings) -> Settings {
    let clean = strip_ansi(text);
    let mut settings = base.clone();

    for line in clean.lines() {
        if let Some(value) = labelled_value(line, constants::LABEL_VPN_MODE) {
            if let Some(mode) = VpnMode::parse(value) {
                settings.vpn_mode = mode;
            }
        } else if let Some(value) = labelled_value(line, constants::LABEL_SOCKS_PORT) {
            settings.socks_port = value.to_string();
        } else if let Some(value) = labelled_value(line, constants::LABEL_SOCKS_HOST) {
            settings.socks_host = value.to_string();
        } else if let Some(value) = labelled_value(line, constants::LABEL_DNS_SERVER) {
            settings.dns_server = value.to_string();
        } else if let Some(value) = labelled_value(line, constants::LABEL_UPDATE_CHANNEL) {
            if let Some(channel) = UpdateChannel::parse(value) {
                settings.update_channel = channel;
            }
        }
    }
    settings
}

/// Trimmed text after `label` anywhere in `line`, ignoring ASCII case.
fn labelled_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let start = line.to_ascii_lowercase().find(&label.to_ascii_lowercase())?;
    line.get(start + label.len()..).map(str::trim)
}

/// `status` output that says the VPN is down, colored or not.
#[must_use]
pub fn reports_disconnected(text: &str) -> bool {
    strip_ansi(text).contains(constants::PHRASE_VPN_DISCONNECTED)
}

/// Case-insensitive "must log in" / "not logged in" check.
#[must_use]
pub fn mentions_not_logged_in(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains(constants::PHRASE_MUST_LOG_IN) || lower.contains(constants::PHRASE_NOT_LOGGED_IN)
}

/// Connect output that counts as a failure even with exit status 0.
#[must_use]
pub fn connect_output_failed(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("error") || lower.contains("failed")
}

/// User hint for a failed connect, keyed on the failure text.
#[must_use]
pub fn connect_failure_hint(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    if ["permission", "access", "denied"]
        .iter()
        .any(|word| lower.contains(word))
    {
        Some(constants::HINT_PRIVILEGES)
    } else if lower.contains("process") {
        Some(constants::HINT_SERVICE)
    } else {
        None
    }
}

#[must_use]
pub fn login_succeeded(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains(constants::PHRASE_LOGGED_IN) || lower.contains(constants::PHRASE_ALREADY_LOGGED_IN)
}

#[must_use]
pub fn logout_succeeded(text: &str) -> bool {
    text.to_lowercase().contains(constants::PHRASE_LOGGED_OUT)
}

#[must_use]
pub fn update_available(text: &str) -> bool {
    text.to_lowercase().contains(constants::PHRASE_UPDATE_AVAILABLE)
}

/// First non-blank line, ANSI stripped. Used for `--version`.
#[must_use]
pub fn first_line(text: &str) -> Option<String> {
    strip_ansi(text)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi() {
        let colored = "\x1b[32mConnected\x1b[0m to \x1b[1mBerlin\x1b[0m\x1bM";
        assert_eq!(strip_ansi(colored), "Connected to Berlin");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn test_strip_ansi_is_idempotent() {
        let samples = [
            "\x1b[1;31mError\x1b[0m: \x1b[4mdenied\x1b[24m",
            "\x1b\x1b[0m[0m",
            "no escapes",
            "\x1b[38;5;208morange\x1b[m",
        ];
        for sample in samples {
            let once = strip_ansi(sample);
            assert_eq!(strip_ansi(&once), once, "sample {sample:?}");
        }
    }

    #[test]
    fn test_parse_status_connected() {
        let out = "\x1b[32mConnected to FRANKFURT in TUN mode, running on tun0\x1b[0m\n";
        assert_eq!(
            parse_status(out),
            StatusReport::Connected {
                location: "FRANKFURT".into(),
                protocol: "TUN".into(),
                interface: "tun0".into(),
            }
        );
    }

    #[test]
    fn test_parse_status_multiword_location() {
        let out = "Connected to New York in SOCKS mode, running on utun4 since 10:00";
        assert_eq!(
            parse_status(out),
            StatusReport::Connected {
                location: "New York".into(),
                protocol: "SOCKS".into(),
                interface: "utun4".into(),
            }
        );
    }

    #[test]
    fn test_parse_status_blank_location() {
        for out in [
            "Connected to  in TUN mode, running on tun0",
            "Connected to     in TUN mode, running on tun0",
        ] {
            match parse_status(out) {
                StatusReport::Connected { location, .. } => {
                    assert_eq!(location, constants::MSG_UNKNOWN_LOCATION);
                }
                StatusReport::Disconnected => panic!("expected connected for {out:?}"),
            }
        }
    }

    #[test]
    fn test_parse_status_disconnected_phrase_wins() {
        let out = "Connected to Berlin in TUN mode, running on tun0\nVPN is disconnected";
        assert_eq!(parse_status(out), StatusReport::Disconnected);
        assert_eq!(parse_status("VPN is disconnected"), StatusReport::Disconnected);
    }

    #[test]
    fn test_parse_status_unrecognised_is_disconnected() {
        assert_eq!(parse_status(""), StatusReport::Disconnected);
        assert_eq!(
            parse_status("Command error (1): something"),
            StatusReport::Disconnected
        );
    }

    #[test]
    fn test_ip_sources() {
        assert_eq!(
            parse_ip_label("Mode: TUN\nExternal IP: 203.0.113.7\n"),
            Some("203.0.113.7".into())
        );
        assert_eq!(parse_ip_label("VPN mode: TUN"), None);
        assert_eq!(
            find_ipv4("server 10.0.0.1 via 192.168.1.1"),
            Some("10.0.0.1".into())
        );
        assert_eq!(find_ipv4("no address"), None);

        let ip_addr = "5: tun0: <POINTOPOINT,UP>\n    inet 172.16.0.2/32 scope global tun0\n";
        assert_eq!(parse_interface_ipv4(ip_addr), Some("172.16.0.2".into()));
    }

    #[test]
    fn test_ip_from_service_json() {
        let ipify = serde_json::json!({ "ip": "198.51.100.4" });
        let httpbin = serde_json::json!({ "origin": "198.51.100.5" });
        let other = serde_json::json!({ "address": "x" });
        assert_eq!(ip_from_service_json(&ipify), Some("198.51.100.4".into()));
        assert_eq!(ip_from_service_json(&httpbin), Some("198.51.100.5".into()));
        assert_eq!(ip_from_service_json(&other), None);
    }

    #[test]
    fn test_parse_locations() {
        let out = "\x1b[1mISO   COUNTRY         CITY        PING ESTIMATE\x1b[0m\n\
                   US    United States   New York    12\n\
                   DE    Germany         Berlin      unknown\n\
                   \n\
                   broken line\n";
        let entries = parse_locations(out);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].iso_code, "US");
        assert_eq!(entries[0].country, "United States");
        assert_eq!(entries[0].city, "New York");
        assert_eq!(entries[0].ping, Ping::Millis(12));
        assert_eq!(entries[1].ping, Ping::Unknown("unknown".into()));
    }

    #[test]
    fn test_parse_locations_then_sort_by_ping() {
        let out = "ISO  COUNTRY  CITY  PING\n\
                   DE  Germany  Berlin  unknown\n\
                   US  United States  New York  12\n";
        let mut table = crate::state::LocationTable::default();
        table.replace(parse_locations(out));
        assert_eq!(table.entries[0].city, "New York");
        assert_eq!(table.entries[1].city, "Berlin");
    }

    #[test]
    fn test_parse_locations_without_header() {
        assert!(parse_locations("US  United States  New York  12").is_empty());
        assert!(parse_locations("You are not logged in").is_empty());
    }

    #[test]
    fn test_parse_exclusions() {
        let out = "Exclusion mode: selective\nexample.com\nfoo.org\n";
        let set = parse_exclusions(out);
        assert_eq!(set.mode, Some(ExclusionMode::Selective));
        assert_eq!(set.sites, ["example.com", "foo.org"]);
    }

    #[test]
    fn test_parse_exclusions_headers_and_duplicates() {
        let out = "\x1b[1mExclusion mode:\x1b[0m GENERAL\nSite exclusions:\n  a.com\n\na.com\n";
        let set = parse_exclusions(out);
        assert_eq!(set.mode, Some(ExclusionMode::General));
        assert_eq!(set.sites, ["a.com", "a.com"]);

        let none = parse_exclusions("");
        assert_eq!(none.mode, None);
        assert!(none.sites.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let out = "VPN mode: SOCKS\nSOCKS port: 9050\nSOCKS host: 0.0.0.0\n\
                   DNS server: 1.1.1.1\nUpdate channel: beta\nIrrelevant: yes\n";
        let settings = parse_config(out, &Settings::default());
        assert_eq!(settings.vpn_mode, VpnMode::Socks);
        assert_eq!(settings.socks_port, "9050");
        assert_eq!(settings.socks_host, "0.0.0.0");
        assert_eq!(settings.dns_server, "1.1.1.1");
        assert_eq!(settings.update_channel, UpdateChannel::Beta);
    }

    #[test]
    fn test_parse_config_prefixed_and_cased_labels() {
        let out = "  * vpn MODE: TUN\nCurrent SOCKS Port: 1081\n\x1b[1mDNS server:\x1b[0m 9.9.9.9\n";
        let base = Settings {
            vpn_mode: VpnMode::Socks,
            ..Settings::default()
        };
        let settings = parse_config(out, &base);
        assert_eq!(settings.vpn_mode, VpnMode::Tun);
        assert_eq!(settings.socks_port, "1081");
        assert_eq!(settings.dns_server, "9.9.9.9");
        assert_eq!(settings.socks_host, base.socks_host);
    }

    #[test]
    fn test_parse_config_keeps_base_on_miss() {
        let settings = parse_config("garbage", &Settings::default());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_reports_disconnected() {
        assert!(reports_disconnected("VPN is disconnected"));
        assert!(reports_disconnected("\x1b[31mVPN is\x1b[0m disconnected\n"));
        assert!(!reports_disconnected("Something unexpected"));
    }

    #[test]
    fn test_phrases() {
        assert!(mentions_not_logged_in("ERROR: You must log in first"));
        assert!(mentions_not_logged_in("You are NOT logged in"));
        assert!(!mentions_not_logged_in("Connected"));

        assert!(connect_output_failed("Connection FAILED"));
        assert!(connect_output_failed("error: no route"));
        assert!(!connect_output_failed("Successfully Connected to Berlin"));

        assert!(login_succeeded("Successfully logged in as bob"));
        assert!(login_succeeded("You are already logged in"));
        assert!(!login_succeeded("Invalid credentials"));
        assert!(logout_succeeded("Successfully logged out"));
        assert!(update_available("Update available: 1.2.3"));
    }

    #[test]
    fn test_connect_failure_hint() {
        assert_eq!(
            connect_failure_hint("Permission denied"),
            Some(constants::HINT_PRIVILEGES)
        );
        assert_eq!(
            connect_failure_hint("Error: access is not allowed"),
            Some(constants::HINT_PRIVILEGES)
        );
        assert_eq!(
            connect_failure_hint("Failed to start VPN process"),
            Some(constants::HINT_SERVICE)
        );
        assert_eq!(connect_failure_hint("timeout"), None);
    }

    #[test]
    fn test_first_line() {
        assert_eq!(
            first_line("\n\x1b[1mAdGuard VPN CLI 1.2.3\x1b[0m\nbuild x\n"),
            Some("AdGuard VPN CLI 1.2.3".into())
        );
        assert_eq!(first_line("  \n"), None);
    }
}
