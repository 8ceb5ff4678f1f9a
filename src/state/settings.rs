//! CLI configuration as edited on the Settings tab.

/// Tunnel mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VpnMode {
    #[default]
    Tun,
    Socks,
}

impl VpnMode {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "TUN" => Some(Self::Tun),
            "SOCKS" | "SOCKS5" => Some(Self::Socks),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_arg(self) -> &'static str {
        match self {
            Self::Tun => "TUN",
            Self::Socks => "SOCKS",
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Tun => Self::Socks,
            Self::Socks => Self::Tun,
        }
    }
}

/// CLI update channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UpdateChannel {
    #[default]
    Release,
    Beta,
    Nightly,
}

impl UpdateChannel {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "release" => Some(Self::Release),
            "beta" => Some(Self::Beta),
            "nightly" => Some(Self::Nightly),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_arg(self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Beta => "beta",
            Self::Nightly => "nightly",
        }
    }

    /// Cycle: release → beta → nightly → release
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Release => Self::Beta,
            Self::Beta => Self::Nightly,
            Self::Nightly => Self::Release,
        }
    }
}

/// Editable settings form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub vpn_mode: VpnMode,
    pub socks_host: String,
    pub socks_port: String,
    pub dns_server: String,
    pub update_channel: UpdateChannel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vpn_mode: VpnMode::Tun,
            socks_host: "127.0.0.1".to_string(),
            socks_port: "1080".to_string(),
            dns_server: String::new(),
            update_channel: UpdateChannel::Release,
        }
    }
}

impl Settings {
    /// One `config set-*` argument list per field that differs from `applied`.
    ///
    /// Empty port, host and DNS values are never written.
    #[must_use]
    pub fn changes_from(&self, applied: &Self) -> Vec<Vec<String>> {
        let mut commands = Vec::new();
        let set = |key: &str, value: &str| vec!["config".to_string(), key.to_string(), value.to_string()];

        if self.vpn_mode != applied.vpn_mode {
            commands.push(set("set-mode", self.vpn_mode.as_arg()));
        }
        let port = self.socks_port.trim();
        if !port.is_empty() && port != applied.socks_port.trim() {
            commands.push(set("set-socks-port", port));
        }
        let host = self.socks_host.trim();
        if !host.is_empty() && host != applied.socks_host.trim() {
            commands.push(set("set-socks-host", host));
        }
        let dns = self.dns_server.trim();
        if !dns.is_empty() && dns != applied.dns_server.trim() {
            commands.push(set("set-dns", dns));
        }
        if self.update_channel != applied.update_channel {
            commands.push(set("set-update-channel", self.update_channel.as_arg()));
        }
        commands
    }

    /// Error message for a port that is set but not a valid TCP port.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        let port = self.socks_port.trim();
        if port.is_empty() {
            return None;
        }
        match port.parse::<u16>() {
            Ok(p) if p > 0 => None,
            _ => Some(format!("Invalid SOCKS port '{port}'")),
        }
    }
}

/// Focusable row of the settings form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SettingsField {
    #[default]
    Mode,
    SocksPort,
    SocksHost,
    Dns,
    Channel,
}

impl SettingsField {
    pub const ALL: [Self; 5] = [
        Self::Mode,
        Self::SocksPort,
        Self::SocksHost,
        Self::Dns,
        Self::Channel,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mode => "VPN mode",
            Self::SocksPort => "SOCKS port",
            Self::SocksHost => "SOCKS host",
            Self::Dns => "DNS server",
            Self::Channel => "Update channel",
        }
    }

    /// Free-text fields are edited in place; the others cycle.
    #[must_use]
    pub const fn is_text(self) -> bool {
        matches!(self, Self::SocksPort | Self::SocksHost | Self::Dns)
    }

    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn previous(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}
