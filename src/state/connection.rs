//! VPN connection state types.

use std::time::Instant;

/// Fields the CLI reports about an established tunnel.
///
/// Every field is best effort: the status parser fills location, protocol and
/// interface, IP discovery fills `public_ip` later.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionDetails {
    /// Server location as printed by the CLI.
    pub location: String,
    /// Tunnel mode, e.g. `TUN` or `SOCKS`.
    pub protocol: String,
    /// System interface name (e.g. tun0).
    pub interface: String,
    /// Address found by the IP discovery cascade.
    pub public_ip: Option<String>,
}

/// What a connect action asked the CLI for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectTarget {
    /// Let the CLI pick by its own latency heuristic.
    Fastest,
    /// A city from the location table.
    Location(String),
}

impl ConnectTarget {
    /// Arguments for the wrapped CLI.
    #[must_use]
    pub fn cli_args(&self) -> Vec<String> {
        match self {
            Self::Fastest => vec!["connect".into(), "--fastest".into()],
            Self::Location(city) => vec!["connect".into(), "--location".into(), city.clone()],
        }
    }
}

impl std::fmt::Display for ConnectTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fastest => write!(f, "fastest location"),
            Self::Location(city) => write!(f, "{city}"),
        }
    }
}

/// VPN connection state machine.
///
/// Only the controller in `app` moves between these; status polls are the
/// source of truth whenever no connect or disconnect is in flight.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Nothing parsed yet.
    #[default]
    Unknown,
    /// No active VPN connection.
    Disconnected {
        /// Extra context for the status line, e.g. "process not running".
        note: Option<String>,
    },
    /// Connection attempt in progress.
    Connecting {
        started: Instant,
        target: ConnectTarget,
    },
    /// Active VPN connection established.
    Connected {
        since: Instant,
        details: Box<ConnectionDetails>,
    },
    /// Disconnect command in flight.
    Disconnecting { started: Instant },
    /// Last connect attempt failed. Cleared on the next tick.
    Failed { reason: String },
}

impl ConnectionState {
    /// Plain disconnected state.
    #[must_use]
    pub const fn disconnected() -> Self {
        Self::Disconnected { note: None }
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// True while a user-issued connect or disconnect is running.
    #[must_use]
    pub const fn is_transitioning(&self) -> bool {
        matches!(self, Self::Connecting { .. } | Self::Disconnecting { .. })
    }

    /// Details of an established tunnel.
    #[must_use]
    pub fn details(&self) -> Option<&ConnectionDetails> {
        match self {
            Self::Connected { details, .. } => Some(details),
            _ => None,
        }
    }

    /// Status line label.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Unknown => "Checking...".to_string(),
            Self::Disconnected { note: None } => "Disconnected".to_string(),
            Self::Disconnected { note: Some(note) } => format!("Disconnected ({note})"),
            Self::Connecting { .. } => "Connecting...".to_string(),
            Self::Connected { .. } => "Connected".to_string(),
            Self::Disconnecting { .. } => "Disconnecting...".to_string(),
            Self::Failed { .. } => "Connection Failed".to_string(),
        }
    }
}
