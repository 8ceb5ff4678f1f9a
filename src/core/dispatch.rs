//! Single-flight bookkeeping for background commands.
//!
//! Every background command is issued through a [`Dispatcher`] and carries a
//! [`Ticket`]. Only the result for the newest ticket of a kind is applied;
//! anything older has been superseded and is dropped on arrival.

use std::collections::HashMap;

/// Family of background work. At most one result per kind is current.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Status,
    Connect,
    Disconnect,
    Locations,
    Exclusions,
    ExclusionEdit,
    Config,
    ApplySettings,
    Login,
    Logout,
    IpLookup,
    Version,
    CheckUpdate,
    Update,
    ExportLogs,
    License,
    ProcessCheck,
}

impl CommandKind {
    /// Log tag for this kind.
    #[must_use]
    pub const fn category(self) -> &'static str {
        match self {
            Self::Status | Self::ProcessCheck => "STATUS",
            Self::Connect | Self::Disconnect => "VPN",
            Self::Locations => "LOC",
            Self::Exclusions | Self::ExclusionEdit => "EXCL",
            Self::Config | Self::ApplySettings => "CFG",
            Self::Login | Self::Logout => "AUTH",
            Self::IpLookup => "NET",
            Self::Version | Self::CheckUpdate | Self::Update | Self::License => "CLI",
            Self::ExportLogs => "IO",
        }
    }
}

/// Handle for one issued command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub kind: CommandKind,
    pub generation: u64,
}

#[derive(Default)]
struct Slot {
    latest: u64,
    in_flight: bool,
}

/// Tracks the newest ticket per kind.
#[derive(Default)]
pub struct Dispatcher {
    slots: HashMap<CommandKind, Slot>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket for `kind`, superseding any in flight.
    pub fn issue(&mut self, kind: CommandKind) -> Ticket {
        let slot = self.slots.entry(kind).or_default();
        slot.latest += 1;
        slot.in_flight = true;
        Ticket {
            kind,
            generation: slot.latest,
        }
    }

    /// Invalidate any ticket of `kind` in flight without issuing a new one.
    pub fn supersede(&mut self, kind: CommandKind) {
        if let Some(slot) = self.slots.get_mut(&kind) {
            slot.latest += 1;
            slot.in_flight = false;
        }
    }

    #[must_use]
    pub fn is_in_flight(&self, kind: CommandKind) -> bool {
        self.slots.get(&kind).is_some_and(|s| s.in_flight)
    }

    /// Record completion. Returns `false` for a superseded ticket, whose
    /// result must be discarded.
    pub fn complete(&mut self, ticket: Ticket) -> bool {
        let Some(slot) = self.slots.get_mut(&ticket.kind) else {
            return false;
        };
        if ticket.generation != slot.latest {
            return false;
        }
        slot.in_flight = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_complete() {
        let mut d = Dispatcher::new();
        assert!(!d.is_in_flight(CommandKind::Status));
        let t = d.issue(CommandKind::Status);
        assert!(d.is_in_flight(CommandKind::Status));
        assert!(!d.is_in_flight(CommandKind::Locations));
        assert!(d.complete(t));
        assert!(!d.is_in_flight(CommandKind::Status));
    }

    #[test]
    fn test_superseded_ticket_is_rejected() {
        let mut d = Dispatcher::new();
        let first = d.issue(CommandKind::Status);
        let second = d.issue(CommandKind::Status);
        assert!(d.complete(second));
        assert!(!d.complete(first));
        assert!(!d.is_in_flight(CommandKind::Status));
    }

    #[test]
    fn test_stale_arrival_keeps_newer_in_flight() {
        let mut d = Dispatcher::new();
        let first = d.issue(CommandKind::Locations);
        let _second = d.issue(CommandKind::Locations);
        assert!(!d.complete(first));
        assert!(d.is_in_flight(CommandKind::Locations));
    }

    #[test]
    fn test_supersede_drops_pending_ticket() {
        let mut d = Dispatcher::new();
        d.supersede(CommandKind::Status);
        let pending = d.issue(CommandKind::Status);
        d.supersede(CommandKind::Status);
        assert!(!d.is_in_flight(CommandKind::Status));
        assert!(!d.complete(pending));
        let next = d.issue(CommandKind::Status);
        assert!(d.complete(next));
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut d = Dispatcher::new();
        let status = d.issue(CommandKind::Status);
        let loc = d.issue(CommandKind::Locations);
        assert_eq!(status.generation, 1);
        assert_eq!(loc.generation, 1);
        assert!(d.complete(loc));
        assert!(d.is_in_flight(CommandKind::Status));
    }
}
