//! Messages processed by the UI thread.
//!
//! Key handlers translate input into these, and background workers post
//! their results as these. Only [`crate::app::App::handle_message`] acts on
//! them.

use std::sync::mpsc;

use crate::core::dispatch::Ticket;
use crate::core::public_ip::IpSource;
use crate::core::runner::CommandOutput;
use crate::error::Result;
use crate::event::Waker;
use crate::constants;
use crate::state::{ConfirmAction, ConnectTarget, ExclusionMode, LocationColumn, PromptPurpose, Tab};

/// Scroll direction for scrollable views.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollMove {
    Up,
    Down,
    Top,
    Bottom,
}

/// Everything the controller can be asked to do.
#[derive(Clone, Debug)]
pub enum Message {
    // Navigation
    Quit,
    NextTab,
    PreviousTab,
    SelectTab(Tab),
    OpenActionMenu,
    CloseOverlay,
    /// Open a text prompt, prefilled with a sensible default.
    OpenPrompt(PromptPurpose),
    ScrollLogs(ScrollMove),
    ClearLogs,
    Resize(u16, u16),

    // Connection
    ToggleConnection,
    Connect(ConnectTarget),
    ConnectSelected,
    Disconnect,
    RefreshStatus,

    // Locations
    RefreshLocations,
    SortLocations(LocationColumn),
    SearchLocations(String),

    // Settings
    LoadSettings,
    ApplySettings,

    // Exclusions
    RefreshExclusions,
    AddExclusion(String),
    RemoveSelectedExclusion,
    RequestClearExclusions,
    ApplyExclusionMode(ExclusionMode),

    // Account
    ShowLogin,
    SubmitLogin { username: String, password: String },
    RequestLogout,
    /// A confirmation overlay was accepted.
    Confirm(ConfirmAction),

    // About
    CheckUpdate,
    ExportLogs(String),
    ShowLicense,
    SelectExecutable(String),
    OpenLink(&'static str),

    // Worker results
    CommandFinished {
        ticket: Ticket,
        result: Result<CommandOutput>,
    },
    /// Startup `status` run without classification; both streams are
    /// checked for the login phrases.
    LoginChecked {
        ticket: Ticket,
        result: Result<CommandOutput>,
    },
    ProbeFinished {
        ticket: Ticket,
        result: Result<String>,
    },
    SettingsApplied {
        ticket: Ticket,
        results: Vec<(String, Result<CommandOutput>)>,
    },
    IpResolved {
        ticket: Ticket,
        result: Result<(String, IpSource)>,
    },
    ProcessChecked {
        ticket: Ticket,
        running: Option<bool>,
    },
}

/// Action menu entry.
#[derive(Clone, Debug)]
pub struct ActionMenuItem {
    pub key: &'static str,
    pub label: &'static str,
    pub message: Message,
}

impl ActionMenuItem {
    #[must_use]
    pub const fn new(key: &'static str, label: &'static str, message: Message) -> Self {
        Self {
            key,
            label,
            message,
        }
    }
}

/// Action menu entries for `tab`.
#[must_use]
pub fn actions_for(tab: Tab) -> Vec<ActionMenuItem> {
    let mut items = match tab {
        Tab::Main => vec![
            ActionMenuItem::new("c", "Connect / Disconnect", Message::ToggleConnection),
            ActionMenuItem::new("f", "Connect to fastest", Message::Connect(ConnectTarget::Fastest)),
            ActionMenuItem::new("r", "Refresh status", Message::RefreshStatus),
            ActionMenuItem::new("C", "Clear log view", Message::ClearLogs),
        ],
        Tab::Locations => vec![
            ActionMenuItem::new("Enter", "Connect to selected", Message::ConnectSelected),
            ActionMenuItem::new("f", "Connect to fastest", Message::Connect(ConnectTarget::Fastest)),
            ActionMenuItem::new("r", "Refresh locations", Message::RefreshLocations),
            ActionMenuItem::new("i", "Sort by ISO", Message::SortLocations(LocationColumn::Iso)),
            ActionMenuItem::new("n", "Sort by country", Message::SortLocations(LocationColumn::Country)),
            ActionMenuItem::new("t", "Sort by city", Message::SortLocations(LocationColumn::City)),
            ActionMenuItem::new("p", "Sort by ping", Message::SortLocations(LocationColumn::Ping)),
        ],
        Tab::Settings => vec![
            ActionMenuItem::new("a", "Apply settings", Message::ApplySettings),
            ActionMenuItem::new("r", "Reload from CLI", Message::LoadSettings),
        ],
        Tab::Exclusions => vec![
            ActionMenuItem::new("a", "Add exclusion", Message::OpenPrompt(PromptPurpose::AddExclusion)),
            ActionMenuItem::new("d", "Remove selected", Message::RemoveSelectedExclusion),
            ActionMenuItem::new("C", "Clear all", Message::RequestClearExclusions),
            ActionMenuItem::new("g", "Set mode: general", Message::ApplyExclusionMode(ExclusionMode::General)),
            ActionMenuItem::new(
                "s",
                "Set mode: selective",
                Message::ApplyExclusionMode(ExclusionMode::Selective),
            ),
            ActionMenuItem::new("r", "Refresh exclusions", Message::RefreshExclusions),
        ],
        Tab::About => vec![
            ActionMenuItem::new("u", "Check for updates", Message::CheckUpdate),
            ActionMenuItem::new("e", "Export logs", Message::OpenPrompt(PromptPurpose::ExportLogs)),
            ActionMenuItem::new("L", "Show license", Message::ShowLicense),
            ActionMenuItem::new(
                "p",
                "Change CLI path",
                Message::OpenPrompt(PromptPurpose::SelectExecutable),
            ),
            ActionMenuItem::new("w", "Open website", Message::OpenLink(constants::LINK_WEBSITE)),
            ActionMenuItem::new("g", "Open CLI repository", Message::OpenLink(constants::LINK_CLI_REPO)),
        ],
    };
    items.push(ActionMenuItem::new("l", "Log in", Message::ShowLogin));
    items.push(ActionMenuItem::new("o", "Log out", Message::RequestLogout));
    items
}

/// Sending half handed to workers.
///
/// Wakes the event loop after each send so results are applied without
/// waiting for the next tick.
#[derive(Clone)]
pub struct Outbox {
    tx: mpsc::Sender<Message>,
    waker: Option<Waker>,
}

impl Outbox {
    #[must_use]
    pub const fn new(tx: mpsc::Sender<Message>, waker: Option<Waker>) -> Self {
        Self { tx, waker }
    }

    /// Post a message. A closed UI is not an error for the worker.
    pub fn send(&self, message: Message) {
        if self.tx.send(message).is_ok() {
            if let Some(waker) = &self.waker {
                waker.wake();
            }
        }
    }
}
