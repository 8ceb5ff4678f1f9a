//! UI-only state types: tabs, input modes, toasts.

use std::time::Instant;

use super::settings::SettingsField;

/// Top-level tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
pub enum Tab {
    #[default]
    Main,
    Locations,
    Settings,
    Exclusions,
    About,
}

impl Tab {
    pub const ALL: [Self; 5] = [
        Self::Main,
        Self::Locations,
        Self::Settings,
        Self::Exclusions,
        Self::About,
    ];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Main => "Main",
            Self::Locations => "Locations",
            Self::Settings => "Settings",
            Self::Exclusions => "Exclusions",
            Self::About => "About",
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Which login form field has focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

/// What a single-line text prompt is collecting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptPurpose {
    AddExclusion,
    ExportLogs,
    SelectExecutable,
}

impl PromptPurpose {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::AddExclusion => "Add Exclusion",
            Self::ExportLogs => "Export Logs",
            Self::SelectExecutable => "AdGuard VPN CLI Path",
        }
    }

    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::AddExclusion => "Domain to exclude (e.g. example.com)",
            Self::ExportLogs => "Output file for the CLI log archive",
            Self::SelectExecutable => "Path to the adguardvpn-cli executable",
        }
    }
}

/// Action performed when a confirmation is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Open the login form.
    Login,
    /// Open the executable path prompt.
    SelectExecutable,
    Logout,
    ClearExclusions,
    InstallUpdate,
}

/// Current input mode determining keyboard behavior.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal navigation mode.
    #[default]
    Normal,
    /// Typing a location search term.
    Search { query: String },
    /// Editing a free-text settings field.
    EditSetting { field: SettingsField, buffer: String },
    /// Login form.
    Login {
        username: String,
        password: String,
        focused: LoginField,
    },
    /// Single-line text prompt.
    Prompt { purpose: PromptPurpose, value: String },
    /// Yes/no question.
    Confirm {
        action: ConfirmAction,
        message: String,
    },
    /// Scrollable read-only text, e.g. the license.
    Viewer {
        title: String,
        content: String,
        scroll: u16,
    },
}

impl InputMode {
    /// Fresh login form.
    #[must_use]
    pub fn login() -> Self {
        Self::Login {
            username: String::new(),
            password: String::new(),
            focused: LoginField::Username,
        }
    }
}

/// Toast severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastType {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastType {
    /// Warnings and errors stay until a key is pressed.
    #[must_use]
    pub const fn is_modal(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

/// Toast notification.
#[derive(Clone, Debug)]
pub struct Toast {
    pub message: String,
    pub toast_type: ToastType,
    /// `None` keeps the toast until dismissed.
    pub expires: Option<Instant>,
}

impl Toast {
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires.is_some_and(|at| now >= at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Main.next(), Tab::Locations);
        assert_eq!(Tab::About.next(), Tab::Main);
        assert_eq!(Tab::Main.previous(), Tab::About);
    }

    #[test]
    fn test_toast_expiry() {
        let now = Instant::now();
        let timed = Toast {
            message: "ok".into(),
            toast_type: ToastType::Info,
            expires: Some(now + Duration::from_secs(1)),
        };
        assert!(!timed.is_expired(now));
        assert!(timed.is_expired(now + Duration::from_secs(2)));

        let modal = Toast {
            message: "bad".into(),
            toast_type: ToastType::Error,
            expires: None,
        };
        assert!(!modal.is_expired(now + Duration::from_secs(3600)));
    }
}
