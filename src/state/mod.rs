//! State management module.
//!
//! Data types for the VPN connection, the location table, site exclusions,
//! CLI settings, the session, and UI state.

mod connection;
mod exclusion;
mod location;
mod session;
mod settings;
mod ui;

pub use connection::{ConnectTarget, ConnectionDetails, ConnectionState};
pub use exclusion::{ExclusionMode, ExclusionSet};
pub use location::{sort_locations, LocationColumn, LocationEntry, LocationTable, Ping, SortOrder};
pub use session::{LocateSource, Session};
pub use settings::{Settings, SettingsField, UpdateChannel, VpnMode};
pub use ui::{ConfirmAction, InputMode, LoginField, PromptPurpose, Tab, Toast, ToastType};
