//! Color theme definitions.
//!
//! A dark palette built around the AdGuard green accent, with semantic
//! aliases for connection states and UI chrome.

use ratatui::style::Color;

// === Backgrounds ===

/// Dark panel shade, used for separators.
pub const PANEL_DARK: Color = Color::Rgb(50, 50, 50);
/// Muted gray for secondary text and hints.
pub const MUTED: Color = Color::Rgb(110, 118, 129);

// === Text ===

/// Primary text shade.
pub const TEXT_BRIGHT: Color = Color::Rgb(222, 226, 230);

// === Accents ===

/// AdGuard green.
pub const ADGUARD_GREEN: Color = Color::Rgb(103, 178, 121);
/// Teal used for key hints.
pub const TEAL: Color = Color::Rgb(102, 187, 186);

// === Status ===

pub const RED: Color = Color::Rgb(208, 94, 94);
pub const YELLOW: Color = Color::Rgb(235, 203, 139);
pub const BLUE: Color = Color::Rgb(126, 170, 214);

// === Semantic Color Aliases ===

/// Primary text color.
pub const TEXT_PRIMARY: Color = TEXT_BRIGHT;
/// Secondary/muted text color.
pub const TEXT_SECONDARY: Color = MUTED;
/// Primary accent color.
pub const ACCENT_PRIMARY: Color = ADGUARD_GREEN;
/// Key hint color.
pub const ACCENT_KEY: Color = TEAL;
/// Success state color.
pub const SUCCESS: Color = ADGUARD_GREEN;
/// Warning and pending state color.
pub const WARNING: Color = YELLOW;
/// Error state color.
pub const ERROR: Color = RED;
/// Informational toasts.
pub const INFO: Color = BLUE;
/// Nothing known yet.
pub const INACTIVE: Color = Color::Gray;

// === UI Element Colors ===

/// Default border color.
pub const BORDER_DEFAULT: Color = Color::Rgb(67, 76, 94);
/// Focused element border color.
pub const BORDER_FOCUSED: Color = ADGUARD_GREEN;
/// Selected row background color.
pub const ROW_SELECTED_BG: Color = Color::Rgb(40, 40, 40);
/// Selected row text color.
pub const ROW_SELECTED_FG: Color = ADGUARD_GREEN;
