//! Keyboard handling: maps keys to [`Message`]s per input mode and tab.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::App;
use crate::constants;
use crate::message::{self, Message, ScrollMove};
use crate::state::{
    ConnectTarget, InputMode, LocationColumn, LoginField, PromptPurpose, SettingsField, Tab,
};

impl App {
    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        // 1. Global: Quit (always takes priority)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.handle_message(Message::Quit);
            return;
        }

        // 2. Modal toasts swallow the next key; timed ones close on Esc
        if let Some(toast) = &self.toast {
            if toast.toast_type.is_modal() || key.code == KeyCode::Esc {
                self.toast = None;
                return;
            }
        }

        // 3. Action menu
        if self.show_action_menu {
            self.handle_action_menu_keys(key);
            return;
        }

        let msg = match &mut self.input_mode {
            InputMode::Normal => {
                self.handle_normal_keys(key);
                return;
            }
            InputMode::Search { query } => match key.code {
                KeyCode::Enter => {
                    let term = std::mem::take(query);
                    self.input_mode = InputMode::Normal;
                    Some(Message::SearchLocations(term))
                }
                KeyCode::Esc => Some(Message::CloseOverlay),
                _ => {
                    edit_text(key, query);
                    None
                }
            },
            InputMode::EditSetting { buffer, .. } => match key.code {
                KeyCode::Enter => {
                    self.commit_setting_edit();
                    None
                }
                KeyCode::Esc => Some(Message::CloseOverlay),
                _ => {
                    edit_text(key, buffer);
                    None
                }
            },
            InputMode::Login {
                username,
                password,
                focused,
            } => match (key.code, *focused) {
                (KeyCode::Esc, _) => Some(Message::CloseOverlay),
                (KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down, _)
                | (KeyCode::Enter, LoginField::Username) => {
                    *focused = match focused {
                        LoginField::Username => LoginField::Password,
                        LoginField::Password => LoginField::Username,
                    };
                    None
                }
                (KeyCode::Enter, LoginField::Password) => Some(Message::SubmitLogin {
                    username: username.clone(),
                    password: password.clone(),
                }),
                (_, LoginField::Username) => {
                    edit_text(key, username);
                    None
                }
                (_, LoginField::Password) => {
                    edit_text(key, password);
                    None
                }
            },
            InputMode::Prompt { purpose, value } => match key.code {
                KeyCode::Enter => {
                    let value = std::mem::take(value);
                    let msg = match purpose {
                        PromptPurpose::AddExclusion => Message::AddExclusion(value),
                        PromptPurpose::ExportLogs => Message::ExportLogs(value),
                        PromptPurpose::SelectExecutable => Message::SelectExecutable(value),
                    };
                    self.input_mode = InputMode::Normal;
                    Some(msg)
                }
                KeyCode::Esc => Some(Message::CloseOverlay),
                _ => {
                    edit_text(key, value);
                    None
                }
            },
            InputMode::Confirm { action, .. } => match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Message::Confirm(*action)),
                KeyCode::Char('n' | 'N' | 'q') | KeyCode::Esc => Some(Message::CloseOverlay),
                _ => None,
            },
            InputMode::Viewer { scroll, .. } => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Some(Message::CloseOverlay),
                KeyCode::Up | KeyCode::Char('k') => {
                    *scroll = scroll.saturating_sub(1);
                    None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    *scroll = scroll.saturating_add(1);
                    None
                }
                KeyCode::PageUp => {
                    *scroll = scroll.saturating_sub(10);
                    None
                }
                KeyCode::PageDown => {
                    *scroll = scroll.saturating_add(10);
                    None
                }
                KeyCode::Home | KeyCode::Char('g') => {
                    *scroll = 0;
                    None
                }
                // Clamped to the last page when drawn
                KeyCode::End | KeyCode::Char('G') => {
                    *scroll = u16::MAX;
                    None
                }
                _ => None,
            },
        };

        if let Some(msg) = msg {
            self.handle_message(msg);
        }
    }

    fn handle_action_menu_keys(&mut self, key: KeyEvent) {
        let actions = message::actions_for(self.active_tab);
        let action_count = actions.len();

        match key.code {
            KeyCode::Esc | KeyCode::Char('q' | 'x') => {
                self.handle_message(Message::CloseOverlay);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let current = self.action_menu_state.selected().unwrap_or(0);
                let prev = if current == 0 { action_count - 1 } else { current - 1 };
                self.action_menu_state.select(Some(prev));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let current = self.action_menu_state.selected().unwrap_or(0);
                self.action_menu_state.select(Some((current + 1) % action_count));
            }
            KeyCode::Enter => {
                if let Some(item) = self
                    .action_menu_state
                    .selected()
                    .and_then(|i| actions.get(i))
                {
                    self.show_action_menu = false;
                    self.handle_message(item.message.clone());
                }
            }
            KeyCode::Char(c) => {
                let item = actions
                    .iter()
                    .find(|a| a.key.len() == 1 && a.key.starts_with(c));
                if let Some(item) = item {
                    self.show_action_menu = false;
                    self.handle_message(item.message.clone());
                }
            }
            _ => {}
        }
    }

    fn handle_normal_keys(&mut self, key: KeyEvent) {
        let global = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Tab => Some(Message::NextTab),
            KeyCode::BackTab => Some(Message::PreviousTab),
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                Some(Message::SelectTab(Tab::ALL[idx]))
            }
            KeyCode::Char('x') => Some(Message::OpenActionMenu),
            KeyCode::Char('l') => Some(Message::ShowLogin),
            KeyCode::Char('o') => Some(Message::RequestLogout),
            _ => None,
        };
        if let Some(msg) = global {
            self.handle_message(msg);
            return;
        }

        match self.active_tab {
            Tab::Main => self.handle_main_keys(key),
            Tab::Locations => self.handle_locations_keys(key),
            Tab::Settings => self.handle_settings_keys(key),
            Tab::Exclusions => self.handle_exclusions_keys(key),
            Tab::About => self.handle_about_keys(key),
        }
    }

    fn handle_main_keys(&mut self, key: KeyEvent) {
        let msg = match key.code {
            KeyCode::Char('c') | KeyCode::Enter => Message::ToggleConnection,
            KeyCode::Char('f') => Message::Connect(ConnectTarget::Fastest),
            KeyCode::Char('d') => Message::Disconnect,
            KeyCode::Char('r') => Message::RefreshStatus,
            KeyCode::Char('C') => Message::ClearLogs,
            KeyCode::Up | KeyCode::Char('k') => Message::ScrollLogs(ScrollMove::Up),
            KeyCode::Down | KeyCode::Char('j') => Message::ScrollLogs(ScrollMove::Down),
            KeyCode::Home | KeyCode::Char('g') => Message::ScrollLogs(ScrollMove::Top),
            KeyCode::End | KeyCode::Char('G') => Message::ScrollLogs(ScrollMove::Bottom),
            _ => return,
        };
        self.handle_message(msg);
    }

    fn handle_locations_keys(&mut self, key: KeyEvent) {
        let msg = match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_location_selection(-1);
                return;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_location_selection(1);
                return;
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search {
                    query: self.locations.filter.clone(),
                };
                return;
            }
            KeyCode::Esc if !self.locations.filter.is_empty() => {
                Message::SearchLocations(String::new())
            }
            KeyCode::Enter => Message::ConnectSelected,
            KeyCode::Char('f') => Message::Connect(ConnectTarget::Fastest),
            KeyCode::Char('r') => Message::RefreshLocations,
            KeyCode::Char('i') => Message::SortLocations(LocationColumn::Iso),
            KeyCode::Char('n') => Message::SortLocations(LocationColumn::Country),
            KeyCode::Char('t') => Message::SortLocations(LocationColumn::City),
            KeyCode::Char('p') => Message::SortLocations(LocationColumn::Ping),
            _ => return,
        };
        self.handle_message(msg);
    }

    fn handle_settings_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.settings_field = self.settings_field.previous(),
            KeyCode::Down | KeyCode::Char('j') => self.settings_field = self.settings_field.next(),
            KeyCode::Enter if self.settings_field.is_text() => {
                self.input_mode = InputMode::EditSetting {
                    field: self.settings_field,
                    buffer: self.setting_text(self.settings_field).to_string(),
                };
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                self.cycle_setting(self.settings_field);
            }
            KeyCode::Char('a') => self.handle_message(Message::ApplySettings),
            KeyCode::Char('r') => self.handle_message(Message::LoadSettings),
            _ => {}
        }
    }

    fn handle_exclusions_keys(&mut self, key: KeyEvent) {
        let msg = match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                move_list(&mut self.exclusion_list_state, self.exclusions.sites.len(), -1);
                return;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                move_list(&mut self.exclusion_list_state, self.exclusions.sites.len(), 1);
                return;
            }
            KeyCode::Char('m') => {
                self.exclusion_mode_choice = self.exclusion_mode_choice.toggled();
                return;
            }
            KeyCode::Enter => Message::ApplyExclusionMode(self.exclusion_mode_choice),
            KeyCode::Char('a') => Message::OpenPrompt(PromptPurpose::AddExclusion),
            KeyCode::Char('d') | KeyCode::Delete => Message::RemoveSelectedExclusion,
            KeyCode::Char('C') => Message::RequestClearExclusions,
            KeyCode::Char('r') => Message::RefreshExclusions,
            _ => return,
        };
        self.handle_message(msg);
    }

    fn handle_about_keys(&mut self, key: KeyEvent) {
        let msg = match key.code {
            KeyCode::Char('u') => Message::CheckUpdate,
            KeyCode::Char('e') => Message::OpenPrompt(PromptPurpose::ExportLogs),
            KeyCode::Char('L') => Message::ShowLicense,
            KeyCode::Char('p') => Message::OpenPrompt(PromptPurpose::SelectExecutable),
            KeyCode::Char('w') => Message::OpenLink(constants::LINK_WEBSITE),
            KeyCode::Char('g') => Message::OpenLink(constants::LINK_CLI_REPO),
            _ => return,
        };
        self.handle_message(msg);
    }

    fn move_location_selection(&mut self, delta: isize) {
        let len = self.locations.visible().len();
        let current = self.location_table_state.selected();
        self.location_table_state.select(step(current, len, delta));
    }

    /// Current text of a free-text settings field.
    #[must_use]
    pub fn setting_text(&self, field: SettingsField) -> &str {
        match field {
            SettingsField::SocksPort => &self.settings.socks_port,
            SettingsField::SocksHost => &self.settings.socks_host,
            SettingsField::Dns => &self.settings.dns_server,
            SettingsField::Mode | SettingsField::Channel => "",
        }
    }

    fn cycle_setting(&mut self, field: SettingsField) {
        match field {
            SettingsField::Mode => self.settings.vpn_mode = self.settings.vpn_mode.next(),
            SettingsField::Channel => {
                self.settings.update_channel = self.settings.update_channel.next();
            }
            SettingsField::SocksPort | SettingsField::SocksHost | SettingsField::Dns => {}
        }
    }

    fn commit_setting_edit(&mut self) {
        let InputMode::EditSetting { field, buffer } = std::mem::take(&mut self.input_mode) else {
            return;
        };
        let value = buffer.trim().to_string();
        match field {
            SettingsField::SocksPort => self.settings.socks_port = value,
            SettingsField::SocksHost => self.settings.socks_host = value,
            SettingsField::Dns => self.settings.dns_server = value,
            SettingsField::Mode | SettingsField::Channel => {}
        }
    }
}

/// Single-line editing: printable characters append, Backspace deletes.
fn edit_text(key: KeyEvent, text: &mut String) {
    match key.code {
        KeyCode::Backspace => {
            text.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => text.push(c),
        _ => {}
    }
}

/// Move a selection by `delta`, clamped to `0..len`.
fn step(current: Option<usize>, len: usize, delta: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let next = current.map_or(0, |i| i.saturating_add_signed(delta));
    Some(next.min(len - 1))
}

fn move_list(state: &mut ratatui::widgets::ListState, len: usize, delta: isize) {
    state.select(step(state.selected(), len, delta));
}
