//! Application state and the controller that owns every transition.
//!
//! Key handling lives in [`keys`]. Background work runs on short-lived
//! threads that post a [`Message`] back; only [`App::handle_message`] on the
//! UI thread mutates state.

mod keys;
#[cfg(test)]
mod tests;

use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Instant;

use ratatui::widgets::{ListState, TableState};

use crate::config::AppConfig;
use crate::constants;
use crate::core::dispatch::{CommandKind, Dispatcher, Ticket};
use crate::core::interpreter::{self, StatusReport};
use crate::core::locator;
use crate::core::public_ip::{self, IpSource};
use crate::core::runner::{CliRunner, CommandOutput, CommandRunner};
use crate::core::system;
use crate::error::{Error, Result};
use crate::event::Waker;
use crate::logger::{self, LogLevel};
use crate::message::{Message, Outbox, ScrollMove};
use crate::state::{
    ConfirmAction, ConnectTarget, ConnectionDetails, ConnectionState, ExclusionMode, ExclusionSet,
    InputMode, LocateSource, LocationTable, PromptPurpose, Session, Settings, SettingsField, Tab,
    Toast, ToastType,
};
use crate::utils;

/// Main application state.
pub struct App {
    /// Whether the application should exit.
    pub should_quit: bool,
    pub config: AppConfig,
    /// What we know about the CLI and the account.
    pub session: Session,
    runner: Arc<dyn CommandRunner>,
    dispatcher: Dispatcher,

    // Connection
    pub connection_state: ConnectionState,
    /// Interface the last IP lookup was issued for.
    last_ip_interface: Option<String>,
    /// One status query scheduled after a successful connect.
    follow_up_at: Option<Instant>,
    last_poll: Option<Instant>,
    /// The running status query was asked for by the user.
    manual_status: bool,

    // Locations
    pub locations: LocationTable,
    pub location_table_state: TableState,

    // Exclusions
    pub exclusions: ExclusionSet,
    pub exclusions_loading: bool,
    pub exclusion_list_state: ListState,
    /// Mode selected on the Exclusions tab, applied on request.
    pub exclusion_mode_choice: ExclusionMode,
    /// Toast shown once the pending exclusion edit succeeds.
    exclusion_edit_note: Option<String>,

    // Settings
    pub settings: Settings,
    /// Values the CLI is known to hold.
    applied_settings: Settings,
    pub settings_field: SettingsField,

    // UI
    pub active_tab: Tab,
    pub input_mode: InputMode,
    pub show_action_menu: bool,
    pub action_menu_state: ListState,
    pub toast: Option<Toast>,
    /// Status line inside the login form.
    pub login_notice: Option<String>,
    pub logs_scroll: u16,
    pub logs_auto_scroll: bool,
    pub terminal_size: (u16, u16),
    pub is_root: bool,

    cmd_tx: mpsc::Sender<Message>,
    cmd_rx: mpsc::Receiver<Message>,
    waker: Option<Waker>,

    /// Run workers on the calling thread.
    #[cfg(test)]
    inline_workers: bool,
}

impl App {
    pub fn new(config: AppConfig, session: Session, runner: Arc<dyn CommandRunner>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        Self {
            should_quit: false,
            config,
            session,
            runner,
            dispatcher: Dispatcher::new(),
            connection_state: ConnectionState::Unknown,
            last_ip_interface: None,
            follow_up_at: None,
            last_poll: None,
            manual_status: false,
            locations: LocationTable::default(),
            location_table_state: TableState::default(),
            exclusions: ExclusionSet::default(),
            exclusions_loading: false,
            exclusion_list_state: ListState::default(),
            exclusion_mode_choice: ExclusionMode::default(),
            exclusion_edit_note: None,
            settings: Settings::default(),
            applied_settings: Settings::default(),
            settings_field: SettingsField::default(),
            active_tab: Tab::Main,
            input_mode: InputMode::Normal,
            show_action_menu: false,
            action_menu_state: ListState::default(),
            toast: None,
            login_notice: None,
            logs_scroll: 0,
            logs_auto_scroll: true,
            terminal_size: (80, 24),
            is_root: utils::is_root(),
            cmd_tx,
            cmd_rx,
            waker: None,
            #[cfg(test)]
            inline_workers: false,
        }
    }

    /// Wake the event loop whenever a worker posts a result.
    pub fn set_waker(&mut self, waker: Waker) {
        self.waker = Some(waker);
    }

    /// Startup checks and initial queries.
    ///
    /// `found` is false when the locator fell back to the default path.
    pub fn start(&mut self, found: bool) {
        self.log(&format!(
            "INIT: {} v{} using {} ({})",
            constants::APP_NAME,
            constants::APP_VERSION,
            self.session.executable.display(),
            self.session.source.describe()
        ));
        if self.is_root {
            self.log("INIT: Running as root");
        }
        if !found {
            self.input_mode = InputMode::Confirm {
                action: ConfirmAction::SelectExecutable,
                message: constants::MSG_EXECUTABLE_NOT_FOUND.to_string(),
            };
        }
        self.spawn_probe();
        self.spawn_login_check();
        self.load_settings();
        self.refresh_locations();
        self.refresh_exclusions();
    }

    fn outbox(&self) -> Outbox {
        Outbox::new(self.cmd_tx.clone(), self.waker.clone())
    }

    // === Logging & Toasts ===

    /// Log a `"CAT: message"` line; lines without a category go under `APP`.
    fn log(&mut self, message: &str) {
        let (category, content) = match message.split_once(':') {
            Some((cat, rest))
                if !cat.is_empty() && cat.chars().all(|c| c.is_ascii_uppercase()) =>
            {
                (cat, rest.trim())
            }
            _ => ("APP", message),
        };
        let level = if content.contains("Error") || content.contains("Failed") || content.contains("failed") {
            LogLevel::Error
        } else if content.contains("Warning") || content.contains("not ") {
            LogLevel::Warning
        } else {
            LogLevel::Info
        };
        self.push_log(level, category, content);
    }

    fn push_log(&mut self, level: LogLevel, category: &str, message: &str) {
        logger::log(level, category, message);
        if self.logs_auto_scroll {
            self.logs_scroll = Self::last_log_line();
        }
    }

    fn last_log_line() -> u16 {
        u16::try_from(logger::len().saturating_sub(1)).unwrap_or(u16::MAX)
    }

    /// Warnings and errors stay until dismissed; the rest time out.
    fn show_toast(&mut self, message: impl Into<String>, toast_type: ToastType) {
        let message = message.into();
        let level = match toast_type {
            ToastType::Info | ToastType::Success => LogLevel::Info,
            ToastType::Warning => LogLevel::Warning,
            ToastType::Error => LogLevel::Error,
        };
        self.push_log(level, "UI", &message.replace('\n', " "));
        let expires = (!toast_type.is_modal()).then(|| Instant::now() + constants::TOAST_DURATION);
        self.toast = Some(Toast {
            message,
            toast_type,
            expires,
        });
    }

    // === Workers ===

    fn spawn_worker<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        #[cfg(test)]
        {
            if self.inline_workers {
                job();
                return;
            }
        }
        thread::spawn(job);
    }

    fn spawn_command(&mut self, kind: CommandKind, args: Vec<String>) -> Ticket {
        self.spawn_run(kind, args, false)
    }

    /// Like [`Self::spawn_command`], logging only failures.
    fn spawn_quiet(&mut self, kind: CommandKind, args: Vec<String>) -> Ticket {
        self.spawn_run(kind, args, true)
    }

    fn spawn_run(&mut self, kind: CommandKind, args: Vec<String>, quiet: bool) -> Ticket {
        let ticket = self.dispatcher.issue(kind);
        let runner = Arc::clone(&self.runner);
        let outbox = self.outbox();
        self.spawn_worker(move || {
            let result = if quiet { runner.run_quiet(&args) } else { runner.run(&args) };
            outbox.send(Message::CommandFinished { ticket, result });
        });
        ticket
    }

    fn spawn_probe(&mut self) {
        self.log(&format!("INIT: Checking permissions for {}", self.session.executable.display()));
        let ticket = self.dispatcher.issue(CommandKind::Version);
        let runner = Arc::clone(&self.runner);
        let outbox = self.outbox();
        self.spawn_worker(move || {
            let result = locator::probe(runner.as_ref());
            outbox.send(Message::ProbeFinished { ticket, result });
        });
    }

    /// `status` without classification; the login phrases may arrive on
    /// either stream and with any exit code.
    fn spawn_login_check(&mut self) {
        self.log("AUTH: Checking login status...");
        let ticket = self.dispatcher.issue(CommandKind::Status);
        let runner = Arc::clone(&self.runner);
        let outbox = self.outbox();
        self.spawn_worker(move || {
            let result = runner.execute(&args(&["status"]), None);
            outbox.send(Message::LoginChecked { ticket, result });
        });
    }

    fn spawn_ip_lookup(&mut self, interface: String) {
        if self.dispatcher.is_in_flight(CommandKind::IpLookup) {
            return;
        }
        self.log("NET: Attempting to retrieve IP information...");
        self.last_ip_interface = Some(interface.clone());
        let ticket = self.dispatcher.issue(CommandKind::IpLookup);
        let runner = Arc::clone(&self.runner);
        let services = self.config.ip_services.clone();
        let timeout = self.config.ip_lookup_timeout();
        let outbox = self.outbox();
        self.spawn_worker(move || {
            let result = public_ip::discover(runner.as_ref(), &interface, &services, timeout);
            outbox.send(Message::IpResolved { ticket, result });
        });
    }

    fn spawn_process_check(&mut self) {
        let ticket = self.dispatcher.issue(CommandKind::ProcessCheck);
        let executable = self.session.executable.clone();
        let outbox = self.outbox();
        self.spawn_worker(move || {
            let running = system::cli_process_running(&executable);
            outbox.send(Message::ProcessChecked { ticket, running });
        });
    }

    fn spawn_settings_apply(&mut self, commands: Vec<Vec<String>>) {
        let ticket = self.dispatcher.issue(CommandKind::ApplySettings);
        let runner = Arc::clone(&self.runner);
        let outbox = self.outbox();
        self.spawn_worker(move || {
            let results = commands
                .into_iter()
                .map(|command| {
                    let result = runner.run(&command);
                    (command.join(" "), result)
                })
                .collect();
            outbox.send(Message::SettingsApplied { ticket, results });
        });
    }

    // === Event Loop Hooks ===

    /// Apply every result workers have posted so far.
    pub fn process_external(&mut self) {
        while let Ok(msg) = self.cmd_rx.try_recv() {
            self.handle_message(msg);
        }
    }

    pub fn on_tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
        if matches!(self.connection_state, ConnectionState::Failed { .. }) {
            self.connection_state = ConnectionState::disconnected();
        }
        if self.follow_up_at.is_some_and(|at| now >= at) {
            self.follow_up_at = None;
            self.log("STATUS: Refreshing status after connect");
            self.spawn_command(CommandKind::Status, args(&["status"]));
            self.last_poll = Some(now);
        }
        if self.session.logged_in && self.poll_due(now) {
            self.last_poll = Some(now);
            self.spawn_quiet(CommandKind::Status, args(&["status"]));
        }
    }

    fn poll_due(&self, now: Instant) -> bool {
        let busy = [CommandKind::Status, CommandKind::Connect, CommandKind::Disconnect]
            .into_iter()
            .any(|kind| self.dispatcher.is_in_flight(kind));
        !busy
            && self
                .last_poll
                .map_or(true, |at| now.duration_since(at) >= self.config.poll_interval())
    }

    // === Message Handling ===

    /// Handle a message from a key, the action menu, or a worker.
    #[allow(clippy::too_many_lines)]
    pub fn handle_message(&mut self, msg: Message) {
        match msg {
            // Navigation
            Message::Quit => self.should_quit = true,
            Message::NextTab => self.select_tab(self.active_tab.next()),
            Message::PreviousTab => self.select_tab(self.active_tab.previous()),
            Message::SelectTab(tab) => self.select_tab(tab),
            Message::OpenActionMenu => {
                self.show_action_menu = true;
                self.action_menu_state.select(Some(0));
            }
            Message::CloseOverlay => {
                self.show_action_menu = false;
                self.input_mode = InputMode::Normal;
                self.login_notice = None;
            }
            Message::OpenPrompt(purpose) => self.open_prompt(purpose),
            Message::ScrollLogs(movement) => self.scroll_logs(movement),
            Message::ClearLogs => {
                logger::clear();
                self.logs_scroll = 0;
                self.logs_auto_scroll = true;
            }
            Message::Resize(w, h) => self.terminal_size = (w, h),

            // Connection
            Message::ToggleConnection => {
                if self.connection_state.is_connected() {
                    self.disconnect();
                } else {
                    self.connect(ConnectTarget::Fastest);
                }
            }
            Message::Connect(target) => self.connect(target),
            Message::ConnectSelected => self.connect_selected(),
            Message::Disconnect => self.disconnect(),
            Message::RefreshStatus => self.manual_refresh(),

            // Locations
            Message::RefreshLocations => self.refresh_locations(),
            Message::SortLocations(column) => {
                self.locations.sort_by(column);
                self.select_first_location();
            }
            Message::SearchLocations(term) => self.search_locations(&term),

            // Settings
            Message::LoadSettings => self.load_settings(),
            Message::ApplySettings => self.apply_settings(),

            // Exclusions
            Message::RefreshExclusions => self.refresh_exclusions(),
            Message::AddExclusion(site) => {
                let site = site.trim();
                if site.is_empty() {
                    self.show_toast("Please enter a site to add", ToastType::Info);
                } else {
                    self.edit_exclusions(args(&["site-exclusions", "add", site]), None);
                }
            }
            Message::RemoveSelectedExclusion => {
                let selected = self
                    .exclusion_list_state
                    .selected()
                    .and_then(|i| self.exclusions.sites.get(i))
                    .cloned();
                match selected {
                    Some(site) => self.edit_exclusions(args(&["site-exclusions", "remove", &site]), None),
                    None => self.show_toast("Please select an exclusion to remove", ToastType::Info),
                }
            }
            Message::RequestClearExclusions => {
                self.input_mode = InputMode::Confirm {
                    action: ConfirmAction::ClearExclusions,
                    message: "Are you sure you want to clear all exclusions?".to_string(),
                };
            }
            Message::ApplyExclusionMode(mode) => {
                self.exclusion_mode_choice = mode;
                self.edit_exclusions(
                    args(&["site-exclusions", "mode", mode.as_arg()]),
                    Some(format!("Exclusion mode set to '{mode}'")),
                );
            }

            // Account
            Message::ShowLogin => {
                self.show_action_menu = false;
                self.input_mode = InputMode::login();
                self.login_notice = None;
            }
            Message::SubmitLogin { username, password } => self.submit_login(&username, &password),
            Message::RequestLogout => {
                self.input_mode = InputMode::Confirm {
                    action: ConfirmAction::Logout,
                    message: "Are you sure you want to log out?".to_string(),
                };
            }
            Message::Confirm(action) => self.confirm(action),

            // About
            Message::CheckUpdate => {
                self.log("UPDATE: Checking for updates...");
                self.spawn_command(CommandKind::CheckUpdate, args(&["check-update"]));
            }
            Message::ExportLogs(path) => {
                let path = path.trim();
                if path.is_empty() {
                    self.show_toast("Please enter an output path", ToastType::Info);
                    return;
                }
                let target = utils::expand_home(path).display().to_string();
                self.log(&format!("IO: Exporting logs to {target}..."));
                self.spawn_command(CommandKind::ExportLogs, args(&["export-logs", "--output", &target]));
            }
            Message::ShowLicense => {
                self.spawn_command(CommandKind::License, args(&["license"]));
            }
            Message::SelectExecutable(raw) => self.select_executable(&raw),
            Message::OpenLink(url) => {
                if let Err(e) = utils::open_link(url) {
                    self.show_toast(format!("Could not open {url}: {e}"), ToastType::Error);
                }
            }

            // Worker results
            Message::CommandFinished { ticket, result } => {
                if self.accept(ticket) {
                    self.on_command_finished(ticket.kind, result);
                } else if ticket.kind == CommandKind::ExclusionEdit {
                    // The edit happened even if a newer one superseded it.
                    self.refresh_exclusions();
                }
            }
            Message::LoginChecked { ticket, result } => {
                if self.accept(ticket) {
                    self.on_login_checked(result);
                }
            }
            Message::ProbeFinished { ticket, result } => {
                if self.accept(ticket) {
                    self.on_probe_finished(result);
                }
            }
            Message::SettingsApplied { ticket, results } => {
                if self.accept(ticket) {
                    if results
                        .iter()
                        .any(|(_, r)| matches!(r, Err(e) if e.is_not_logged_in()))
                    {
                        self.on_not_logged_in();
                    }
                    self.on_settings_applied(results);
                }
            }
            Message::IpResolved { ticket, result } => {
                if self.accept(ticket) {
                    self.on_ip_resolved(result);
                }
            }
            Message::ProcessChecked { ticket, running } => {
                if self.accept(ticket) {
                    self.on_process_checked(running);
                }
            }
        }
    }

    /// Complete `ticket`, logging and rejecting superseded results.
    fn accept(&mut self, ticket: Ticket) -> bool {
        if self.dispatcher.complete(ticket) {
            return true;
        }
        self.push_log(
            LogLevel::Info,
            ticket.kind.category(),
            &format!("Discarding superseded {:?} result", ticket.kind),
        );
        false
    }

    fn on_command_finished(&mut self, kind: CommandKind, result: Result<CommandOutput>) {
        if matches!(&result, Err(e) if e.is_not_logged_in()) {
            self.on_not_logged_in();
        }
        match kind {
            CommandKind::Status => self.on_status(result),
            CommandKind::Connect => self.on_connect_finished(result),
            CommandKind::Disconnect => self.on_disconnect_finished(result),
            CommandKind::Locations => self.on_locations(result),
            CommandKind::Exclusions => self.on_exclusions(result),
            CommandKind::ExclusionEdit => self.on_exclusion_edited(result),
            CommandKind::Config => self.on_config(result),
            CommandKind::Login => self.on_login_finished(result),
            CommandKind::Logout => self.on_logout_finished(result),
            CommandKind::CheckUpdate => self.on_check_update(result),
            CommandKind::Update => match result {
                Ok(out) => {
                    let line = interpreter::first_line(&out.stdout)
                        .unwrap_or_else(|| "Update finished".to_string());
                    self.show_toast(line, ToastType::Success);
                }
                Err(e) => self.show_toast(format!("Update failed: {e}"), ToastType::Error),
            },
            CommandKind::ExportLogs => match result {
                Ok(out) => {
                    let line = interpreter::first_line(&out.stdout)
                        .unwrap_or_else(|| "Logs exported".to_string());
                    self.show_toast(line, ToastType::Success);
                }
                Err(e) => self.show_toast(format!("Failed to export logs: {e}"), ToastType::Error),
            },
            CommandKind::License => match result {
                Ok(out) => {
                    self.input_mode = InputMode::Viewer {
                        title: "License Information".to_string(),
                        content: interpreter::strip_ansi(&out.stdout),
                        scroll: 0,
                    };
                }
                Err(e) => self.show_toast(format!("Could not read license: {e}"), ToastType::Error),
            },
            // These report through their own messages.
            CommandKind::ApplySettings | CommandKind::IpLookup | CommandKind::Version | CommandKind::ProcessCheck => {}
        }
    }

    /// A "not logged in" classification: drop the flag and offer to log in.
    fn on_not_logged_in(&mut self) {
        self.session.logged_in = false;
        self.log("AUTH: You are not logged in to AdGuard VPN");
        if self.input_mode == InputMode::Normal {
            self.input_mode = InputMode::Confirm {
                action: ConfirmAction::Login,
                message: constants::MSG_LOGIN_PROMPT.to_string(),
            };
        }
    }

    // === Connection ===

    fn select_tab(&mut self, tab: Tab) {
        self.show_action_menu = false;
        self.active_tab = tab;
    }

    fn connect(&mut self, target: ConnectTarget) {
        if !self.session.logged_in {
            self.log(&format!("AUTH: {}", constants::MSG_NOT_LOGGED_IN));
            self.input_mode = InputMode::login();
            self.login_notice = None;
            return;
        }
        if self.connect_in_flight() {
            self.show_toast(constants::MSG_CONNECT_IN_PROGRESS, ToastType::Info);
            return;
        }
        self.log(&format!("VPN: Connecting to {target}..."));
        self.active_tab = Tab::Main;
        self.follow_up_at = None;
        self.supersede_status();
        self.spawn_command(CommandKind::Connect, target.cli_args());
        self.connection_state = ConnectionState::Connecting {
            started: Instant::now(),
            target,
        };
    }

    /// Status and process checks issued before a connection change describe
    /// the old tunnel; drop them when they land.
    fn supersede_status(&mut self) {
        self.manual_status = false;
        self.dispatcher.supersede(CommandKind::Status);
        self.dispatcher.supersede(CommandKind::ProcessCheck);
    }

    fn connect_in_flight(&self) -> bool {
        self.dispatcher.is_in_flight(CommandKind::Connect)
            || self.dispatcher.is_in_flight(CommandKind::Disconnect)
    }

    fn connect_selected(&mut self) {
        if !self.session.logged_in {
            self.connect(ConnectTarget::Fastest);
            return;
        }
        let visible = self.locations.visible();
        let Some(entry) = self
            .location_table_state
            .selected()
            .and_then(|i| visible.get(i))
        else {
            self.show_toast("Please select a location", ToastType::Info);
            return;
        };
        let city = entry.city.trim().to_string();
        if city.is_empty() {
            self.show_toast("Could not determine the selected location", ToastType::Info);
            return;
        }
        self.connect(ConnectTarget::Location(city));
    }

    fn disconnect(&mut self) {
        if self.connect_in_flight() {
            self.show_toast(constants::MSG_CONNECT_IN_PROGRESS, ToastType::Info);
            return;
        }
        self.log("VPN: Disconnecting from VPN...");
        self.follow_up_at = None;
        self.supersede_status();
        self.spawn_command(CommandKind::Disconnect, args(&["disconnect"]));
        self.connection_state = ConnectionState::Disconnecting {
            started: Instant::now(),
        };
    }

    fn manual_refresh(&mut self) {
        self.log("STATUS: Manually refreshing VPN status...");
        if !self.connection_state.is_transitioning() {
            self.connection_state = ConnectionState::Unknown;
        }
        self.manual_status = true;
        self.spawn_process_check();
        self.spawn_command(CommandKind::Status, args(&["status"]));
    }

    fn on_connect_finished(&mut self, result: Result<CommandOutput>) {
        let text = match result {
            Ok(out) => out.stdout,
            Err(e) if e.is_not_logged_in() => {
                self.connection_state = ConnectionState::disconnected();
                return;
            }
            Err(e) => e.detail_text(),
        };

        if interpreter::connect_output_failed(&text) {
            self.log(&format!("VPN: Connection failed: {}", text.trim()));
            let mut message = constants::MSG_CONNECT_FAILED.to_string();
            if let Some(hint) = interpreter::connect_failure_hint(&text) {
                message.push_str("\n\n");
                message.push_str(hint);
            }
            self.connection_state = ConnectionState::Failed {
                reason: text.trim().to_string(),
            };
            self.show_toast(message, ToastType::Error);
            return;
        }

        self.log("VPN: Connected, refreshing details");
        self.last_ip_interface = None;
        self.connection_state = ConnectionState::Connected {
            since: Instant::now(),
            details: Box::new(ConnectionDetails {
                location: constants::MSG_DETECTING.to_string(),
                protocol: constants::MSG_DETECTING.to_string(),
                interface: String::new(),
                public_ip: None,
            }),
        };
        self.follow_up_at = Some(Instant::now() + self.config.connect_refresh_delay());
    }

    fn on_disconnect_finished(&mut self, result: Result<CommandOutput>) {
        if let Err(e) = &result {
            self.push_log(LogLevel::Error, "VPN", &format!("Disconnect error: {e}"));
        } else {
            self.log("VPN: Disconnected");
        }
        self.last_ip_interface = None;
        self.connection_state = ConnectionState::disconnected();
    }

    fn on_status(&mut self, result: Result<CommandOutput>) {
        let manual = std::mem::take(&mut self.manual_status);
        if self.connection_state.is_transitioning() {
            self.log("STATUS: Ignoring status while a connection change is running");
            return;
        }
        let out = match result {
            Ok(out) => out,
            Err(e) if e.is_not_logged_in() => {
                self.connection_state = ConnectionState::disconnected();
                return;
            }
            Err(e) => {
                self.push_log(LogLevel::Error, "STATUS", &format!("Error in VPN status: {e}"));
                if manual {
                    self.show_toast(format!("Status check failed: {e}"), ToastType::Error);
                }
                self.connection_state = ConnectionState::disconnected();
                return;
            }
        };

        match interpreter::parse_status(&out.stdout) {
            StatusReport::Connected {
                location,
                protocol,
                interface,
            } => self.apply_connected(location, protocol, interface),
            StatusReport::Disconnected => {
                if interpreter::reports_disconnected(&out.stdout) {
                    if manual || self.connection_state.is_connected() {
                        self.log("STATUS: VPN is disconnected.");
                    }
                } else {
                    self.push_log(
                        LogLevel::Warning,
                        "STATUS",
                        "Disconnected. Unknown status returned by CLI.",
                    );
                }
                self.last_ip_interface = None;
                // Keep a process-check note until the tunnel comes back.
                if !matches!(self.connection_state, ConnectionState::Disconnected { .. }) {
                    self.connection_state = ConnectionState::disconnected();
                }
            }
        }
    }

    fn apply_connected(&mut self, location: String, protocol: String, interface: String) {
        let same_interface = self.last_ip_interface.as_deref() == Some(interface.as_str());
        let (since, public_ip) = match &self.connection_state {
            ConnectionState::Connected { since, details } => {
                (*since, details.public_ip.clone().filter(|_| same_interface))
            }
            _ => (Instant::now(), None),
        };
        if !self.connection_state.is_connected() {
            self.log(&format!("STATUS: Connected to {location} ({protocol}, {interface})"));
        }
        let needs_lookup = public_ip.is_none() && !(same_interface && self.dispatcher.is_in_flight(CommandKind::IpLookup));
        self.connection_state = ConnectionState::Connected {
            since,
            details: Box::new(ConnectionDetails {
                location,
                protocol,
                interface: interface.clone(),
                public_ip,
            }),
        };
        if needs_lookup {
            self.spawn_ip_lookup(interface);
        }
    }

    fn on_ip_resolved(&mut self, result: Result<(String, IpSource)>) {
        let ConnectionState::Connected { details, .. } = &mut self.connection_state else {
            return;
        };
        if self.last_ip_interface.as_deref() != Some(details.interface.as_str()) {
            return;
        }
        match result {
            Ok((ip, source)) => {
                details.public_ip = Some(ip.clone());
                self.log(&format!("NET: Found IP from {source}: {ip}"));
            }
            Err(e) => {
                details.public_ip = Some(constants::MSG_IP_UNAVAILABLE.to_string());
                self.push_log(LogLevel::Warning, "NET", &e.to_string());
            }
        }
    }

    fn on_process_checked(&mut self, running: Option<bool>) {
        let name = self
            .session
            .executable
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        match running {
            Some(true) => self.log(&format!("STATUS: Process check: VPN process '{name}' is running")),
            Some(false) => {
                self.push_log(
                    LogLevel::Warning,
                    "STATUS",
                    &format!("Process check: VPN process '{name}' is not running"),
                );
                if !self.connection_state.is_transitioning() {
                    self.last_ip_interface = None;
                    self.connection_state = ConnectionState::Disconnected {
                        note: Some("process not running".to_string()),
                    };
                }
            }
            None => self.push_log(LogLevel::Warning, "STATUS", "Process check unavailable"),
        }
    }

    // === Startup ===

    fn on_probe_finished(&mut self, result: Result<String>) {
        match result {
            Ok(version) => {
                self.log(&format!("INIT: Permission check passed: {version}"));
                self.session.cli_version = Some(version);
                self.session.permission_problem = None;
            }
            Err(e) => {
                self.session.permission_problem = Some(e.to_string());
                self.push_log(LogLevel::Warning, "INIT", &e.to_string());
                self.show_toast(constants::MSG_PERMISSION_WARNING, ToastType::Warning);
            }
        }
    }

    fn on_login_checked(&mut self, result: Result<CommandOutput>) {
        let text = match &result {
            Ok(out) => out.combined(),
            Err(e) => e.detail_text(),
        };
        if interpreter::mentions_not_logged_in(&text) {
            self.on_not_logged_in();
            return;
        }
        self.session.logged_in = true;
        self.log("AUTH: Login status: Logged in");
        if let Ok(out) = result {
            self.on_status(Ok(out));
        }
    }

    // === Locations ===

    fn refresh_locations(&mut self) {
        self.locations.loading = true;
        self.spawn_command(CommandKind::Locations, args(&["list-locations"]));
    }

    fn on_locations(&mut self, result: Result<CommandOutput>) {
        match result {
            Ok(out) => {
                let entries = interpreter::parse_locations(&out.stdout);
                self.log(&format!("LOC: Loaded {} locations", entries.len()));
                self.locations.replace(entries);
            }
            Err(_) => self.locations.replace(Vec::new()),
        }
        self.select_first_location();
    }

    fn select_first_location(&mut self) {
        let selected = (!self.locations.visible().is_empty()).then_some(0);
        self.location_table_state.select(selected);
    }

    fn search_locations(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            self.locations.filter.clear();
            self.refresh_locations();
            return;
        }
        self.locations.filter = term.to_string();
        self.select_first_location();
        if self.locations.visible().is_empty() {
            self.show_toast(format!("No locations found matching '{term}'"), ToastType::Info);
        }
    }

    // === Exclusions ===

    fn refresh_exclusions(&mut self) {
        self.exclusions_loading = true;
        self.spawn_command(CommandKind::Exclusions, args(&["site-exclusions", "show"]));
    }

    fn edit_exclusions(&mut self, command: Vec<String>, note: Option<String>) {
        self.exclusion_edit_note = note;
        self.spawn_command(CommandKind::ExclusionEdit, command);
    }

    fn on_exclusions(&mut self, result: Result<CommandOutput>) {
        self.exclusions_loading = false;
        self.exclusions = match result {
            Ok(out) => interpreter::parse_exclusions(&out.stdout),
            Err(_) => ExclusionSet::default(),
        };
        if let Some(mode) = self.exclusions.mode {
            self.exclusion_mode_choice = mode;
        }
        let len = self.exclusions.sites.len();
        let selected = match self.exclusion_list_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.exclusion_list_state.select(selected);
    }

    fn on_exclusion_edited(&mut self, result: Result<CommandOutput>) {
        let note = self.exclusion_edit_note.take();
        match result {
            Ok(_) => {
                if let Some(note) = note {
                    self.show_toast(note, ToastType::Success);
                }
            }
            Err(e) => self.show_toast(format!("Exclusion update failed: {e}"), ToastType::Error),
        }
        self.refresh_exclusions();
    }

    // === Settings ===

    fn load_settings(&mut self) {
        self.spawn_command(CommandKind::Config, args(&["config", "show"]));
    }

    fn on_config(&mut self, result: Result<CommandOutput>) {
        match result {
            Ok(out) => {
                self.settings = interpreter::parse_config(&out.stdout, &Settings::default());
                self.applied_settings = self.settings.clone();
                self.log("CFG: Loaded settings from CLI");
            }
            Err(e) => self.push_log(LogLevel::Warning, "CFG", &format!("Could not read settings: {e}")),
        }
    }

    fn apply_settings(&mut self) {
        if let Some(problem) = self.settings.validate() {
            self.show_toast(problem, ToastType::Error);
            return;
        }
        let commands = self.settings.changes_from(&self.applied_settings);
        if commands.is_empty() {
            self.show_toast("No settings changed", ToastType::Info);
            return;
        }
        self.log(&format!("CFG: Applying {} setting(s)", commands.len()));
        self.spawn_settings_apply(commands);
    }

    fn on_settings_applied(&mut self, results: Vec<(String, Result<CommandOutput>)>) {
        let total = results.len();
        let failed: Vec<String> = results
            .into_iter()
            .filter_map(|(command, result)| result.err().map(|e| format!("{command}: {e}")))
            .collect();
        if failed.is_empty() {
            self.applied_settings = self.settings.clone();
            self.show_toast(
                format!("Settings have been applied successfully ({total} changed)"),
                ToastType::Success,
            );
        } else {
            self.show_toast(
                format!(
                    "Applied {} of {total} settings.\n{}",
                    total - failed.len(),
                    failed.join("\n")
                ),
                ToastType::Error,
            );
            self.load_settings();
        }
    }

    // === Account ===

    fn submit_login(&mut self, username: &str, password: &str) {
        let (username, password) = (username.trim(), password.trim());
        if username.is_empty() || password.is_empty() {
            self.login_notice = Some(constants::MSG_LOGIN_REQUIRED_FIELDS.to_string());
            return;
        }
        if self.dispatcher.is_in_flight(CommandKind::Login) {
            return;
        }
        self.login_notice = Some(constants::MSG_LOGGING_IN.to_string());
        self.spawn_command(
            CommandKind::Login,
            args(&["login", "--username", username, "--password", password]),
        );
    }

    fn on_login_finished(&mut self, result: Result<CommandOutput>) {
        let text = match &result {
            Ok(out) => out.combined(),
            Err(e) => e.detail_text(),
        };
        if interpreter::login_succeeded(&text) {
            self.session.logged_in = true;
            self.login_notice = None;
            if matches!(self.input_mode, InputMode::Login { .. }) {
                self.input_mode = InputMode::Normal;
            }
            self.show_toast("Successfully logged in to AdGuard VPN", ToastType::Success);
            self.spawn_command(CommandKind::Status, args(&["status"]));
            self.last_poll = Some(Instant::now());
            self.refresh_locations();
            self.refresh_exclusions();
        } else if matches!(self.input_mode, InputMode::Login { .. }) {
            self.push_log(LogLevel::Warning, "AUTH", "Login failed");
            self.login_notice = Some(constants::MSG_LOGIN_FAILED.to_string());
        } else {
            self.show_toast(constants::MSG_LOGIN_FAILED, ToastType::Error);
        }
    }

    fn on_logout_finished(&mut self, result: Result<CommandOutput>) {
        let text = match &result {
            Ok(out) => out.combined(),
            Err(e) => e.detail_text(),
        };
        if interpreter::logout_succeeded(&text) {
            self.session.logged_in = false;
            self.log("AUTH: Successfully logged out");
            self.show_toast("You have been logged out from AdGuard VPN", ToastType::Success);
        } else {
            self.push_log(LogLevel::Error, "AUTH", &format!("Logout error: {}", text.trim()));
            self.show_toast("Could not log out properly. See logs for details.", ToastType::Error);
        }
    }

    fn confirm(&mut self, action: ConfirmAction) {
        self.input_mode = InputMode::Normal;
        match action {
            ConfirmAction::Login => {
                self.input_mode = InputMode::login();
                self.login_notice = None;
            }
            ConfirmAction::SelectExecutable => self.open_prompt(PromptPurpose::SelectExecutable),
            ConfirmAction::Logout => {
                self.spawn_command(CommandKind::Logout, args(&["logout"]));
            }
            ConfirmAction::ClearExclusions => {
                self.edit_exclusions(args(&["site-exclusions", "clear"]), None);
            }
            ConfirmAction::InstallUpdate => {
                self.log("UPDATE: Installing update...");
                self.spawn_command(CommandKind::Update, args(&["update", "--yes"]));
            }
        }
    }

    // === About ===

    fn open_prompt(&mut self, purpose: PromptPurpose) {
        self.show_action_menu = false;
        let value = match purpose {
            PromptPurpose::AddExclusion => String::new(),
            PromptPurpose::ExportLogs => constants::DEFAULT_EXPORT_PATH.to_string(),
            PromptPurpose::SelectExecutable => self.session.executable.display().to_string(),
        };
        self.input_mode = InputMode::Prompt { purpose, value };
    }

    fn on_check_update(&mut self, result: Result<CommandOutput>) {
        match result {
            Ok(out) if interpreter::update_available(&out.combined()) => {
                self.input_mode = InputMode::Confirm {
                    action: ConfirmAction::InstallUpdate,
                    message: "An update is available. Would you like to install it?".to_string(),
                };
            }
            Ok(_) => self.show_toast("You are running the latest version", ToastType::Info),
            Err(e) => self.show_toast(format!("Update check failed: {e}"), ToastType::Error),
        }
    }

    fn select_executable(&mut self, raw: &str) {
        let path = match locator::validate_selection(raw) {
            Ok(path) => path,
            Err(Error::PermissionDenied { path, .. }) => {
                self.show_toast(
                    format!("The selected file '{}' is not executable.", path.display()),
                    ToastType::Error,
                );
                return;
            }
            Err(_) => {
                self.show_toast(format!("File not found: {}", raw.trim()), ToastType::Error);
                return;
            }
        };
        self.session.executable = path.clone();
        self.session.source = LocateSource::Manual;
        self.session.cli_version = None;
        self.runner = Arc::new(CliRunner::new(path.clone()));
        self.show_toast(format!("CLI path updated to {}", path.display()), ToastType::Success);
        self.spawn_probe();
        self.spawn_login_check();
    }

    fn scroll_logs(&mut self, movement: ScrollMove) {
        let last = Self::last_log_line();
        match movement {
            ScrollMove::Up => {
                self.logs_auto_scroll = false;
                self.logs_scroll = self.logs_scroll.saturating_sub(1);
            }
            ScrollMove::Down => {
                self.logs_scroll = self.logs_scroll.saturating_add(1).min(last);
                self.logs_auto_scroll = self.logs_scroll >= last;
            }
            ScrollMove::Top => {
                self.logs_auto_scroll = false;
                self.logs_scroll = 0;
            }
            ScrollMove::Bottom => {
                self.logs_auto_scroll = true;
                self.logs_scroll = last;
            }
        }
    }

    /// Whether the dispatcher has `kind` running, for the UI's busy markers.
    #[must_use]
    pub fn is_busy(&self, kind: CommandKind) -> bool {
        self.dispatcher.is_in_flight(kind)
    }
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}
