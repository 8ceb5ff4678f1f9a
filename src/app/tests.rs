use super::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};

use crate::state::LocationColumn;

const CONNECTED: &str = "Connected to BERLIN in TUN mode, running on utun-test9";
const LOCATIONS: &str = "ISO   COUNTRY          CITY        PING\n\
                         DE    Germany          Berlin      unknown\n\
                         US    United States    New York    12\n";

/// Answers by the joined argument list and records every call.
#[derive(Default)]
struct FakeRunner {
    replies: Mutex<HashMap<String, CommandOutput>>,
    calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    fn reply(&self, line: &str, output: CommandOutput) {
        self.replies.lock().unwrap().insert(line.to_string(), output);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, line: &str) -> usize {
        self.calls().iter().filter(|c| *c == line).count()
    }
}

impl CommandRunner for FakeRunner {
    fn executable(&self) -> &Path {
        Path::new("/fake/adguardvpn-cli")
    }

    fn execute(&self, args: &[String], _timeout: Option<Duration>) -> Result<CommandOutput> {
        let line = args.join(" ");
        self.calls.lock().unwrap().push(line.clone());
        Ok(self
            .replies
            .lock()
            .unwrap()
            .get(&line)
            .cloned()
            .unwrap_or_default())
    }
}

fn failure(code: i32, stderr: &str) -> CommandOutput {
    CommandOutput {
        stdout: String::new(),
        stderr: stderr.to_string(),
        exit_code: code,
    }
}

/// Logged-in app with inline workers and no HTTP IP services.
fn test_app() -> (App, Arc<FakeRunner>) {
    let runner = Arc::new(FakeRunner::default());
    let config = AppConfig {
        ip_services: Vec::new(),
        ..AppConfig::default()
    };
    let mut session = Session::new(PathBuf::from("/fake/adguardvpn-cli"), LocateSource::Candidate);
    session.logged_in = true;
    let mut app = App::new(config, session, runner.clone());
    app.inline_workers = true;
    (app, runner)
}

fn set_connected(app: &mut App) {
    app.connection_state = ConnectionState::Connected {
        since: Instant::now(),
        details: Box::new(ConnectionDetails {
            location: "Berlin".into(),
            protocol: "TUN".into(),
            interface: "utun-test9".into(),
            public_ip: Some("10.0.0.2".into()),
        }),
    };
}

fn toast_text(app: &App) -> String {
    app.toast.as_ref().map(|t| t.message.clone()).unwrap_or_default()
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::from(code));
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

// === Login gate ===

#[test]
fn test_connect_family_requires_login() {
    for msg in [
        Message::ToggleConnection,
        Message::Connect(ConnectTarget::Fastest),
        Message::Connect(ConnectTarget::Location("Berlin".into())),
        Message::ConnectSelected,
    ] {
        let (mut app, runner) = test_app();
        app.session.logged_in = false;
        app.handle_message(msg);
        app.process_external();
        assert!(runner.calls().iter().all(|c| !c.starts_with("connect")));
        assert!(matches!(app.input_mode, InputMode::Login { .. }));
        assert!(!app.connection_state.is_transitioning());
    }
}

// === Connect / Disconnect ===

#[test]
fn test_connect_success_schedules_follow_up() {
    let (mut app, runner) = test_app();
    runner.reply("connect --fastest", CommandOutput::ok("Successfully Connected to BERLIN"));
    runner.reply("status", CommandOutput::ok(CONNECTED));

    app.handle_message(Message::Connect(ConnectTarget::Fastest));
    assert!(matches!(app.connection_state, ConnectionState::Connecting { .. }));
    app.process_external();

    let details = app.connection_state.details().unwrap();
    assert_eq!(details.location, constants::MSG_DETECTING);
    assert_eq!(details.public_ip, None);
    let follow_up = app.follow_up_at.unwrap();
    assert_eq!(runner.count("status"), 0);

    app.tick_at(follow_up + Duration::from_millis(1));
    app.process_external();
    assert_eq!(runner.count("status"), 1);
    let details = app.connection_state.details().unwrap();
    assert_eq!(details.location, "BERLIN");
    assert_eq!(details.protocol, "TUN");
    assert_eq!(details.interface, "utun-test9");
    // Every IP source came up empty.
    assert_eq!(details.public_ip.as_deref(), Some(constants::MSG_IP_UNAVAILABLE));
    assert!(runner.calls().contains(&"config show".to_string()));
    assert!(runner.calls().contains(&"status --verbose".to_string()));
}

#[test]
fn test_ip_found_in_config_dump() {
    let (mut app, runner) = test_app();
    runner.reply("status", CommandOutput::ok(CONNECTED));
    runner.reply("config show", CommandOutput::ok("VPN IP: 10.8.0.7\n"));
    app.handle_message(Message::RefreshStatus);
    app.process_external();
    assert_eq!(
        app.connection_state.details().unwrap().public_ip.as_deref(),
        Some("10.8.0.7")
    );

    // Same interface on the next poll: no second lookup.
    let lookups = runner.count("config show");
    let ticket = app.dispatcher.issue(CommandKind::Status);
    app.handle_message(Message::CommandFinished {
        ticket,
        result: Ok(CommandOutput::ok(CONNECTED)),
    });
    app.process_external();
    assert_eq!(runner.count("config show"), lookups);
    assert_eq!(
        app.connection_state.details().unwrap().public_ip.as_deref(),
        Some("10.8.0.7")
    );
}

#[test]
fn test_connect_output_with_error_text_fails() {
    let (mut app, runner) = test_app();
    runner.reply("connect --fastest", CommandOutput::ok("Error: access denied"));
    app.handle_message(Message::Connect(ConnectTarget::Fastest));
    app.process_external();

    assert!(matches!(app.connection_state, ConnectionState::Failed { .. }));
    let toast = app.toast.clone().unwrap();
    assert_eq!(toast.toast_type, ToastType::Error);
    assert!(toast.message.starts_with(constants::MSG_CONNECT_FAILED));
    assert!(toast.message.contains(constants::HINT_PRIVILEGES));
    assert_eq!(app.follow_up_at, None);

    app.tick_at(Instant::now());
    assert_eq!(app.connection_state, ConnectionState::disconnected());
}

#[test]
fn test_connect_nonzero_exit_gets_service_hint() {
    let (mut app, runner) = test_app();
    runner.reply("connect --fastest", failure(1, "Cannot start VPN process"));
    app.handle_message(Message::ToggleConnection);
    app.process_external();
    assert!(matches!(app.connection_state, ConnectionState::Failed { .. }));
    assert!(toast_text(&app).contains(constants::HINT_SERVICE));
}

#[test]
fn test_connect_not_logged_in_offers_login() {
    let (mut app, runner) = test_app();
    runner.reply(
        "connect --fastest",
        failure(1, "Before connecting to a location, you must log in"),
    );
    app.handle_message(Message::Connect(ConnectTarget::Fastest));
    app.process_external();
    assert_eq!(app.connection_state, ConnectionState::disconnected());
    assert!(!app.session.logged_in);
    assert!(matches!(
        app.input_mode,
        InputMode::Confirm {
            action: ConfirmAction::Login,
            ..
        }
    ));
}

#[test]
fn test_second_connect_refused_while_in_flight() {
    let (mut app, runner) = test_app();
    app.handle_message(Message::Connect(ConnectTarget::Fastest));
    // Result not drained yet, so the connect is still in flight.
    app.handle_message(Message::Connect(ConnectTarget::Location("Paris".into())));
    assert_eq!(toast_text(&app), constants::MSG_CONNECT_IN_PROGRESS);
    assert_eq!(runner.count("connect --location Paris"), 0);
}

#[test]
fn test_disconnect_failure_still_resets() {
    let (mut app, runner) = test_app();
    set_connected(&mut app);
    runner.reply("disconnect", failure(2, "daemon not responding"));
    app.handle_message(Message::ToggleConnection);
    assert!(matches!(app.connection_state, ConnectionState::Disconnecting { .. }));
    app.process_external();
    assert_eq!(app.connection_state, ConnectionState::disconnected());
    assert!(app.connection_state.details().is_none());
}

// === Status ===

#[test]
fn test_newer_status_wins_over_late_older_result() {
    let (mut app, _runner) = test_app();
    let first = app.dispatcher.issue(CommandKind::Status);
    let second = app.dispatcher.issue(CommandKind::Status);

    app.handle_message(Message::CommandFinished {
        ticket: second,
        result: Ok(CommandOutput::ok(CONNECTED)),
    });
    app.handle_message(Message::CommandFinished {
        ticket: first,
        result: Ok(CommandOutput::ok("VPN is disconnected")),
    });
    app.process_external();
    assert!(app.connection_state.is_connected());
}

#[test]
fn test_status_results_in_issue_order_apply_in_order() {
    let (mut app, _runner) = test_app();
    let first = app.dispatcher.issue(CommandKind::Status);
    app.handle_message(Message::CommandFinished {
        ticket: first,
        result: Ok(CommandOutput::ok(CONNECTED)),
    });
    app.process_external();
    assert!(app.connection_state.is_connected());

    let second = app.dispatcher.issue(CommandKind::Status);
    app.handle_message(Message::CommandFinished {
        ticket: second,
        result: Ok(CommandOutput::ok("VPN is disconnected")),
    });
    assert_eq!(app.connection_state, ConnectionState::disconnected());
}

#[test]
fn test_status_ignored_during_connect() {
    let (mut app, _runner) = test_app();
    let status = app.dispatcher.issue(CommandKind::Status);
    app.handle_message(Message::Connect(ConnectTarget::Fastest));
    app.handle_message(Message::CommandFinished {
        ticket: status,
        result: Ok(CommandOutput::ok("VPN is disconnected")),
    });
    assert!(matches!(app.connection_state, ConnectionState::Connecting { .. }));
}

#[test]
fn test_status_from_before_disconnect_is_dropped() {
    let (mut app, runner) = test_app();
    set_connected(&mut app);
    let status = app.dispatcher.issue(CommandKind::Status);
    app.handle_message(Message::Disconnect);
    app.process_external();
    assert_eq!(app.connection_state, ConnectionState::disconnected());

    app.handle_message(Message::CommandFinished {
        ticket: status,
        result: Ok(CommandOutput::ok(CONNECTED)),
    });
    app.process_external();
    assert_eq!(app.connection_state, ConnectionState::disconnected());
    assert!(!app.dispatcher.is_in_flight(CommandKind::Status));
    assert_eq!(runner.count("config show"), 0);
}

#[test]
fn test_status_from_before_connect_is_dropped() {
    let (mut app, runner) = test_app();
    runner.reply("connect --fastest", CommandOutput::ok("Successfully Connected to BERLIN"));
    let status = app.dispatcher.issue(CommandKind::Status);
    app.handle_message(Message::Connect(ConnectTarget::Fastest));
    app.process_external();

    app.handle_message(Message::CommandFinished {
        ticket: status,
        result: Ok(CommandOutput::ok("VPN is disconnected")),
    });
    app.process_external();
    let details = app.connection_state.details().unwrap();
    assert_eq!(details.location, constants::MSG_DETECTING);
    assert!(app.follow_up_at.is_some());
}

#[test]
fn test_status_not_logged_in_clears_flag() {
    let (mut app, runner) = test_app();
    runner.reply("status", failure(1, "You are not logged in"));
    app.handle_message(Message::RefreshStatus);
    app.process_external();
    assert!(!app.session.logged_in);
    assert!(matches!(
        app.input_mode,
        InputMode::Confirm {
            action: ConfirmAction::Login,
            ..
        }
    ));
}

#[test]
fn test_process_note_survives_disconnected_status() {
    let (mut app, _runner) = test_app();
    let check = app.dispatcher.issue(CommandKind::ProcessCheck);
    app.handle_message(Message::ProcessChecked {
        ticket: check,
        running: Some(false),
    });
    assert_eq!(app.connection_state.label(), "Disconnected (process not running)");

    let status = app.dispatcher.issue(CommandKind::Status);
    app.handle_message(Message::CommandFinished {
        ticket: status,
        result: Ok(CommandOutput::ok("VPN is disconnected")),
    });
    assert_eq!(app.connection_state.label(), "Disconnected (process not running)");
}

// === Polling ===

#[test]
fn test_poll_interval() {
    let (mut app, runner) = test_app();
    let start = Instant::now();
    app.tick_at(start);
    app.process_external();
    assert_eq!(runner.count("status"), 1);

    app.tick_at(start + Duration::from_secs(1));
    app.process_external();
    assert_eq!(runner.count("status"), 1);

    app.tick_at(start + app.config.poll_interval() + Duration::from_millis(1));
    app.process_external();
    assert_eq!(runner.count("status"), 2);
}

#[test]
fn test_no_poll_when_logged_out() {
    let (mut app, runner) = test_app();
    app.session.logged_in = false;
    app.tick_at(Instant::now());
    app.process_external();
    assert_eq!(runner.count("status"), 0);
}

#[test]
fn test_poll_suppressed_while_connect_in_flight() {
    let (mut app, runner) = test_app();
    let connect = app.dispatcher.issue(CommandKind::Connect);
    app.tick_at(Instant::now());
    assert_eq!(runner.count("status"), 0);

    assert!(app.dispatcher.complete(connect));
    app.tick_at(Instant::now());
    assert_eq!(runner.count("status"), 1);
}

// === Locations ===

#[test]
fn test_locations_load_sorted_by_ping() {
    let (mut app, runner) = test_app();
    runner.reply("list-locations", CommandOutput::ok(LOCATIONS));
    app.handle_message(Message::RefreshLocations);
    assert!(app.locations.loading);
    app.process_external();

    assert!(!app.locations.loading);
    let cities: Vec<_> = app.locations.visible().iter().map(|e| e.city.clone()).collect();
    assert_eq!(cities, ["New York", "Berlin"]);
    assert_eq!(app.location_table_state.selected(), Some(0));

    app.handle_message(Message::SortLocations(LocationColumn::Ping));
    let cities: Vec<_> = app.locations.visible().iter().map(|e| e.city.clone()).collect();
    assert_eq!(cities, ["Berlin", "New York"]);
}

#[test]
fn test_connect_selected_uses_city_and_switches_tab() {
    let (mut app, runner) = test_app();
    runner.reply("list-locations", CommandOutput::ok(LOCATIONS));
    app.handle_message(Message::RefreshLocations);
    app.process_external();
    app.active_tab = Tab::Locations;
    app.location_table_state.select(Some(1));

    app.handle_message(Message::ConnectSelected);
    assert_eq!(runner.count("connect --location Berlin"), 1);
    assert_eq!(app.active_tab, Tab::Main);
}

#[test]
fn test_connect_selected_without_selection() {
    let (mut app, runner) = test_app();
    app.handle_message(Message::ConnectSelected);
    assert_eq!(toast_text(&app), "Please select a location");
    assert!(runner.calls().iter().all(|c| !c.starts_with("connect")));
}

#[test]
fn test_search_filters_and_empty_term_refetches() {
    let (mut app, runner) = test_app();
    runner.reply("list-locations", CommandOutput::ok(LOCATIONS));
    app.handle_message(Message::RefreshLocations);
    app.process_external();

    app.handle_message(Message::SearchLocations("germ".into()));
    assert_eq!(app.locations.visible().len(), 1);

    app.handle_message(Message::SearchLocations("atlantis".into()));
    assert!(app.locations.visible().is_empty());
    assert_eq!(toast_text(&app), "No locations found matching 'atlantis'");
    assert_eq!(app.location_table_state.selected(), None);

    app.handle_message(Message::SearchLocations("  ".into()));
    app.process_external();
    assert!(app.locations.filter.is_empty());
    assert_eq!(runner.count("list-locations"), 2);
    assert_eq!(app.locations.visible().len(), 2);
}

#[test]
fn test_not_logged_in_from_any_command_offers_login() {
    let cases = [
        ("site-exclusions show", Message::RefreshExclusions),
        ("site-exclusions add example.com", Message::AddExclusion("example.com".into())),
        ("config show", Message::LoadSettings),
        ("list-locations", Message::RefreshLocations),
        ("check-update", Message::CheckUpdate),
        (
            "export-logs --output /tmp/adguard.log",
            Message::ExportLogs("/tmp/adguard.log".into()),
        ),
        ("license", Message::ShowLicense),
    ];
    for (line, msg) in cases {
        let (mut app, runner) = test_app();
        runner.reply(line, failure(1, "You are not logged in"));
        app.handle_message(msg);
        app.process_external();
        assert_eq!(runner.count(line), 1, "{line}");
        assert!(!app.session.logged_in, "{line}");
        assert!(
            matches!(
                app.input_mode,
                InputMode::Confirm {
                    action: ConfirmAction::Login,
                    ..
                }
            ),
            "{line}"
        );
    }
}

// === Settings ===

#[test]
fn test_apply_writes_only_changed_fields() {
    let (mut app, runner) = test_app();
    app.settings.socks_port = "1090".into();
    app.settings.dns_server = "   ".into();
    app.handle_message(Message::ApplySettings);
    app.process_external();

    let writes: Vec<_> = runner
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("config set"))
        .collect();
    assert_eq!(writes, ["config set-socks-port 1090"]);
    assert_eq!(app.toast.as_ref().unwrap().toast_type, ToastType::Success);

    app.handle_message(Message::ApplySettings);
    assert_eq!(toast_text(&app), "No settings changed");
}

#[test]
fn test_apply_failure_reloads_settings() {
    let (mut app, runner) = test_app();
    runner.reply("config set-dns 1.1.1.1", failure(1, "invalid dns"));
    runner.reply("config show", CommandOutput::ok("DNS server: 8.8.8.8\n"));
    app.settings.dns_server = "1.1.1.1".into();
    app.handle_message(Message::ApplySettings);
    app.process_external();

    assert_eq!(app.toast.as_ref().unwrap().toast_type, ToastType::Error);
    assert!(toast_text(&app).contains("Applied 0 of 1"));
    assert_eq!(app.settings.dns_server, "8.8.8.8");
}

#[test]
fn test_apply_not_logged_in_offers_login() {
    let (mut app, runner) = test_app();
    runner.reply("config set-socks-port 1090", failure(1, "You must log in first"));
    app.settings.socks_port = "1090".into();
    app.handle_message(Message::ApplySettings);
    app.process_external();
    assert!(!app.session.logged_in);
    assert!(matches!(
        app.input_mode,
        InputMode::Confirm {
            action: ConfirmAction::Login,
            ..
        }
    ));
    assert_eq!(app.toast.as_ref().unwrap().toast_type, ToastType::Error);
}

#[test]
fn test_invalid_port_is_not_written() {
    let (mut app, runner) = test_app();
    app.settings.socks_port = "99999".into();
    app.handle_message(Message::ApplySettings);
    assert_eq!(toast_text(&app), "Invalid SOCKS port '99999'");
    assert!(runner.calls().is_empty());
}

#[test]
fn test_config_show_fills_form() {
    let (mut app, runner) = test_app();
    runner.reply(
        "config show",
        CommandOutput::ok("VPN mode: SOCKS\nSOCKS port: 1085\nUpdate channel: beta\n"),
    );
    app.handle_message(Message::LoadSettings);
    app.process_external();
    assert_eq!(app.settings.socks_port, "1085");
    assert_eq!(app.settings, app.applied_settings);
}

// === Exclusions ===

#[test]
fn test_exclusion_refresh_and_remove() {
    let (mut app, runner) = test_app();
    runner.reply(
        "site-exclusions show",
        CommandOutput::ok("Exclusion mode: selective\nSite exclusions:\nexample.com\nfoo.org\n"),
    );
    app.handle_message(Message::RefreshExclusions);
    app.process_external();
    assert_eq!(app.exclusions.sites, ["example.com", "foo.org"]);
    assert_eq!(app.exclusion_mode_choice, ExclusionMode::Selective);
    assert_eq!(app.exclusion_list_state.selected(), Some(0));

    app.exclusion_list_state.select(Some(1));
    app.handle_message(Message::RemoveSelectedExclusion);
    app.process_external();
    assert_eq!(runner.count("site-exclusions remove foo.org"), 1);
    assert_eq!(runner.count("site-exclusions show"), 2);
}

#[test]
fn test_exclusion_placeholders() {
    let (mut app, runner) = test_app();
    runner.reply("site-exclusions show", CommandOutput::ok("Exclusion mode: general\n"));
    app.handle_message(Message::RefreshExclusions);
    app.process_external();
    assert_eq!(app.exclusions.placeholder(), Some(constants::MSG_NO_EXCLUSIONS));

    runner.reply("site-exclusions show", failure(1, "backend down"));
    app.handle_message(Message::RefreshExclusions);
    app.process_external();
    assert_eq!(app.exclusions.placeholder(), Some(constants::MSG_EXCLUSIONS_UNAVAILABLE));
    assert_eq!(app.exclusion_list_state.selected(), None);
}

#[test]
fn test_exclusion_input_validation() {
    let (mut app, runner) = test_app();
    app.handle_message(Message::AddExclusion("  ".into()));
    assert_eq!(toast_text(&app), "Please enter a site to add");
    app.handle_message(Message::RemoveSelectedExclusion);
    assert_eq!(toast_text(&app), "Please select an exclusion to remove");
    assert!(runner.calls().is_empty());
}

#[test]
fn test_exclusion_mode_and_clear() {
    let (mut app, runner) = test_app();
    app.handle_message(Message::ApplyExclusionMode(ExclusionMode::Selective));
    app.process_external();
    assert_eq!(runner.count("site-exclusions mode selective"), 1);
    assert_eq!(toast_text(&app), "Exclusion mode set to 'selective'");

    app.handle_message(Message::RequestClearExclusions);
    assert!(matches!(
        app.input_mode,
        InputMode::Confirm {
            action: ConfirmAction::ClearExclusions,
            ..
        }
    ));
    press(&mut app, KeyCode::Char('y'));
    app.process_external();
    assert_eq!(runner.count("site-exclusions clear"), 1);
    assert_eq!(app.input_mode, InputMode::Normal);
}

// === Account ===

#[test]
fn test_login_form_flow() {
    let (mut app, runner) = test_app();
    app.session.logged_in = false;
    runner.reply(
        "login --username me@example.com --password hunter2",
        CommandOutput::ok("Successfully logged in as me@example.com"),
    );

    press(&mut app, KeyCode::Char('l'));
    assert!(matches!(app.input_mode, InputMode::Login { .. }));
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.login_notice.as_deref(), Some(constants::MSG_LOGIN_REQUIRED_FIELDS));

    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "me@example.com");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "hunter2");
    press(&mut app, KeyCode::Enter);
    app.process_external();

    assert!(app.session.logged_in);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.login_notice, None);
    assert_eq!(runner.count("status"), 1);
}

#[test]
fn test_login_failure_keeps_form_open() {
    let (mut app, runner) = test_app();
    app.session.logged_in = false;
    runner.reply("login --username a --password b", failure(1, "invalid credentials"));
    app.handle_message(Message::ShowLogin);
    app.handle_message(Message::SubmitLogin {
        username: "a".into(),
        password: "b".into(),
    });
    assert_eq!(app.login_notice.as_deref(), Some(constants::MSG_LOGGING_IN));
    app.process_external();
    assert!(!app.session.logged_in);
    assert!(matches!(app.input_mode, InputMode::Login { .. }));
    assert_eq!(app.login_notice.as_deref(), Some(constants::MSG_LOGIN_FAILED));
}

#[test]
fn test_logout_requires_confirmation() {
    let (mut app, runner) = test_app();
    runner.reply("logout", CommandOutput::ok("Successfully logged out"));
    app.handle_message(Message::RequestLogout);
    assert!(runner.calls().is_empty());
    app.handle_message(Message::Confirm(ConfirmAction::Logout));
    app.process_external();
    assert!(!app.session.logged_in);
    assert_eq!(toast_text(&app), "You have been logged out from AdGuard VPN");
}

#[test]
fn test_logout_failure_reported() {
    let (mut app, runner) = test_app();
    runner.reply("logout", CommandOutput::ok("Something odd happened"));
    app.handle_message(Message::Confirm(ConfirmAction::Logout));
    app.process_external();
    assert!(app.session.logged_in);
    assert_eq!(toast_text(&app), "Could not log out properly. See logs for details.");
}

// === Startup ===

#[test]
fn test_startup_reports_permission_and_login_problems() {
    let (mut app, runner) = test_app();
    app.session.logged_in = false;
    runner.reply(
        "status",
        failure(1, "Before connecting to a location, you must log in"),
    );
    app.start(true);
    app.process_external();

    // The fake path does not exist on disk.
    assert!(app.session.permission_problem.is_some());
    assert_eq!(app.toast.as_ref().unwrap().toast_type, ToastType::Warning);
    assert!(!app.session.logged_in);
    assert!(matches!(
        app.input_mode,
        InputMode::Confirm {
            action: ConfirmAction::Login,
            ..
        }
    ));
    assert_eq!(runner.count("list-locations"), 1);
    assert_eq!(runner.count("site-exclusions show"), 1);
    assert_eq!(runner.count("config show"), 1);
}

#[test]
fn test_startup_login_check_passes() {
    let (mut app, runner) = test_app();
    app.session.logged_in = false;
    runner.reply("status", CommandOutput::ok("VPN is disconnected"));
    app.start(true);
    app.process_external();
    assert!(app.session.logged_in);
    assert_eq!(app.connection_state, ConnectionState::disconnected());
}

#[test]
fn test_startup_fallback_asks_for_executable() {
    let (mut app, _runner) = test_app();
    app.start(false);
    app.process_external();
    assert!(matches!(
        app.input_mode,
        InputMode::Confirm {
            action: ConfirmAction::SelectExecutable,
            ..
        }
    ));
    app.handle_message(Message::Confirm(ConfirmAction::SelectExecutable));
    assert!(matches!(
        app.input_mode,
        InputMode::Prompt {
            purpose: PromptPurpose::SelectExecutable,
            ..
        }
    ));
}

#[cfg(unix)]
#[test]
fn test_select_executable_validation() {
    use std::os::unix::fs::PermissionsExt;

    let (mut app, _runner) = test_app();
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("adguardvpn-cli");
    std::fs::write(&plain, "#!/bin/sh\necho 'v1.2.3'\n").unwrap();
    std::fs::set_permissions(&plain, std::fs::Permissions::from_mode(0o644)).unwrap();

    app.handle_message(Message::SelectExecutable(plain.display().to_string()));
    assert!(toast_text(&app).contains("is not executable"));
    assert_eq!(app.session.source, LocateSource::Candidate);

    std::fs::set_permissions(&plain, std::fs::Permissions::from_mode(0o755)).unwrap();
    app.handle_message(Message::SelectExecutable(plain.display().to_string()));
    app.process_external();
    assert_eq!(app.session.executable, plain);
    assert_eq!(app.session.source, LocateSource::Manual);
    assert_eq!(app.session.cli_version.as_deref(), Some("v1.2.3"));
}

// === About ===

#[test]
fn test_check_update_then_install() {
    let (mut app, runner) = test_app();
    runner.reply("check-update", CommandOutput::ok("Update available: 1.4.0"));
    app.handle_message(Message::CheckUpdate);
    app.process_external();
    assert!(matches!(
        app.input_mode,
        InputMode::Confirm {
            action: ConfirmAction::InstallUpdate,
            ..
        }
    ));
    press(&mut app, KeyCode::Enter);
    app.process_external();
    assert_eq!(runner.count("update --yes"), 1);
}

#[test]
fn test_check_update_latest() {
    let (mut app, runner) = test_app();
    runner.reply("check-update", CommandOutput::ok("No updates found"));
    app.handle_message(Message::CheckUpdate);
    app.process_external();
    assert_eq!(toast_text(&app), "You are running the latest version");
}

#[test]
fn test_license_opens_viewer() {
    let (mut app, runner) = test_app();
    runner.reply("license", CommandOutput::ok("\x1b[1mEULA\x1b[0m text"));
    app.handle_message(Message::ShowLicense);
    app.process_external();
    let InputMode::Viewer { content, .. } = &app.input_mode else {
        panic!("viewer not open");
    };
    assert_eq!(content, "EULA text");
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn test_export_logs_prompt() {
    let (mut app, runner) = test_app();
    app.active_tab = Tab::About;
    press(&mut app, KeyCode::Char('e'));
    let InputMode::Prompt { value, .. } = &app.input_mode else {
        panic!("prompt not open");
    };
    assert_eq!(value, constants::DEFAULT_EXPORT_PATH);

    for _ in 0..constants::DEFAULT_EXPORT_PATH.len() {
        press(&mut app, KeyCode::Backspace);
    }
    type_text(&mut app, "/tmp/out.zip");
    press(&mut app, KeyCode::Enter);
    app.process_external();
    assert_eq!(runner.count("export-logs --output /tmp/out.zip"), 1);
    assert_eq!(app.toast.as_ref().unwrap().toast_type, ToastType::Success);
}

// === Keys ===

#[test]
fn test_tab_keys() {
    let (mut app, _runner) = test_app();
    press(&mut app, KeyCode::Char('2'));
    assert_eq!(app.active_tab, Tab::Locations);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.active_tab, Tab::Settings);
    press(&mut app, KeyCode::BackTab);
    press(&mut app, KeyCode::BackTab);
    assert_eq!(app.active_tab, Tab::Main);
    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit);
}

#[test]
fn test_modal_toast_swallows_key() {
    let (mut app, _runner) = test_app();
    app.show_toast("broken", ToastType::Error);
    press(&mut app, KeyCode::Char('2'));
    assert!(app.toast.is_none());
    assert_eq!(app.active_tab, Tab::Main);
}

#[test]
fn test_settings_edit_keys() {
    let (mut app, _runner) = test_app();
    app.active_tab = Tab::Settings;
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.settings.vpn_mode, crate::state::VpnMode::Socks);

    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    for _ in 0..4 {
        press(&mut app, KeyCode::Backspace);
    }
    type_text(&mut app, "1081");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.settings.socks_port, "1081");
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn test_action_menu_runs_item() {
    let (mut app, runner) = test_app();
    app.active_tab = Tab::Locations;
    press(&mut app, KeyCode::Char('x'));
    assert!(app.show_action_menu);
    press(&mut app, KeyCode::Char('r'));
    assert!(!app.show_action_menu);
    assert_eq!(runner.count("list-locations"), 1);
}

#[test]
fn test_search_keys() {
    let (mut app, runner) = test_app();
    runner.reply("list-locations", CommandOutput::ok(LOCATIONS));
    app.handle_message(Message::RefreshLocations);
    app.process_external();
    app.active_tab = Tab::Locations;

    press(&mut app, KeyCode::Char('/'));
    type_text(&mut app, "york");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.locations.filter, "york");
    assert_eq!(app.locations.visible().len(), 1);
}
