//! AdGuard TUI - terminal front-end for the AdGuard VPN command-line client.

mod app;
mod cli;
mod config;
mod constants;
mod core;
mod error;
mod event;
mod logger;
mod message;
mod state;
mod theme;
mod ui;
mod utils;

use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;

use crate::app::App;
use crate::cli::args::Args;
use crate::config::AppConfig;
use crate::core::locator::Locator;
use crate::core::runner::CliRunner;
use crate::event::{Event, EventHandler};
use crate::message::Message;
use crate::state::Session;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let (config_dir, config_source) = config::resolve_config_dir(args.config_dir.clone());
    let config = AppConfig::load(&config_dir);

    let override_path = args.cli.clone().or_else(|| config.cli_path.clone());
    let resolution = Locator::new(override_path).locate();

    if let Some(command) = &args.command {
        let ctx = cli::commands::Context {
            config_dir: &config_dir,
            config_source,
            config: &config,
            resolution: &resolution,
        };
        return cli::commands::handle_command(command, &ctx);
    }

    if config.log_to_file {
        logger::init_file_sink(&config_dir.join(constants::LOGS_DIR_NAME));
    }
    logger::info(
        "INIT",
        &format!(
            "Config dir {} ({})",
            config_dir.display(),
            config_source.describe()
        ),
    );

    let found = resolution.found();
    let session = Session::new(resolution.path.clone(), resolution.source);
    let runner = Arc::new(CliRunner::new(resolution.path));
    let tick_rate = config.tick_rate_ms();

    let mut app = App::new(config, session, runner);
    let events = EventHandler::new(tick_rate);
    app.set_waker(events.waker());

    let mut terminal = ratatui::init();
    if let Ok(size) = terminal.size() {
        app.handle_message(Message::Resize(size.width, size.height));
    }
    app.start(found);
    let result = run(&mut terminal, &mut app, &events);
    ratatui::restore();
    result
}

fn run(terminal: &mut ratatui::DefaultTerminal, app: &mut App, events: &EventHandler) -> Result<()> {
    while !app.should_quit {
        app.process_external();
        terminal.draw(|frame| ui::render(frame, app))?;

        match events.next()? {
            Event::Key(key) => app.handle_key(key),
            Event::Tick => app.on_tick(),
            Event::Resize(w, h) => app.handle_message(Message::Resize(w, h)),
            Event::Wake => app.process_external(),
        }
    }
    logger::info("INIT", "Shutting down");
    Ok(())
}
