//! Courtside - volleyball match tracker
//!
//! A line-oriented console for keeping score, rotating the lineup and
//! keeping a history of matches.

use std::io::{self, BufRead, Write};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod console;
mod state;

use console::Flow;

fn main() {
    let config = match config::AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging; RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    tracing::info!("Starting Courtside");

    let mut app_state = match state::AppState::new(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&mut app_state) {
        tracing::error!("Console failed: {}", e);
        std::process::exit(1);
    }
}

fn run(app_state: &mut state::AppState) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    match app_state.database_path() {
        Some(path) => writeln!(stdout, "Matches are saved in {}", path.display())?,
        None => writeln!(stdout, "Matches are kept in memory only")?,
    }
    console::execute(&mut app_state.controller, commands::Command::Status, &mut stdout)?;
    writeln!(stdout, "Type 'help' for commands")?;

    for line in stdin.lock().lines() {
        let line = line?;
        match commands::parse(&line) {
            Ok(Some(command)) => {
                if console::execute(&mut app_state.controller, command, &mut stdout)? == Flow::Quit {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => writeln!(stdout, "{}", e)?,
        }
        stdout.flush()?;
    }

    tracing::info!("Courtside closed");
    Ok(())
}
