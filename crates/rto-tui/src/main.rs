//! rto - a return-to-office attendance tracker.
//!
//! With no subcommand this opens a keyboard-driven calendar for recording
//! office and flex-credit badge-ins. Subcommands print reports for scripting.

mod app;
mod commands;
mod config;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rto_core::Store;

use app::{App, AppState};
use config::Config;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

// ============================================================================
// Command line
// ============================================================================

#[derive(Parser)]
#[command(name = "rto", version, about = "Track office attendance against a return-to-office goal")]
struct Cli {
    /// Data directory (default: $RTO_DATA_DIR or ./config)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Create default data files (never overwrites existing ones)
    Init,
    /// Show statistics for a period (default: the period containing today)
    Stats {
        /// Period key, e.g. Q1_2025
        period: Option<String>,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Show statistics for every period starting in a year
    Year {
        /// Calendar year (default: this year)
        year: Option<i32>,
    },
    /// List holidays
    Holidays,
    /// List vacations
    Vacations,
    /// Commit the data directory to git, pushing when a remote exists
    Backup {
        /// Remote URL to set as origin
        #[arg(short, long)]
        remote: Option<String>,
        /// Directory to back up (default: the data directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// Log to stderr; used by the report subcommands.
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Log to a daily file so the alternate screen stays clean. Falls back to
/// no logging when the cache directory is unavailable.
fn init_file_tracing(config: &Config) -> Option<WorkerGuard> {
    let log_dir = config.log_dir().ok()?;
    std::fs::create_dir_all(&log_dir).ok()?;

    let appender = tracing_appender::rolling::daily(log_dir, "rto.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();
    Some(guard)
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = Config::load(cli.data_dir);
    let store = Store::new(config.data_dir.clone());
    let today = Local::now().date_naive();

    let Some(command) = cli.command else {
        let _guard = init_file_tracing(&config);
        return run_tui(store, today);
    };

    init_tracing();
    let mut out = io::stdout().lock();

    if !matches!(command, Command::Init) {
        commands::ensure_initialized(&store)?;
    }

    match command {
        Command::Init => commands::run_init(&store, &mut out),
        Command::Stats { period, json } => {
            commands::run_stats(&store, period.as_deref(), json, today, &mut out)
        }
        Command::Year { year } => commands::run_year(&store, year, today, &mut out),
        Command::Holidays => commands::run_holidays(&store, &mut out),
        Command::Vacations => commands::run_vacations(&store, &mut out),
        Command::Backup { remote, dir } => {
            let dir = dir.unwrap_or_else(|| config.data_dir.clone());
            commands::run_backup(&dir, remote.as_deref(), &mut out)
        }
    }
}

fn run_tui(store: Store, today: chrono::NaiveDate) -> Result<()> {
    if store.needs_init() {
        store
            .init()
            .with_context(|| format!("Failed to initialize {}", store.dir().display()))?;
    }
    let mut app = App::new(store, today)?;
    info!("rto starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("rto shutting down");
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
