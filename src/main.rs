use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use novel_refiner::config::AppConfig;
use novel_refiner::core::logging;
use novel_refiner::tui::app::AppState;
use novel_refiner::tui::events::AppEvent;

/// Terminal chapter editor with an audit and revision assistant.
#[derive(Debug, Parser)]
#[command(name = "novel-refiner", version, about)]
struct Args {
    /// Read configuration from this file instead of the default location.
    #[arg(long, env = "NOVEL_REFINER_CONFIG")]
    config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_config {
        let config = match &args.config {
            Some(path) => AppConfig::load_from(path)?,
            None => AppConfig::load(),
        };
        logging::init_stdout(&config.log.level);
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => AppConfig::load_or_default(path),
        None => AppConfig::load(),
    };

    let _log_guard = logging::init_tui(&config.log_dir(), &config.log.level);
    log::info!("{} v{} starting", novel_refiner::NAME, novel_refiner::VERSION);

    let runtime = tokio::runtime::Runtime::new()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if config.tui.mouse_enabled {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = runtime.block_on(async {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        spawn_shutdown_listener(event_tx);
        let mut app = AppState::new(&config, event_rx);
        app.run(&mut terminal, config.tick_rate()).await
    });

    // Restore terminal
    disable_raw_mode()?;
    if config.tui.mouse_enabled {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result {
        Ok(()) => {
            log::info!("{} exiting", novel_refiner::NAME);
            Ok(())
        }
        Err(e) => {
            log::error!("Event loop failed: {e}");
            Err(e.into())
        }
    }
}

/// Turn SIGTERM into a regular quit so the terminal is restored.
#[cfg(unix)]
fn spawn_shutdown_listener(tx: mpsc::UnboundedSender<AppEvent>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                if term.recv().await.is_some() {
                    log::info!("SIGTERM received");
                    let _ = tx.send(AppEvent::Quit);
                }
            }
            Err(e) => log::warn!("Cannot listen for SIGTERM: {e}"),
        }
    });
}

#[cfg(not(unix))]
fn spawn_shutdown_listener(_tx: mpsc::UnboundedSender<AppEvent>) {}
