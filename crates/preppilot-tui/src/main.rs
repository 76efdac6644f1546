use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use preppilot_core::{Config, FileStore};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "preppilot")]
#[command(version, about = "Turn a job description into an interview prep pack")]
struct Cli {
    /// Base URL of the generation backend (overrides PREPPILOT_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Directory the PDF export is written to
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Open the last generated prep pack instead of an empty form
    #[arg(long)]
    resume_last: bool,

    /// Log file (defaults to preppilot.log in the user cache directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("preppilot")
        .join("preppilot.log")
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("preppilot=info,preppilot_core=info")),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_file.clone().unwrap_or_else(default_log_file))?;

    // Priority: flag, then environment (.env included), then config file
    let mut config = Config::load_with_env();
    config.apply_env(cli.backend_url.clone());
    if let Some(dir) = cli.export_dir.clone() {
        config.export_dir = Some(dir);
    }
    tracing::info!(
        backend = config.backend_url.as_deref().unwrap_or("<unset>"),
        export_dir = %config.export_dir().display(),
        "starting"
    );

    let mut app = App::new(config, FileStore::in_cache_dir());
    if cli.resume_last {
        app.resume_last();
    }

    // Install panic hook to restore terminal on panic
    tui::install_panic_hook();

    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let result = run(&mut app, &mut terminal, &mut events).await;

    tui::restore()?;
    result
}

async fn run(app: &mut App, terminal: &mut tui::Tui, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(app, event).await?;
        }
    }
    Ok(())
}
