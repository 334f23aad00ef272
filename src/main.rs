mod app;
mod config;
mod coordinator;
mod dirty;
mod domain;
mod input;
mod logging;
mod notifications;
mod persistence;
mod report;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::App;
use chrono::Local;
use clap::{Parser, Subcommand};
use config::Config;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::format_seconds;
use persistence::{default_data_dir, ensure_dir, JsonTaskRepository, PersistenceService};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "worktime")]
#[command(version, about = "Track time spent on tasks from the terminal", long_about = None)]
struct Cli {
    /// Directory holding the saved state, config and log
    #[arg(long, global = true, env = "WORKTIME_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to config.toml in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the saved tasks as a text report
    Export {
        /// Output file. Defaults to time_tracking_<timestamp>.txt in the export directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the saved tasks and their total
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    let config = Config::load(cli.config.as_deref(), &data_dir)?;
    let persistence = PersistenceService::new(
        JsonTaskRepository::new(&data_dir),
        config.resolved_export_dir(),
    );

    match cli.command {
        Some(Commands::Export { output }) => {
            logging::init_stderr_logging()?;
            export_saved(&persistence, output)
        }
        Some(Commands::Status) => {
            logging::init_stderr_logging()?;
            print_status(&persistence)
        }
        None => {
            ensure_dir(&data_dir)?;
            let _guard = logging::init_file_logging(&data_dir)?;
            info!(
                data_dir = %data_dir.display(),
                export_dir = %persistence.export_dir().display(),
                "starting"
            );
            run_tui(config, persistence)
        }
    }
}

fn export_saved(persistence: &PersistenceService, output: Option<PathBuf>) -> Result<()> {
    let state = persistence
        .load_document()
        .context("Failed to load application state")?;
    let Some(state) = state.filter(|s| !s.tasks.is_empty()) else {
        println!("No saved data found.");
        return Ok(());
    };

    let path = persistence
        .export_persisted(&state.tasks, output.as_deref(), Local::now())
        .context("Failed to export tasks")?;
    println!("Data exported to {}", path.display());
    Ok(())
}

fn print_status(persistence: &PersistenceService) -> Result<()> {
    let state = persistence
        .load_document()
        .context("Failed to load application state")?;
    let Some(state) = state.filter(|s| !s.tasks.is_empty()) else {
        println!("No saved data found.");
        return Ok(());
    };

    println!(
        "Saved {} ({})",
        state.saved_at.format("%Y-%m-%d %H:%M:%S"),
        persistence.repository().state_path().display()
    );
    for (i, task) in state.tasks.iter().enumerate() {
        println!("{:>3}. {}  {}", i + 1, format_seconds(task.elapsed_seconds), task.description);
    }
    println!("Total Time: {}", format_seconds(state.total_seconds()));
    Ok(())
}

fn run_tui(config: Config, persistence: PersistenceService) -> Result<()> {
    let mut app = App::new(config, persistence);
    let now = Instant::now();
    app.restore_on_startup(now);
    app.start_clock(now);

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Save on exit, then tear down
    if let Err(e) = app.save_on_exit(Instant::now()) {
        error!(error = %format!("{:#}", e), "save on exit failed");
        eprintln!("Error saving state: {:#}", e);
    }
    app.cleanup();

    if let Err(err) = &result {
        error!(error = %err, "event loop failed");
    }
    info!("exiting");
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let poll_interval = app.config().poll_interval();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(poll_interval)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key, Instant::now()) {
                    app.should_quit = true;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        app.tick(Instant::now());
    }
}
