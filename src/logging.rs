use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Log file written inside the data directory while the TUI is up
pub const LOG_FILE_NAME: &str = "worktime.log";

const DEFAULT_FILTER: &str = "worktime=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Route logs to `<log_dir>/worktime.log`; the terminal belongs to the UI.
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init_file_logging(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(guard)
}

/// Log to stderr for the non-interactive subcommands
pub fn init_stderr_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_initialization_is_reported() {
        // Whichever call installs the global subscriber, the next one must fail loudly
        let _ = init_stderr_logging();
        let err = init_stderr_logging().unwrap_err();
        assert!(err.to_string().starts_with("Failed to initialize logging"));
    }
}
