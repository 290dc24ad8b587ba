/// Logging configuration.
///
/// Logs go to stderr so stdout only carries the report. With a log directory,
/// each run also appends to `{log_dir}/report.log` behind a session separator.
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "report.log";

/// Initializes logging for one report run.
///
/// # Arguments
///
/// * `log_dir` - Optional directory receiving a persistent copy of the logs
/// * `input` - Input file name, recorded in the session separator
pub fn init_logging(log_dir: Option<&Path>, input: &Path) -> Result<()> {
    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
            write_session_separator(dir, input)?;

            let file_appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false) // No ANSI codes in log files
                    .with_target(true)
                    .with_line_number(true),
            )
        }
        None => None,
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    // Quiet by default, override via RUST_LOG
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .ok(); // Ignore error if already initialized

    tracing::debug!("Logging initialized for {}", input.display());

    Ok(())
}

fn write_session_separator(log_dir: &Path, input: &Path) -> Result<()> {
    let separator = format!(
        "\n{sep}\n[{ts}] New report: {input}\n{sep}\n",
        sep = "=".repeat(80),
        ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        input = input.display()
    );

    let log_path = log_dir.join(LOG_FILE_NAME);
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;
    writeln!(file, "{}", separator)
        .with_context(|| format!("Failed to write log file: {}", log_path.display()))?;

    Ok(())
}
