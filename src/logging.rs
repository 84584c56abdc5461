//! Tracing subscriber setup for the journal binary.
//!
//! Events go to the systemd journal when one is reachable (Linux only);
//! everywhere else they are appended to a daily `travelog.log` file. Stdout
//! is left alone because the command-line output is printed there.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "TRAVELOG_LOG";

/// Install the global subscriber. Fails if one is already installed.
///
/// `TRAVELOG_LOG` takes any `EnvFilter` directive, e.g. `debug` or
/// `travelog::journal=trace`; without it only `info` and above is kept.
/// `log_dir` picks the file sink's directory and is ignored for journald.
pub fn init(log_dir: Option<PathBuf>) -> Result<()> {
    let filter = || EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(target_os = "linux")]
    {
        match tracing_journald::layer() {
            Ok(journald) => {
                tracing_subscriber::registry()
                    .with(filter())
                    .with(journald)
                    .try_init()?;
                tracing::debug!("Logging to journald");
                return Ok(());
            }
            Err(e) => eprintln!("journald unavailable ({}), logging to file", e),
        }
    }

    let dir = log_dir.unwrap_or_else(default_log_dir);
    std::fs::create_dir_all(&dir)?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, "travelog.log"));
    // Dropping the guard would stop the background writer
    static WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
    let _ = WRITER_GUARD.set(guard);

    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()?;
    tracing::debug!("Logging to {}", dir.display());
    Ok(())
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("travelog")
        .join("logs")
}
