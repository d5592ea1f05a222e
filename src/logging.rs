use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LOG_ENV;
use crate::error::{PomodoroError, Result};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Send logs to `path`. The terminal belongs to the UI, so nothing goes to stdout.
///
/// Keep the returned guard alive for the life of the program or buffered lines are lost.
pub fn init_file_logging(path: &Path) -> Result<WorkerGuard> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| PomodoroError::LogFileName(path.to_path_buf()))?;

    std::fs::create_dir_all(dir).map_err(|source| PomodoroError::LogDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| PomodoroError::LogInit(err.to_string()))?;

    Ok(guard)
}

/// Headless mode prints snapshots on stdout, so logs go to stderr
pub fn init_stderr_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| PomodoroError::LogInit(err.to_string()))
}
