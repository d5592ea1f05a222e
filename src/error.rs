//! Error types for the ambient parts of the timer.
//!
//! The session state machine itself never fails: out-of-range requests are
//! silent no-ops. These errors cover startup and the best-effort alert.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PomodoroError {
    #[error("focus duration must be between {min} and {max} minutes in steps of {step}, got {value}")]
    InvalidFocusDuration {
        value: u32,
        min: u32,
        max: u32,
        step: u32,
    },

    #[error("break duration must be between {min} and {max} minutes, got {value}")]
    InvalidBreakDuration { value: u32, min: u32, max: u32 },

    #[error("could not prepare log directory {path}: {source}")]
    LogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("log file path has no file name: {0}")]
    LogFileName(PathBuf),

    #[error("could not install log subscriber: {0}")]
    LogInit(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Failures of the completion alert. Always logged and discarded by the controller.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("failed to ring terminal bell: {0}")]
    Bell(#[source] std::io::Error),

    #[error("failed to spawn sound player {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no sound player available")]
    NoPlayer,
}

pub type Result<T, E = PomodoroError> = std::result::Result<T, E>;
