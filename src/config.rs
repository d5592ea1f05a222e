use std::path::PathBuf;
use std::time::Duration;

use crate::alert::AlertKind;
use crate::app_dirs::AppDirs;
use crate::durations::Durations;

/// Environment variable holding a `tracing` filter directive
pub const LOG_ENV: &str = "POMODORO_LOG";

pub const DEFAULT_TICK_MS: u64 = 1000;

/// Everything the binary needs to build and drive a controller.
///
/// Built once from the command line; nothing here is written back to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub durations: Durations,
    pub alert: AlertKind,
    /// Wall-clock length of one timer second
    pub tick_interval: Duration,
    pub headless: bool,
    /// Stop after this many timer seconds (headless only)
    pub max_ticks: Option<u64>,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            durations: Durations::default(),
            alert: AlertKind::Bell,
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            headless: false,
            max_ticks: None,
            log_file: AppDirs::log_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let s = Settings::default();
        assert_eq!(s.durations, Durations::default());
        assert_eq!(s.alert, AlertKind::Bell);
        assert_eq!(s.tick_interval, Duration::from_secs(1));
        assert!(!s.headless);
        assert_eq!(s.max_ticks, None);
    }
}
