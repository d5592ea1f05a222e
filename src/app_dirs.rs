use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("pomodoro");
            state_dir.join("pomodoro.log")
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", "pomodoro") {
            proj_dirs.data_local_dir().join("pomodoro.log")
        } else {
            PathBuf::from("pomodoro.log")
        }
    }
}
