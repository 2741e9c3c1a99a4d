use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "typespeed").map(|pd| pd.config_dir().join("config.json"))
    }

    /// Default log file; under $HOME/.local/state when HOME is set.
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("typespeed");
            Some(state_dir.join("typespeed.log"))
        } else {
            ProjectDirs::from("", "", "typespeed")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("typespeed.log"))
        }
    }
}
