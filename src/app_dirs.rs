use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "typeflow")
    }

    pub fn config_dir() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Log and results history live under $HOME/.local/state/typeflow
    pub fn state_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("typeflow")
        } else {
            Self::project()
                .map(|pd| pd.data_local_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    pub fn progress_path() -> PathBuf {
        Self::config_dir().join("lessons-progress.json")
    }

    pub fn theme_path() -> PathBuf {
        Self::config_dir().join("theme")
    }

    pub fn results_path() -> PathBuf {
        Self::state_dir().join("results.csv")
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir().join("typeflow.log")
    }
}
