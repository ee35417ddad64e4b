use crate::app_dirs::AppDirs;
use crate::session::{ModeKind, SessionConfig, SessionMode};
use crate::vocabulary::Difficulty;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default test settings, remembered between runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: ModeKind,
    pub number_of_secs: u32,
    pub number_of_words: usize,
    pub difficulty: Difficulty,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ModeKind::Time,
            number_of_secs: 30,
            number_of_words: 25,
            difficulty: Difficulty::Medium,
        }
    }
}

impl Config {
    pub fn session_config(&self) -> SessionConfig {
        let mode = match self.mode {
            ModeKind::Time => SessionMode::Time {
                secs: self.number_of_secs.max(1),
            },
            ModeKind::Words => SessionMode::Words {
                count: self.number_of_words.max(1),
            },
            ModeKind::Practice => SessionMode::Practice,
        };
        SessionConfig {
            mode,
            difficulty: self.difficulty,
        }
    }

    /// Take over the settings of a running session, keeping the
    /// duration or word count of the mode it is not in
    pub fn absorb(&mut self, session: SessionConfig) {
        self.mode = session.mode.kind();
        match session.mode {
            SessionMode::Time { secs } => self.number_of_secs = secs,
            SessionMode::Words { count } => self.number_of_words = count,
            SessionMode::Practice => {}
        }
        self.difficulty = session.difficulty;
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => tracing::warn!("ignoring malformed {}: {e}", self.path.display()),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
