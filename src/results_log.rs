use crate::app_dirs::AppDirs;
use crate::error::StoreError;
use crate::session::SessionResult;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// One row of the results history
#[derive(Debug, Serialize)]
struct ResultRecord<'a> {
    date: String,
    mode: String,
    difficulty: String,
    wpm: u32,
    accuracy: u32,
    correct_words: usize,
    total_words: usize,
    errors: usize,
    elapsed_secs: &'a str,
}

/// Append-only CSV history of finished tests
#[derive(Debug, Clone)]
pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::results_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn append(&self, result: &SessionResult) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        // If the log file doesn't exist, we need to emit a header
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        let elapsed = format!("{:.2}", result.elapsed_secs);
        writer
            .serialize(ResultRecord {
                date: result.finished_at.format("%c").to_string(),
                mode: result.mode.to_string(),
                difficulty: result.difficulty.to_string(),
                wpm: result.wpm,
                accuracy: result.accuracy,
                correct_words: result.correct_words,
                total_words: result.total_words,
                errors: result.errors,
                elapsed_secs: &elapsed,
            })
            .map_err(|source| StoreError::Csv {
                path: self.path.clone(),
                source,
            })?;

        writer.flush().map_err(|e| StoreError::io(&self.path, e))
    }

    /// Append, logging instead of failing
    pub fn record(&self, result: &SessionResult) {
        if let Err(e) = self.append(result) {
            tracing::warn!("failed to record result: {e}");
        }
    }
}
