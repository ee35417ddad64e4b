use crate::app_dirs::AppDirs;
use crate::error::StoreError;
use crate::session::{SessionConfig, SessionMode};
use crate::vocabulary::Difficulty;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const TOTAL_LESSONS: u32 = 8;
/// Minimum accuracy (percent) that completes a lesson
pub const MASTERY_THRESHOLD: u32 = 90;
/// Words in every lesson text
pub const LESSON_WORDS: usize = 25;

/// Completed lessons and the last accuracy scored on each
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonProgress {
    #[serde(default)]
    pub completed: Vec<u32>,
    #[serde(default)]
    pub scores: BTreeMap<u32, u32>,
}

pub trait ProgressStore {
    fn load(&self) -> Result<LessonProgress, StoreError>;
    fn save(&self, progress: &LessonProgress) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct FileProgressStore {
    path: PathBuf,
}

impl FileProgressStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::progress_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileProgressStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressStore for FileProgressStore {
    fn load(&self) -> Result<LessonProgress, StoreError> {
        let bytes = fs::read(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::malformed(&self.path, e))
    }

    fn save(&self, progress: &LessonProgress) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let data =
            serde_json::to_vec_pretty(progress).map_err(|e| StoreError::malformed(&self.path, e))?;
        fs::write(&self.path, data).map_err(|e| StoreError::io(&self.path, e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalProgress {
    pub completed: usize,
    pub total: u32,
    pub percentage: u32,
}

/// What a lesson card shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonStatus {
    Locked,
    Unlocked,
    Completed { score: u32 },
}

/// Text settings for a lesson: 25 words, harder vocabulary as lessons advance
pub fn lesson_session(lesson: u32) -> SessionConfig {
    let difficulty = match lesson {
        0..=3 => Difficulty::Easy,
        4..=6 => Difficulty::Medium,
        _ => Difficulty::Hard,
    };
    SessionConfig {
        mode: SessionMode::Words {
            count: LESSON_WORDS,
        },
        difficulty,
    }
}

/// Lesson gating over a progress store.
///
/// Lesson 1 is always open; lesson N opens once lesson N-1 is completed,
/// and a lesson completes when scored at or above the mastery threshold.
#[derive(Debug)]
pub struct LessonBook<S: ProgressStore = FileProgressStore> {
    store: S,
    progress: LessonProgress,
}

impl<S: ProgressStore> LessonBook<S> {
    /// Read progress once; a missing or unreadable store starts empty
    pub fn open(store: S) -> Self {
        let progress = match store.load() {
            Ok(progress) => progress,
            Err(e) if e.is_not_found() => LessonProgress::default(),
            Err(e) => {
                tracing::warn!("lesson progress unreadable, starting fresh: {e}");
                LessonProgress::default()
            }
        };
        Self { store, progress }
    }

    pub fn progress(&self) -> &LessonProgress {
        &self.progress
    }

    pub fn is_unlocked(&self, lesson: u32) -> bool {
        lesson == 1 || (lesson > 1 && self.is_completed(lesson - 1))
    }

    pub fn is_completed(&self, lesson: u32) -> bool {
        self.progress.completed.contains(&lesson)
    }

    pub fn score(&self, lesson: u32) -> u32 {
        self.progress.scores.get(&lesson).copied().unwrap_or(0)
    }

    pub fn status(&self, lesson: u32) -> LessonStatus {
        if !self.is_unlocked(lesson) {
            LessonStatus::Locked
        } else if self.is_completed(lesson) {
            LessonStatus::Completed {
                score: self.score(lesson),
            }
        } else {
            LessonStatus::Unlocked
        }
    }

    /// Record a score; completes the lesson when it reaches mastery.
    ///
    /// Returns whether the lesson is completed afterwards.
    pub fn complete_lesson(&mut self, lesson: u32, accuracy: u32) -> bool {
        self.progress.scores.insert(lesson, accuracy);
        if accuracy >= MASTERY_THRESHOLD && !self.is_completed(lesson) {
            self.progress.completed.push(lesson);
            tracing::info!(lesson, accuracy, "lesson completed");
        }
        self.persist();
        self.is_completed(lesson)
    }

    /// First lesson that is open but not yet completed
    pub fn next_unlocked_lesson(&self) -> Option<u32> {
        (1..=TOTAL_LESSONS).find(|&n| self.is_unlocked(n) && !self.is_completed(n))
    }

    pub fn total_progress(&self) -> TotalProgress {
        let completed = self.progress.completed.len();
        TotalProgress {
            completed,
            total: TOTAL_LESSONS,
            percentage: ((completed as f64 / TOTAL_LESSONS as f64) * 100.0).round() as u32,
        }
    }

    pub fn reset_progress(&mut self) {
        self.progress = LessonProgress::default();
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.progress) {
            tracing::warn!("failed to save lesson progress: {e}");
        }
    }
}
