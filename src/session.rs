use crate::error::VocabularyError;
use crate::evaluator::{Growth, InputOutcome, Scoring, TextPlan, TypingEvaluator};
use crate::text_buffer::TextBuffer;
use crate::timer::{Clock, Countdown, SystemClock, TickOutcome};
use crate::vocabulary::{Difficulty, Vocabulary};
use crate::word_source::{DefaultRng, WordSource};
use chrono::{DateTime, Local};
use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Words generated up front for a timed test
pub const TIME_MODE_WORDS: usize = 100;
/// Words generated up front for practice
pub const PRACTICE_WORDS: usize = 50;

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModeKind {
    #[default]
    Time,
    Words,
    Practice,
}

impl ModeKind {
    pub fn next(self) -> ModeKind {
        match self {
            ModeKind::Time => ModeKind::Words,
            ModeKind::Words => ModeKind::Practice,
            ModeKind::Practice => ModeKind::Time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Test bounded by a countdown
    Time { secs: u32 },
    /// Test bounded by a fixed number of words
    Words { count: usize },
    /// Endless, untimed practice
    Practice,
}

impl SessionMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            SessionMode::Time { .. } => ModeKind::Time,
            SessionMode::Words { .. } => ModeKind::Words,
            SessionMode::Practice => ModeKind::Practice,
        }
    }

    pub fn plan(&self) -> TextPlan {
        match *self {
            SessionMode::Time { .. } => TextPlan {
                initial_words: TIME_MODE_WORDS,
                growth: Growth::Unbounded,
            },
            SessionMode::Words { count } => TextPlan {
                initial_words: count,
                growth: Growth::Bounded,
            },
            SessionMode::Practice => TextPlan {
                initial_words: PRACTICE_WORDS,
                growth: Growth::Unbounded,
            },
        }
    }

    pub fn scoring(&self) -> Scoring {
        match self {
            SessionMode::Practice => Scoring::Practice,
            _ => Scoring::Test,
        }
    }

    fn countdown_secs(&self) -> u32 {
        match *self {
            SessionMode::Time { secs } => secs,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: SessionMode,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Running,
    Finished,
}

/// Summary of a finished test
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub wpm: u32,
    pub accuracy: u32,
    pub correct_words: usize,
    pub total_words: usize,
    pub errors: usize,
    pub elapsed_secs: f64,
    pub mode: ModeKind,
    pub difficulty: Difficulty,
    pub finished_at: DateTime<Local>,
}

/// Words per minute from characters typed, five characters to a word.
///
/// Zero when no time has passed.
pub fn words_per_minute(chars: usize, elapsed: Duration) -> u32 {
    let minutes = elapsed.as_secs_f64() / 60.0;
    if minutes <= 0.0 {
        return 0;
    }
    ((chars as f64 / 5.0) / minutes).round().max(0.0) as u32
}

/// Count typed words equal to the target word at the same index.
///
/// Tokens are split on single spaces and compared by position only, so one
/// missing or extra word shifts every later comparison.
pub fn count_correct_words(target_prefix: &str, typed: &str) -> usize {
    target_prefix
        .split(' ')
        .zip(typed.split(' '))
        .filter(|(expected, actual)| expected == actual)
        .count()
}

/// Non-empty whitespace separated tokens in the typed text
pub fn count_typed_words(typed: &str) -> usize {
    typed.split_whitespace().count()
}

/// Drives one typing session: Idle, then Running on first input, then
/// Finished when the countdown expires or a bounded text is complete.
/// Practice sessions never finish.
#[derive(Debug)]
pub struct SessionController<R: Rng = DefaultRng, C: Clock = SystemClock> {
    config: SessionConfig,
    evaluator: TypingEvaluator<R>,
    clock: C,
    phase: SessionPhase,
    countdown: Countdown,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
    field: String,
    result: Option<SessionResult>,
}

impl<R: Rng, C: Clock> SessionController<R, C> {
    pub fn new(config: SessionConfig, rng: R, clock: C) -> Result<Self, VocabularyError> {
        let source = WordSource::new(Vocabulary::load(config.difficulty)?, rng);
        let evaluator = TypingEvaluator::new(source, config.mode.plan(), config.mode.scoring());
        Ok(Self::with_evaluator(config, evaluator, clock))
    }

    /// Session over a fixed first text; resets still draw fresh words
    pub fn with_text(
        config: SessionConfig,
        text: &str,
        rng: R,
        clock: C,
    ) -> Result<Self, VocabularyError> {
        let source = WordSource::new(Vocabulary::load(config.difficulty)?, rng);
        let evaluator = TypingEvaluator::with_text(
            source,
            TextBuffer::from_text(text),
            config.mode.plan(),
            config.mode.scoring(),
        );
        Ok(Self::with_evaluator(config, evaluator, clock))
    }

    pub fn with_evaluator(config: SessionConfig, evaluator: TypingEvaluator<R>, clock: C) -> Self {
        Self {
            countdown: Countdown::new(config.mode.countdown_secs()),
            config,
            evaluator,
            clock,
            phase: SessionPhase::Idle,
            started_at: None,
            ended_at: None,
            field: String::new(),
            result: None,
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn evaluator(&self) -> &TypingEvaluator<R> {
        &self.evaluator
    }

    pub fn evaluator_mut(&mut self) -> &mut TypingEvaluator<R> {
        &mut self.evaluator
    }

    /// Current content of the input field
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    /// Seconds left on the countdown, for timed sessions
    pub fn time_left(&self) -> Option<u32> {
        match self.config.mode {
            SessionMode::Time { .. } => Some(self.countdown.remaining_secs()),
            _ => None,
        }
    }

    /// Share of a bounded text typed so far, as a rounded percentage
    pub fn progress_percent(&self) -> u32 {
        let len = self.evaluator.target().len();
        if len == 0 {
            return 0;
        }
        let pct = (self.evaluator.cursor() as f64 / len as f64) * 100.0;
        pct.min(100.0).round() as u32
    }

    pub fn live_accuracy(&self) -> u32 {
        self.evaluator.accuracy()
    }

    pub fn elapsed(&self) -> Duration {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            (Some(start), None) => self.clock.now().saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    /// The input field changed to `value`
    pub fn on_input(&mut self, value: &str) -> InputOutcome {
        if self.phase == SessionPhase::Finished {
            return InputOutcome::Ignored;
        }

        if self.phase == SessionPhase::Idle {
            if value.is_empty() {
                self.field.clear();
                return InputOutcome::Ignored;
            }
            self.start();
        }

        let outcome = self.evaluator.on_input(value);
        match &outcome {
            InputOutcome::Rejected { accepted } => self.field = accepted.clone(),
            _ => self.field = value.to_owned(),
        }

        if matches!(self.config.mode, SessionMode::Words { .. }) && self.evaluator.is_complete() {
            self.finish();
        }

        outcome
    }

    /// A key press that appends `c` to the field
    pub fn type_char(&mut self, c: char) -> InputOutcome {
        let mut value = self.field.clone();
        value.push(c);
        self.on_input(&value)
    }

    /// A key press that deletes the last character of the field
    pub fn backspace(&mut self) -> InputOutcome {
        let mut value = self.field.clone();
        if value.pop().is_none() {
            return InputOutcome::Ignored;
        }
        self.on_input(&value)
    }

    /// Insert several characters at once.
    ///
    /// Anything longer than one character is rejected by the evaluator. The
    /// terminal has no visible field to hold the dangling first character, so
    /// the whole paste is dropped and the field keeps only graded text.
    pub fn paste(&mut self, text: &str) -> InputOutcome {
        let mut value = self.field.clone();
        value.push_str(text);
        let outcome = self.on_input(&value);
        if let InputOutcome::Rejected { .. } = outcome {
            self.field = self.field.chars().take(self.evaluator.cursor()).collect();
            tracing::debug!(chars = text.chars().count(), "dropped pasted text");
        }
        outcome
    }

    /// One-second timer callback
    pub fn on_tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::Running {
            return TickOutcome::Inactive;
        }
        let outcome = self.countdown.tick();
        if outcome == TickOutcome::Expired {
            self.finish();
        }
        outcome
    }

    /// Stop the clock and compute the result. Only a running test can finish.
    pub fn finish(&mut self) -> Option<&SessionResult> {
        if self.phase != SessionPhase::Running || self.config.mode == SessionMode::Practice {
            return self.result.as_ref();
        }

        self.countdown.cancel();
        self.ended_at = Some(self.clock.now());
        self.phase = SessionPhase::Finished;

        let result = self.compute_result();
        tracing::info!(
            mode = %result.mode,
            difficulty = %result.difficulty,
            wpm = result.wpm,
            accuracy = result.accuracy,
            errors = result.errors,
            "session finished"
        );
        self.result = Some(result);
        self.result.as_ref()
    }

    /// Back to Idle with a fresh text
    pub fn reset(&mut self) {
        self.countdown.rearm();
        self.evaluator.reset();
        self.phase = SessionPhase::Idle;
        self.started_at = None;
        self.ended_at = None;
        self.field.clear();
        self.result = None;
    }

    /// Switch mode, duration, word count or difficulty; always resets
    pub fn reconfigure(&mut self, config: SessionConfig) -> Result<(), VocabularyError> {
        if config.difficulty != self.config.difficulty {
            let vocabulary = Vocabulary::load(config.difficulty)?;
            self.evaluator.source_mut().set_vocabulary(vocabulary);
        }
        self.evaluator
            .set_plan(config.mode.plan(), config.mode.scoring());
        self.countdown.set_duration(config.mode.countdown_secs());
        self.config = config;
        self.reset();
        Ok(())
    }

    fn start(&mut self) {
        self.phase = SessionPhase::Running;
        self.started_at = Some(self.clock.now());
        if let SessionMode::Time { .. } = self.config.mode {
            self.countdown.start();
        }
        tracing::debug!(mode = %self.config.mode.kind(), "session started");
    }

    fn compute_result(&self) -> SessionResult {
        let elapsed = self.elapsed();
        let cursor = self.evaluator.cursor();
        let counters = self.evaluator.counters();
        let target_prefix = self.evaluator.target().prefix(cursor);

        SessionResult {
            wpm: words_per_minute(cursor, elapsed),
            accuracy: counters.accuracy_or(0),
            correct_words: count_correct_words(&target_prefix, &self.field),
            total_words: count_typed_words(&self.field),
            errors: counters.error_count,
            elapsed_secs: elapsed.as_secs_f64(),
            mode: self.config.mode.kind(),
            difficulty: self.config.difficulty,
            finished_at: Local::now(),
        }
    }
}
