//! The typing-evaluation state machine shared by the test and practice modes.
//!
//! The evaluator watches the full content of an input field. Each change is
//! one of: a character typed at the cursor, a backspace, or an overrun (more
//! than one new character, e.g. a paste). Typed characters are graded against
//! the target text; overruns are rejected without grading.
//!
//! After every accepted event the field holds exactly `cursor` characters, so
//! a backspace shows up as a value one character shorter than the cursor.

use crate::text_buffer::{TextBuffer, EXTENSION_BATCH};
use crate::word_source::{DefaultRng, WordSource};
use rand::Rng;
use std::fmt;

/// Grading of one typed position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Judgment {
    Unseen,
    Correct,
    Incorrect,
}

/// What the rendering layer shows for one position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Unseen,
    Correct,
    Incorrect,
    Current,
}

impl From<Judgment> for Cell {
    fn from(judgment: Judgment) -> Self {
        match judgment {
            Judgment::Unseen => Cell::Unseen,
            Judgment::Correct => Cell::Correct,
            Judgment::Incorrect => Cell::Incorrect,
        }
    }
}

/// Receives every cell the evaluator changes
pub trait JudgmentSink {
    fn render(&mut self, position: usize, cell: Cell);

    /// The whole text changed (generated, extended or reset)
    fn refresh(&mut self, _text: &TextBuffer) {}
}

/// Sink that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl JudgmentSink for NullSink {
    fn render(&mut self, _position: usize, _cell: Cell) {}
}

/// Whether mistakes are counted and what accuracy reads before any input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scoring {
    /// Full test: counts errors, accuracy starts at 0
    Test,
    /// Practice: no error counter, accuracy starts at 100
    Practice,
}

impl Scoring {
    fn tracks_errors(self) -> bool {
        matches!(self, Scoring::Test)
    }

    fn empty_accuracy(self) -> u32 {
        match self {
            Scoring::Test => 0,
            Scoring::Practice => 100,
        }
    }
}

/// Whether the target text grows as the cursor approaches its end
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Growth {
    Bounded,
    Unbounded,
}

/// How much text to generate and whether it grows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextPlan {
    pub initial_words: usize,
    pub growth: Growth,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    pub total_chars: usize,
    pub correct_chars: usize,
    pub error_count: usize,
}

impl Counters {
    /// Rounded percentage of correct attempts, or `empty` when nothing was typed
    pub fn accuracy_or(&self, empty: u32) -> u32 {
        if self.total_chars == 0 {
            return empty;
        }
        ((self.correct_chars as f64 / self.total_chars as f64) * 100.0).round() as u32
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// One character graded at `position`
    Typed {
        position: usize,
        judgment: Judgment,
        extended: bool,
    },
    /// The character at `position` was cleared
    Erased { position: usize, judgment: Judgment },
    /// More than one new character arrived; the field must be reset to `accepted`
    Rejected { accepted: String },
    Ignored,
}

pub struct TypingEvaluator<R: Rng = DefaultRng> {
    source: WordSource<R>,
    plan: TextPlan,
    scoring: Scoring,
    target: TextBuffer,
    marks: Vec<Judgment>,
    counters: Counters,
    sink: Box<dyn JudgmentSink>,
}

impl<R: Rng> TypingEvaluator<R> {
    pub fn new(mut source: WordSource<R>, plan: TextPlan, scoring: Scoring) -> Self {
        let target = TextBuffer::generate(&mut source, plan.initial_words);
        Self::with_text(source, target, plan, scoring)
    }

    /// Start from a given target instead of generating one
    pub fn with_text(
        source: WordSource<R>,
        target: TextBuffer,
        plan: TextPlan,
        scoring: Scoring,
    ) -> Self {
        Self {
            source,
            plan,
            scoring,
            target,
            marks: Vec::new(),
            counters: Counters::default(),
            sink: Box::new(NullSink),
        }
    }

    pub fn set_sink(&mut self, sink: Box<dyn JudgmentSink>) {
        self.sink = sink;
        self.sink.refresh(&self.target);
        self.render_current();
    }

    pub fn source_mut(&mut self) -> &mut WordSource<R> {
        &mut self.source
    }

    pub fn set_plan(&mut self, plan: TextPlan, scoring: Scoring) {
        self.plan = plan;
        self.scoring = scoring;
    }

    pub fn plan(&self) -> TextPlan {
        self.plan
    }

    pub fn scoring(&self) -> Scoring {
        self.scoring
    }

    pub fn target(&self) -> &TextBuffer {
        &self.target
    }

    pub fn cursor(&self) -> usize {
        self.marks.len()
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn accuracy(&self) -> u32 {
        self.counters.accuracy_or(self.scoring.empty_accuracy())
    }

    /// True when a bounded text has been typed to its end
    pub fn is_complete(&self) -> bool {
        self.plan.growth == Growth::Bounded && self.cursor() >= self.target.len()
    }

    pub fn judgment(&self, position: usize) -> Judgment {
        self.marks.get(position).copied().unwrap_or(Judgment::Unseen)
    }

    pub fn cell(&self, position: usize) -> Cell {
        if position == self.cursor() && position < self.target.len() {
            Cell::Current
        } else {
            self.judgment(position).into()
        }
    }

    /// Every target character paired with how it should be shown
    pub fn cells(&self) -> impl Iterator<Item = (char, Cell)> + '_ {
        self.target
            .chars()
            .iter()
            .enumerate()
            .map(|(idx, c)| (*c, self.cell(idx)))
    }

    /// Feed the full current content of the input field
    pub fn on_input(&mut self, value: &str) -> InputOutcome {
        let cursor = self.cursor();
        let len = value.chars().count();

        if len > cursor + 1 {
            return InputOutcome::Rejected {
                accepted: value.chars().take(cursor + 1).collect(),
            };
        }

        if len == cursor + 1 {
            return match value.chars().nth(cursor) {
                Some(typed) => self.type_char(typed),
                None => InputOutcome::Ignored,
            };
        }

        if len + 1 == cursor {
            return self.backspace();
        }

        InputOutcome::Ignored
    }

    /// Grade `typed` against the character under the cursor and advance
    pub fn type_char(&mut self, typed: char) -> InputOutcome {
        let position = self.cursor();
        let Some(expected) = self.target.char_at(position) else {
            return InputOutcome::Ignored;
        };

        let judgment = if typed == expected {
            Judgment::Correct
        } else {
            Judgment::Incorrect
        };

        self.counters.total_chars += 1;
        match judgment {
            Judgment::Correct => self.counters.correct_chars += 1,
            _ if self.scoring.tracks_errors() => self.counters.error_count += 1,
            _ => {}
        }
        self.marks.push(judgment);

        self.sink.render(position, judgment.into());

        let extended = self.plan.growth == Growth::Unbounded
            && self.target.should_extend(self.cursor());
        if extended {
            self.target.extend(&mut self.source, EXTENSION_BATCH);
            tracing::debug!(
                cursor = self.cursor(),
                len = self.target.len(),
                "extended target text"
            );
            self.sink.refresh(&self.target);
        }
        self.render_current();

        InputOutcome::Typed {
            position,
            judgment,
            extended,
        }
    }

    /// Clear the last graded position, undoing its counters
    pub fn backspace(&mut self) -> InputOutcome {
        let Some(judgment) = self.marks.pop() else {
            return InputOutcome::Ignored;
        };
        let position = self.marks.len();

        self.counters.total_chars -= 1;
        match judgment {
            Judgment::Correct => self.counters.correct_chars -= 1,
            Judgment::Incorrect if self.scoring.tracks_errors() => {
                self.counters.error_count -= 1
            }
            _ => {}
        }

        if position + 1 < self.target.len() {
            self.sink.render(position + 1, Cell::Unseen);
        }
        self.render_current();

        InputOutcome::Erased { position, judgment }
    }

    /// Drop all progress and draw a fresh target text
    pub fn reset(&mut self) {
        self.target = TextBuffer::generate(&mut self.source, self.plan.initial_words);
        self.marks.clear();
        self.counters = Counters::default();
        self.sink.refresh(&self.target);
        self.render_current();
    }

    fn render_current(&mut self) {
        let cursor = self.cursor();
        if cursor < self.target.len() {
            self.sink.render(cursor, Cell::Current);
        }
    }
}

impl<R: Rng> fmt::Debug for TypingEvaluator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypingEvaluator")
            .field("plan", &self.plan)
            .field("scoring", &self.scoring)
            .field("cursor", &self.cursor())
            .field("len", &self.target.len())
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}
