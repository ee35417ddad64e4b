use crate::word_source::WordSource;
use itertools::Itertools;
use rand::Rng;

/// Words appended per extension in unbounded modes
pub const EXTENSION_BATCH: usize = 50;

/// The target text: words joined by single spaces, indexed by character
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBuffer {
    chars: Vec<char>,
    word_count: usize,
}

impl TextBuffer {
    /// Build exactly `count` words drawn from `source`
    pub fn generate<R: Rng>(source: &mut WordSource<R>, count: usize) -> Self {
        let text = source.words().take(count).join(" ");
        Self {
            chars: text.chars().collect(),
            word_count: count,
        }
    }

    /// Use a fixed text instead of drawing words
    pub fn from_text(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            word_count: text.split_whitespace().count(),
        }
    }

    /// Append `count` more words after a separating space.
    ///
    /// Positions already in the buffer are never touched.
    pub fn extend<R: Rng>(&mut self, source: &mut WordSource<R>, count: usize) {
        if count == 0 {
            return;
        }
        if !self.chars.is_empty() {
            self.chars.push(' ');
        }
        let more = source.words().take(count).join(" ");
        self.chars.extend(more.chars());
        self.word_count += count;
    }

    /// True once the cursor is past 80% of the buffer
    pub fn should_extend(&self, cursor: usize) -> bool {
        !self.chars.is_empty() && cursor * 5 > self.chars.len() * 4
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// The first `len` characters as a string
    pub fn prefix(&self, len: usize) -> String {
        self.chars[..len.min(self.chars.len())].iter().collect()
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}
