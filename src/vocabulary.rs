use crate::error::VocabularyError;
use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use serde_json::from_str;

static VOCAB_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/vocab");

/// Difficulty level; each one selects a fixed vocabulary
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn next(self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

/// A named, non-empty list of candidate words
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "RawVocabulary")]
pub struct Vocabulary {
    pub name: String,
    pub size: u32,
    words: Vec<String>,
}

/// Vocabulary file as written on disk, before the word list is checked
#[derive(Deserialize)]
struct RawVocabulary {
    name: String,
    size: u32,
    words: Vec<String>,
}

impl TryFrom<RawVocabulary> for Vocabulary {
    type Error = VocabularyError;

    fn try_from(raw: RawVocabulary) -> Result<Self, Self::Error> {
        if raw.words.is_empty() {
            return Err(VocabularyError::Empty(raw.name));
        }
        Ok(Self {
            name: raw.name,
            size: raw.size,
            words: raw.words,
        })
    }
}

impl Vocabulary {
    /// Load the embedded vocabulary for a difficulty level
    pub fn load(difficulty: Difficulty) -> Result<Self, VocabularyError> {
        read_vocabulary_from_file(format!("{difficulty}.json"))
    }

    /// Build a vocabulary from an explicit word list
    pub fn from_words<S: Into<String>>(
        name: impl Into<String>,
        words: impl IntoIterator<Item = S>,
    ) -> Result<Self, VocabularyError> {
        let name = name.into();
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        if words.is_empty() {
            return Err(VocabularyError::Empty(name));
        }
        Ok(Self {
            size: words.len() as u32,
            name,
            words,
        })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false for a constructed vocabulary
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }
}

fn read_vocabulary_from_file(file_name: String) -> Result<Vocabulary, VocabularyError> {
    let file = VOCAB_DIR
        .get_file(&file_name)
        .ok_or_else(|| VocabularyError::NotFound(file_name.clone()))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or_else(|| VocabularyError::NotUtf8(file_name.clone()))?;

    let raw: RawVocabulary = from_str(file_as_str).map_err(|source| {
        VocabularyError::Malformed {
            name: file_name.clone(),
            source,
        }
    })?;

    Vocabulary::try_from(raw)
}
