use crate::vocabulary::Vocabulary;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random source used outside of tests
pub type DefaultRng = StdRng;

pub fn default_rng() -> DefaultRng {
    StdRng::from_entropy()
}

/// Draws words independently and uniformly at random from one vocabulary.
///
/// Every draw is independent of the previous ones: the same word may come up
/// twice in a row. The random source is injected so tests can seed it.
#[derive(Debug, Clone)]
pub struct WordSource<R: Rng = DefaultRng> {
    vocabulary: Vocabulary,
    rng: R,
}

impl<R: Rng> WordSource<R> {
    pub fn new(vocabulary: Vocabulary, rng: R) -> Self {
        Self { vocabulary, rng }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Restart the sequence from another vocabulary, keeping the random source
    pub fn set_vocabulary(&mut self, vocabulary: Vocabulary) {
        self.vocabulary = vocabulary;
    }

    pub fn next_word(&mut self) -> &str {
        let words = self.vocabulary.words();
        // a Vocabulary is never empty
        let idx = self.rng.gen_range(0..words.len());
        &words[idx]
    }

    /// The lazy, endless word sequence
    pub fn words(&mut self) -> impl Iterator<Item = String> + '_ {
        std::iter::from_fn(move || Some(self.next_word().to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::Difficulty;
    use std::collections::HashSet;

    fn seeded(difficulty: Difficulty, seed: u64) -> WordSource<StdRng> {
        WordSource::new(
            Vocabulary::load(difficulty).unwrap(),
            StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn test_words_come_from_the_vocabulary() {
        let mut source = seeded(Difficulty::Hard, 7);
        let vocab = source.vocabulary().clone();
        for word in source.words().take(200) {
            assert!(vocab.contains(&word), "{word} not in vocabulary");
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a: Vec<String> = seeded(Difficulty::Medium, 42).words().take(30).collect();
        let b: Vec<String> = seeded(Difficulty::Medium, 42).words().take(30).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_draws_with_replacement() {
        // 100 draws from 38 words must repeat at least once
        let words: Vec<String> = seeded(Difficulty::Easy, 1).words().take(100).collect();
        let distinct: HashSet<&String> = words.iter().collect();
        assert!(distinct.len() < words.len());
    }

    #[test]
    fn test_single_word_vocabulary() {
        let vocab = Vocabulary::from_words("one", ["the"]).unwrap();
        let mut source = WordSource::new(vocab, StdRng::seed_from_u64(0));
        assert_eq!(source.next_word(), "the");
        assert_eq!(source.next_word(), "the");
    }

    #[test]
    fn test_switch_vocabulary() {
        let mut source = seeded(Difficulty::Easy, 3);
        source.set_vocabulary(Vocabulary::load(Difficulty::Hard).unwrap());
        let hard = Vocabulary::load(Difficulty::Hard).unwrap();
        assert!(source.words().take(20).all(|w| hard.contains(&w)));
    }
}
