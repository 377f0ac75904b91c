use clap::ValueEnum;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use strum_macros::Display;

/// Number of tokens drawn per batch in easy mode.
const EASY_BATCH_SIZE: usize = 50;

/// Short common-word pool for easy mode, drawn with replacement.
const EASY_WORDS: &[&str] = &[
    "the", "and", "for", "you", "say", "but", "his", "not", "she", "can", "who", "get", "her",
    "all", "one", "out", "see", "him", "now", "how", "its", "our", "two", "way", "new", "day",
    "use", "man", "may", "old",
];

/// Fixed sentence pool for normal and hard mode. Sentences are drawn as
/// a full permutation and split into word tokens with their punctuation
/// kept in place.
const SENTENCES: &[&str] = &[
    "The quick brown fox jumps over the lazy dog.",
    "A journey of a thousand miles begins with a single step.",
    "To be or not to be, that is the question.",
    "All that glitters is not gold.",
    "Where there's a will, there's a way.",
    "Actions speak louder than words.",
    "Knowledge is power.",
    "Practice makes perfect.",
    "Time flies like an arrow; fruit flies like a banana.",
    "Better late than never.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Parses the lowercase name used in the config file; unknown names
    /// fall back to the default.
    pub fn from_name(name: &str) -> Self {
        <Self as ValueEnum>::from_str(name, true).unwrap_or_default()
    }
}

/// Source of target words for the session stream.
///
/// Implementations must never return an empty batch; the session treats
/// one as a fatal configuration error.
pub trait TextGenerator {
    fn next_batch(&mut self) -> Vec<String>;
}

/// Built-in word source backed by the fixed word and sentence pools.
/// Each call is independent; only the rng carries state, and it can be
/// seeded for deterministic output.
pub struct WordSource {
    difficulty: Difficulty,
    rng: StdRng,
}

impl WordSource {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl TextGenerator for WordSource {
    fn next_batch(&mut self) -> Vec<String> {
        match self.difficulty {
            Difficulty::Easy => (0..EASY_BATCH_SIZE)
                .map(|_| EASY_WORDS[self.rng.gen_range(0..EASY_WORDS.len())].to_string())
                .collect(),
            Difficulty::Normal | Difficulty::Hard => {
                let mut sentences = SENTENCES.to_vec();
                sentences.shuffle(&mut self.rng);
                sentences
                    .iter()
                    .flat_map(|s| s.split_whitespace())
                    .map(str::to_string)
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn word_counts(words: &[String]) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for w in words {
            *counts.entry(w.as_str()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn easy_batch_has_fixed_size_from_pool() {
        let mut source = WordSource::new(Difficulty::Easy);
        let batch = source.next_batch();

        assert_eq!(batch.len(), EASY_BATCH_SIZE);
        for word in &batch {
            assert!(EASY_WORDS.contains(&word.as_str()), "unexpected word {word}");
        }
    }

    #[test]
    fn normal_batch_is_permutation_of_sentence_words() {
        let mut source = WordSource::new(Difficulty::Normal);
        let batch = source.next_batch();

        let expected: Vec<String> = SENTENCES
            .iter()
            .flat_map(|s| s.split_whitespace())
            .map(str::to_string)
            .collect();

        assert_eq!(batch.len(), expected.len());
        assert_eq!(word_counts(&batch), word_counts(&expected));
    }

    #[test]
    fn punctuation_stays_attached_to_tokens() {
        let mut source = WordSource::new(Difficulty::Hard);
        let batch = source.next_batch();

        assert!(batch.iter().any(|w| w.ends_with('.')));
        assert!(batch.iter().any(|w| w.ends_with(',') || w.contains('\'')));
    }

    #[test]
    fn batches_are_never_empty() {
        for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            let mut source = WordSource::new(difficulty);
            for _ in 0..5 {
                assert!(!source.next_batch().is_empty());
            }
        }
    }

    #[test]
    fn seeded_sources_are_deterministic() {
        let mut a = WordSource::seeded(Difficulty::Normal, 42);
        let mut b = WordSource::seeded(Difficulty::Normal, 42);
        assert_eq!(a.next_batch(), b.next_batch());

        let mut c = WordSource::seeded(Difficulty::Easy, 7);
        let mut d = WordSource::seeded(Difficulty::Easy, 7);
        assert_eq!(c.next_batch(), d.next_batch());
    }

    #[test]
    fn difficulty_from_name() {
        assert_eq!(Difficulty::from_name("easy"), Difficulty::Easy);
        assert_eq!(Difficulty::from_name("Normal"), Difficulty::Normal);
        assert_eq!(Difficulty::from_name("hard"), Difficulty::Hard);
        assert_eq!(Difficulty::from_name("nightmare"), Difficulty::Normal);
    }

    #[test]
    fn difficulty_display() {
        assert_eq!(Difficulty::Easy.to_string(), "Easy");
        assert_eq!(Difficulty::Normal.to_string(), "Normal");
        assert_eq!(Difficulty::Hard.to_string(), "Hard");
    }
}
