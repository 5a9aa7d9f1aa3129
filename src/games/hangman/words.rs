use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use super::game::RoundError;

// Shipped with the binary so the game runs without a words file
const BUILTIN_WORDS: &str = include_str!("../../../assets/words.txt");

/// Words file picked up from the working directory when none is configured.
pub const DEFAULT_WORDS_FILE: &str = "words.txt";

/// Candidate secret words, already uppercased. Duplicates are kept so a
/// word listed twice is drawn twice as often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    /// One word per line; surrounding whitespace is trimmed and blank lines skipped.
    /// Entries with anything but letters could never be solved, so they are dropped.
    pub fn from_lines(text: &str) -> Self {
        Self::from_words(text.lines())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_uppercase())
            .filter(|w| !w.is_empty())
            .filter(|w| {
                let playable = w.chars().all(char::is_alphabetic);
                if !playable {
                    warn!("Skipping word {:?}: only letters can be guessed", w);
                }
                playable
            })
            .collect();
        Self { words }
    }

    pub fn builtin() -> Self {
        Self::from_lines(BUILTIN_WORDS)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list {:?}", path))?;
        let bank = Self::from_lines(&text);
        info!("Loaded {} words from {:?}", bank.len(), path);
        Ok(bank)
    }

    /// An explicitly configured file must load; otherwise `words.txt` in the
    /// working directory is used if present, then the built-in list.
    pub fn resolve(configured: Option<&Path>) -> Result<Self> {
        if let Some(path) = configured {
            return Self::load(path);
        }

        let fallback = Path::new(DEFAULT_WORDS_FILE);
        if fallback.is_file() {
            return Self::load(fallback);
        }

        debug!("No word list found, using built-in words");
        Ok(Self::builtin())
    }

    /// Uniformly random word.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&str, RoundError> {
        self.words
            .choose(rng)
            .map(String::as_str)
            .ok_or(RoundError::EmptyWordBank)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}
