use serde::Serialize;

use crate::{
    models::{GridSize, MAX_WORDS},
    puzzle::error::WordListError,
    utils::letters::{is_puzzle_letter, normalize_word},
};

/// Words a user wants hidden in the puzzle, validated on the way in
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a complete batch of words for a grid of `size`
    pub fn from_words<I, S>(words: I, size: GridSize) -> Result<Self, WordListError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for word in words {
            list.add(word.as_ref(), size)?;
        }
        if list.is_empty() {
            return Err(WordListError::NoWords);
        }
        Ok(list)
    }

    /// Normalize and add a word, returning the stored form
    pub fn add(&mut self, raw: &str, size: GridSize) -> Result<String, WordListError> {
        let word = normalize_word(raw);
        if word.is_empty() {
            return Err(WordListError::Empty);
        }

        if self.words.len() >= MAX_WORDS {
            return Err(WordListError::TooManyWords { max: MAX_WORDS });
        }

        if self.contains(&word) {
            return Err(WordListError::Duplicate { word });
        }

        Self::check_letters(&word, size)?;
        self.words.push(word.clone());
        Ok(word)
    }

    /// Remove a word; returns false if it was not in the list
    pub fn remove(&mut self, raw: &str) -> bool {
        let word = normalize_word(raw);
        let before = self.words.len();
        self.words.retain(|w| *w != word);
        self.words.len() != before
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn check_letters(word: &str, size: GridSize) -> Result<(), WordListError> {
        if let Some(invalid_char) = word.chars().find(|c| !is_puzzle_letter(*c)) {
            return Err(WordListError::InvalidCharacter {
                word: word.to_string(),
                invalid_char,
            });
        }

        let max = size.max_word_len();
        if word.chars().count() > max {
            return Err(WordListError::TooLong {
                word: word.to_string(),
                max,
                size,
            });
        }

        Ok(())
    }
}
