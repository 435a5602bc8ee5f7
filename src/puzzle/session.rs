use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    models::{GridSize, Puzzle, PuzzleSettings},
    puzzle::{
        engine::{PlacementEngine, DEFAULT_ATTEMPTS_PER_WORD},
        error::{SessionError, WordListError},
        word_list::WordList,
    },
};

/// One user's puzzle workspace.
///
/// Every user action is a method call on the session; nothing else holds
/// onto the word list or the grid, so several sessions can run side by side.
#[derive(Debug)]
pub struct PuzzleSession {
    settings: PuzzleSettings,
    words: WordList,
    puzzle: Option<Arc<Puzzle>>,
    attempts_per_word: usize,
    rng: StdRng,
}

impl PuzzleSession {
    pub fn new(settings: PuzzleSettings) -> Self {
        Self::with_rng(settings, StdRng::from_os_rng())
    }

    /// Session with a caller-provided random source (seeded in tests)
    pub fn with_rng(settings: PuzzleSettings, rng: StdRng) -> Self {
        Self {
            settings,
            words: WordList::new(),
            puzzle: None,
            attempts_per_word: DEFAULT_ATTEMPTS_PER_WORD,
            rng,
        }
    }

    pub fn with_attempts(mut self, attempts_per_word: usize) -> Self {
        self.attempts_per_word = attempts_per_word;
        self
    }

    pub fn settings(&self) -> &PuzzleSettings {
        &self.settings
    }

    pub fn words(&self) -> &WordList {
        &self.words
    }

    /// Last successfully generated puzzle, if still current
    pub fn puzzle(&self) -> Option<&Arc<Puzzle>> {
        self.puzzle.as_ref()
    }

    pub fn can_export(&self) -> bool {
        self.puzzle.is_some()
    }

    /// Add a word to the list. The current puzzle no longer matches the list,
    /// so it is dropped.
    pub fn add_word(&mut self, raw: &str) -> Result<String, SessionError> {
        let word = self.words.add(raw, self.settings.size)?;
        self.puzzle = None;
        Ok(word)
    }

    /// Remove a word; returns false if it was not listed
    pub fn remove_word(&mut self, raw: &str) -> bool {
        let removed = self.words.remove(raw);
        if removed {
            self.puzzle = None;
        }
        removed
    }

    /// Change the grid size. Words already in the list are kept as they are;
    /// ones that no longer fit make the next generation fail.
    pub fn set_size(&mut self, size: GridSize) {
        self.settings.size = size;
    }

    pub fn set_allow_diagonal(&mut self, allow: bool) {
        self.settings.allow_diagonal = allow;
    }

    pub fn set_allow_backwards(&mut self, allow: bool) {
        self.settings.allow_backwards = allow;
    }

    /// Run the placement engine over the current word list.
    ///
    /// On failure the previous puzzle is discarded too, so there is never a
    /// stale or partial grid left to export.
    pub fn generate(&mut self) -> Result<Arc<Puzzle>, SessionError> {
        if self.words.is_empty() {
            return Err(WordListError::NoWords.into());
        }

        let engine =
            PlacementEngine::new(self.settings).with_attempts(self.attempts_per_word);

        match engine.generate(self.words.words(), &mut self.rng) {
            Ok(puzzle) => {
                let puzzle = Arc::new(puzzle);
                self.puzzle = Some(puzzle.clone());
                Ok(puzzle)
            }
            Err(e) => {
                self.puzzle = None;
                Err(e.into())
            }
        }
    }
}
