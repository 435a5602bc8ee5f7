use std::cmp::Reverse;

use rand::Rng;

use crate::{
    models::{Direction, Grid, Placement, Position, Puzzle, PuzzleSettings},
    puzzle::error::GenerateError,
    utils::letters::random_letter,
};

/// Random placement attempts allowed per word before giving up
pub const DEFAULT_ATTEMPTS_PER_WORD: usize = 100;

/// Grid under construction; `None` marks a cell no word has claimed yet
#[derive(Debug, Clone)]
pub struct Board {
    side: usize,
    cells: Vec<Vec<Option<char>>>,
}

impl Board {
    pub fn new(side: usize) -> Self {
        Self {
            side,
            cells: vec![vec![None; side]; side],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn get(&self, pos: Position) -> Option<char> {
        self.cells[pos.row][pos.col]
    }

    /// Check that `variant` fits from `start` along `direction`: it must stay
    /// inside the grid and only cross cells that are empty or already hold
    /// the same letter.
    pub fn can_place_word(&self, variant: &[char], start: Position, direction: Direction) -> bool {
        let len = variant.len();
        if len == 0 || start.row >= self.side || start.col >= self.side {
            return false;
        }

        let (dr, dc) = direction.delta();
        let span = (len - 1) as isize;
        let end_row = start.row as isize + dr * span;
        let end_col = start.col as isize + dc * span;
        let side = self.side as isize;
        if end_row < 0 || end_row >= side || end_col < 0 || end_col >= side {
            return false;
        }

        variant.iter().enumerate().all(|(i, letter)| {
            let i = i as isize;
            let pos = Position {
                row: (start.row as isize + dr * i) as usize,
                col: (start.col as isize + dc * i) as usize,
            };
            match self.get(pos) {
                Some(existing) => existing == *letter,
                None => true,
            }
        })
    }

    /// Write `variant` along `direction`. Callers check `can_place_word` first.
    pub fn place_word_at(&mut self, variant: &[char], start: Position, direction: Direction) {
        let (dr, dc) = direction.delta();
        for (i, letter) in variant.iter().enumerate() {
            let i = i as isize;
            let row = (start.row as isize + dr * i) as usize;
            let col = (start.col as isize + dc * i) as usize;
            self.cells[row][col] = Some(*letter);
        }
    }

    /// Fill every unclaimed cell with a random letter, row by row
    pub fn fill<R: Rng + ?Sized>(self, rng: &mut R) -> Grid {
        self.cells
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.unwrap_or_else(|| random_letter(rng)))
                    .collect()
            })
            .collect()
    }
}

/// Places a word list into a fresh grid by bounded random sampling
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    settings: PuzzleSettings,
    attempts_per_word: usize,
}

impl PlacementEngine {
    pub fn new(settings: PuzzleSettings) -> Self {
        Self {
            settings,
            attempts_per_word: DEFAULT_ATTEMPTS_PER_WORD,
        }
    }

    pub fn with_attempts(mut self, attempts_per_word: usize) -> Self {
        self.attempts_per_word = attempts_per_word;
        self
    }

    /// Build a complete puzzle from `words`.
    ///
    /// Words are placed longest first (ties keep their input order). If any
    /// word runs out of attempts the whole run is abandoned. On success every
    /// cell not covered by a word gets a random filler letter.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        words: &[String],
        rng: &mut R,
    ) -> Result<Puzzle, GenerateError> {
        let side = self.settings.size.side();
        let directions = Direction::allowed(self.settings.allow_diagonal);

        let mut sorted: Vec<&String> = words.iter().collect();
        sorted.sort_by_key(|word| Reverse(word.chars().count()));

        let mut board = Board::new(side);
        let mut placements = Vec::with_capacity(words.len());

        for word in sorted {
            match self.place_word(&mut board, word, directions, rng) {
                Some(placement) => {
                    tracing::debug!(
                        "Placed {} at ({}, {}) going {:?}{}",
                        word,
                        placement.start.row,
                        placement.start.col,
                        placement.direction,
                        if placement.reversed { " (reversed)" } else { "" }
                    );
                    placements.push(placement);
                }
                None => {
                    tracing::debug!(
                        "Giving up on {} after {} attempts in a {}x{} grid",
                        word,
                        self.attempts_per_word,
                        side,
                        side
                    );
                    return Err(GenerateError::PlacementExhausted {
                        word: word.clone(),
                        attempts: self.attempts_per_word,
                    });
                }
            }
        }

        Ok(Puzzle {
            size: self.settings.size,
            grid: board.fill(rng),
            words: words.to_vec(),
            placements,
        })
    }

    /// One word, up to `attempts_per_word` tries. Direction and orientation
    /// are drawn again on every try.
    fn place_word<R: Rng + ?Sized>(
        &self,
        board: &mut Board,
        word: &str,
        directions: &[Direction],
        rng: &mut R,
    ) -> Option<Placement> {
        let forward: Vec<char> = word.chars().collect();
        let backward: Vec<char> = forward.iter().rev().copied().collect();
        let side = board.side();

        for _ in 0..self.attempts_per_word {
            let direction = directions[rng.random_range(0..directions.len())];
            let reversed = self.settings.allow_backwards && rng.random_bool(0.5);
            let variant = if reversed { &backward } else { &forward };
            let start = Position {
                row: rng.random_range(0..side),
                col: rng.random_range(0..side),
            };

            if board.can_place_word(variant, start, direction) {
                board.place_word_at(variant, start, direction);
                return Some(Placement {
                    word: word.to_string(),
                    start,
                    direction,
                    reversed,
                });
            }
        }

        None
    }
}
