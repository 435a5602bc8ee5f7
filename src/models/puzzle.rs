use serde::{Deserialize, Serialize};

/// Longest word accepted regardless of grid size
pub const MAX_WORD_LENGTH: usize = 15;
/// Maximum number of words in a single puzzle
pub const MAX_WORDS: usize = 16;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// Supported grid sizes, from a quick 8x8 up to a 25x25 marathon
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum GridSize {
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Huge,
}

impl GridSize {
    pub const ALL: [GridSize; 5] = [
        GridSize::Tiny,
        GridSize::Small,
        GridSize::Medium,
        GridSize::Large,
        GridSize::Huge,
    ];

    /// Number of rows (and columns) in the grid
    pub fn side(self) -> usize {
        match self {
            GridSize::Tiny => 8,
            GridSize::Small => 10,
            GridSize::Medium => 15,
            GridSize::Large => 20,
            GridSize::Huge => 25,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GridSize::Tiny => "tiny",
            GridSize::Small => "small",
            GridSize::Medium => "medium",
            GridSize::Large => "large",
            GridSize::Huge => "huge",
        }
    }

    /// Longest word that may be added for this size
    pub fn max_word_len(self) -> usize {
        self.side().min(MAX_WORD_LENGTH)
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|size| size.label().eq_ignore_ascii_case(label.trim()))
    }
}

/// Step vector a word's letters are laid out along
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Right,
    Down,
    DiagonalDownRight,
    DiagonalDownLeft,
}

const STRAIGHT_DIRECTIONS: [Direction; 2] = [Direction::Right, Direction::Down];
const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Right,
    Direction::Down,
    Direction::DiagonalDownRight,
    Direction::DiagonalDownLeft,
];

impl Direction {
    /// Directions a word may take; diagonals only when enabled
    pub fn allowed(allow_diagonal: bool) -> &'static [Direction] {
        if allow_diagonal {
            &ALL_DIRECTIONS
        } else {
            &STRAIGHT_DIRECTIONS
        }
    }

    /// (row delta, column delta)
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::DiagonalDownRight => (1, 1),
            Direction::DiagonalDownLeft => (1, -1),
        }
    }

    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::DiagonalDownRight | Direction::DiagonalDownLeft
        )
    }
}

/// Options that shape a generated puzzle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub struct PuzzleSettings {
    pub size: GridSize,
    pub allow_diagonal: bool,
    pub allow_backwards: bool,
}

impl Default for PuzzleSettings {
    fn default() -> Self {
        Self {
            size: GridSize::Medium,
            allow_diagonal: true,
            allow_backwards: true,
        }
    }
}

/// Where a word ended up in the grid
///
/// `start` is the first cell written, so for a reversed placement it holds
/// the word's last letter.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Placement {
    pub word: String,
    pub start: Position,
    pub direction: Direction,
    pub reversed: bool,
}

impl Placement {
    /// Cells covered by the placement, in writing order
    pub fn cells(&self) -> Vec<Position> {
        let (dr, dc) = self.direction.delta();
        (0..self.word.chars().count() as isize)
            .map(|i| Position {
                row: (self.start.row as isize + dr * i) as usize,
                col: (self.start.col as isize + dc * i) as usize,
            })
            .collect()
    }
}

pub type Grid = Vec<Vec<char>>;

/// A completed puzzle: every cell holds an uppercase letter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    pub size: GridSize,
    pub grid: Grid,
    /// Words in the order they were given
    pub words: Vec<String>,
    /// Committed placements, longest word first
    pub placements: Vec<Placement>,
}

impl Puzzle {
    pub fn side(&self) -> usize {
        self.grid.len()
    }

    /// Grid rows as strings, handy for JSON clients
    pub fn rows(&self) -> Vec<String> {
        self.grid.iter().map(|row| row.iter().collect()).collect()
    }
}
