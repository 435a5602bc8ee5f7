pub mod puzzle;

pub use puzzle::{
    // Engine input
    Direction, GridSize, PuzzleSettings,
    // Engine output
    Grid, Placement, Position, Puzzle,
    // Limits
    MAX_WORDS,
};
