use serde::{Deserialize, Serialize};

use crate::models::{GridSize, Placement, PuzzleSettings};

/// Messages sent from client to server, one per user action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    AddWord {
        word: String,
    },
    RemoveWord {
        word: String,
    },
    SetGridSize {
        size: GridSize,
    },
    SetAllowDiagonal {
        enabled: bool,
    },
    SetAllowBackwards {
        enabled: bool,
    },
    Generate,
    GetState,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    SessionState {
        settings: PuzzleSettings,
        words: Vec<String>,
        max_words: usize,
        max_word_length: usize,
        can_export: bool,
        /// Id of the current puzzle; absent when there is nothing to export
        puzzle_id: Option<String>,
    },
    WordList {
        words: Vec<String>,
        count: usize,
        max_words: usize,
    },
    PuzzleGenerated {
        puzzle_id: String,
        size: GridSize,
        grid: Vec<String>,
        words: Vec<String>,
        placements: Vec<Placement>,
    },
    GenerationFailed {
        word: String,
        reason: String,
    },
    Error {
        message: String,
    },
}
