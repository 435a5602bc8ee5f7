use crate::models::GridSize;

/// Failure of a single generation run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// A word ran out of placement attempts; nothing from the run is kept
    #[error("could not place \"{word}\" after {attempts} attempts")]
    PlacementExhausted { word: String, attempts: usize },
}

/// Rejected word-list input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordListError {
    #[error("Word is empty")]
    Empty,

    #[error("Word \"{word}\" contains '{invalid_char}' (only letters A-Z are allowed)")]
    InvalidCharacter { word: String, invalid_char: char },

    #[error("Maximum {max} words allowed")]
    TooManyWords { max: usize },

    #[error("\"{word}\" is already in the list")]
    Duplicate { word: String },

    #[error("\"{word}\" is too long: maximum length is {max} characters for a {size:?} grid")]
    TooLong {
        word: String,
        max: usize,
        size: GridSize,
    },

    #[error("Add some words first")]
    NoWords,
}

/// Errors surfaced by a puzzle session command
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    WordList(#[from] WordListError),

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Failure turning a finished puzzle into a PNG
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("could not parse puzzle drawing: {0}")]
    Svg(#[from] usvg::Error),

    #[error("could not allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("could not encode PNG: {0}")]
    Encode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_exhausted_message_names_word() {
        let err = GenerateError::PlacementExhausted {
            word: "ELEPHANT".to_string(),
            attempts: 100,
        };
        assert_eq!(
            err.to_string(),
            "could not place \"ELEPHANT\" after 100 attempts"
        );
    }

    #[test]
    fn test_session_error_is_transparent() {
        let err: SessionError = WordListError::TooManyWords { max: 16 }.into();
        assert_eq!(err.to_string(), "Maximum 16 words allowed");
    }
}
