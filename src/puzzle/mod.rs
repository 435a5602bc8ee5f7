// Word search puzzle generation

pub mod engine;
pub mod error;
pub mod render;
pub mod session;
pub mod word_list;

pub use engine::{PlacementEngine, DEFAULT_ATTEMPTS_PER_WORD};
pub use error::{GenerateError, RenderError, SessionError, WordListError};
pub use render::{render_png, render_svg, render_text, EXPORT_FILENAME};
pub use session::PuzzleSession;
pub use word_list::WordList;
