//! Flashcard error types

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while scheduling, storing or studying cards
#[derive(Debug, Error)]
pub enum FlashcardError {
    #[error("Invalid rating {0}: quality must be between 0 and 5")]
    InvalidRating(i32),

    #[error("Deck not found: {0}")]
    DeckNotFound(Uuid),

    #[error("No deck matching '{0}'")]
    DeckNameNotFound(String),

    #[error("Ambiguous deck name '{name}', matches: {}", .matches.join(", "))]
    AmbiguousDeckName { name: String, matches: Vec<String> },

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("Study session {0} is already closed")]
    SessionClosed(Uuid),

    #[error("Could not determine a data directory")]
    DataDirNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type alias for flashcard operations
pub type Result<T> = std::result::Result<T, FlashcardError>;
