pub mod config;
pub mod flashcards;

pub use config::SandstoneConfig;
pub use flashcards::{FlashcardError, FlashcardStorage};
