//! Flashcard and spaced repetition system for Sandstone
//!
//! This module provides:
//! - Interval/ease scheduling (SM-2 with FSRS-inspired difficulty and stability)
//! - Card status classification and deck statistics
//! - Study mode selection and study session tracking
//! - JSON file storage for decks, cards, review history and sessions

pub mod algorithm;
pub mod errors;
pub mod models;
pub mod session;
pub mod stats;
pub mod status;
pub mod storage;
pub mod study_mode;

pub use algorithm::{compute_review, Quality, ReviewOutcome, SchedulingState};
pub use errors::{FlashcardError, Result};
pub use models::*;
pub use session::StudySession;
pub use stats::{aggregate_stats, review_activity};
pub use status::classify_status;
pub use storage::FlashcardStorage;
pub use study_mode::{due_cards, filter_for_study_mode, StudyMode, StudyModeConfig};
