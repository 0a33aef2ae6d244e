//! Card status classification

use super::models::CardStatus;

/// Classify a card from its repetition and lapse counts.
///
/// A card that has never lapsed and has no successful reviews is `New`; one
/// that lapsed back to zero repetitions is `Relearning`.
pub fn classify_status(repetitions: u32, lapses: u32) -> CardStatus {
    match (repetitions, lapses) {
        (0, 0) => CardStatus::New,
        (0, _) => CardStatus::Relearning,
        (1..=2, _) => CardStatus::Learning,
        _ => CardStatus::Review,
    }
}
