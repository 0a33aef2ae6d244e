//! Deck statistics and review activity

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::BTreeSet;

use super::models::{Card, CardStatus, DeckStats, ReviewActivity, ReviewEntry};

/// Aggregate statistics over a collection of cards in a single pass
pub fn aggregate_stats(cards: &[Card], now: DateTime<Utc>) -> DeckStats {
    let mut stats = DeckStats::default();
    let mut ease_sum = 0.0;
    let mut difficulty_sum = 0.0;
    let mut difficulty_count = 0usize;

    for card in cards {
        stats.total_cards += 1;

        match card.status() {
            CardStatus::New => stats.new_cards += 1,
            CardStatus::Learning => stats.learning_cards += 1,
            CardStatus::Review => stats.review_cards += 1,
            CardStatus::Relearning => stats.relearning_cards += 1,
        }

        if card.is_due(now) {
            stats.due_cards += 1;
        }
        if card.is_mastered() {
            stats.mastered_cards += 1;
        }

        ease_sum += card.ease_factor;
        if let Some(difficulty) = card.difficulty {
            difficulty_sum += difficulty;
            difficulty_count += 1;
        }
        stats.total_lapses += card.lapses as u64;
    }

    if stats.total_cards > 0 {
        stats.average_ease = ease_sum / stats.total_cards as f64;
    }
    if difficulty_count > 0 {
        stats.average_difficulty = difficulty_sum / difficulty_count as f64;
    }

    stats
}

/// Summarise review history relative to `today` (UTC calendar days)
pub fn review_activity(entries: &[ReviewEntry], today: NaiveDate) -> ReviewActivity {
    let mut activity = ReviewActivity::default();
    if entries.is_empty() {
        return activity;
    }

    let mut review_days = BTreeSet::new();
    let mut passed = 0usize;

    for entry in entries {
        let day = entry.reviewed_at.date_naive();
        review_days.insert(day);

        if entry.is_pass() {
            passed += 1;
        }
        if day == today {
            activity.reviews_today += 1;
            if entry.is_pass() {
                activity.correct_today += 1;
            }
        }
    }

    activity.retention = passed as f64 / entries.len() as f64;

    // A streak is still alive if the last review was yesterday
    let mut day = if review_days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };
    while review_days.contains(&day) {
        activity.streak_days += 1;
        day -= Duration::days(1);
    }

    activity
}
