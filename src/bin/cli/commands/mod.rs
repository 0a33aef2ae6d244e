pub mod card;
pub mod deck;
pub mod due;
pub mod review;
pub mod stats;
pub mod study;

use chrono::{DateTime, Utc};
use sandstone_lib::flashcards::algorithm::format_interval;
use sandstone_lib::flashcards::Card;

/// Truncate long card text for single-line listings
fn truncate(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() <= max {
        line.to_string()
    } else {
        let cut: String = line.chars().take(max.saturating_sub(1)).collect();
        format!("{}\u{2026}", cut)
    }
}

/// "due now", "in 3d", "in 2w"
fn due_label(card: &Card, now: DateTime<Utc>) -> String {
    match card.next_review {
        None => "due now".to_string(),
        Some(due) if due <= now => "due now".to_string(),
        Some(due) => format!("in {}", format_interval((due - now).num_days().max(1) as u32)),
    }
}

pub(crate) fn print_card_table(cards: &[Card], now: DateTime<Utc>) {
    for card in cards {
        println!(
            "{}  {:<10} {:<9} {:<32} {}",
            card.id,
            card.status().to_string(),
            due_label(card, now),
            truncate(&card.front, 32),
            truncate(&card.back, 24),
        );
    }
}
