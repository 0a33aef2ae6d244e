use anyhow::{Context, Result};
use chrono::Utc;

use sandstone_lib::flashcards::review_activity;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, deck_query: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(deck_query)?;
    let now = Utc::now();

    let stats = app.storage.deck_stats(deck.id, now)?;
    let history = app
        .storage
        .list_deck_reviews(deck.id)
        .context("Failed to read review history")?;
    let activity = review_activity(&history, now.date_naive());
    let sessions = app.storage.list_sessions(Some(deck.id))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "deck": deck.name,
                "stats": stats,
                "activity": activity,
                "sessions": sessions.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", deck.name);
            println!("  cards:        {} ({} due)", stats.total_cards, stats.due_cards);
            println!(
                "  new/learning/review/relearning: {}/{}/{}/{}",
                stats.new_cards, stats.learning_cards, stats.review_cards, stats.relearning_cards
            );
            println!("  mastered:     {}", stats.mastered_cards);
            println!("  avg ease:     {:.2}", stats.average_ease);
            println!("  avg difficulty: {:.2}", stats.average_difficulty);
            println!("  lapses:       {}", stats.total_lapses);
            println!(
                "  today:        {} reviews, {} correct",
                activity.reviews_today, activity.correct_today
            );
            println!("  streak:       {} day(s)", activity.streak_days);
            println!("  retention:    {:.0}%", activity.retention * 100.0);
            println!("  sessions:     {}", sessions.len());
        }
    }
    Ok(())
}
