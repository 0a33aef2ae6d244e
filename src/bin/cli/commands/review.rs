use anyhow::Result;
use chrono::Utc;

use sandstone_lib::flashcards::algorithm::{format_interval, preview_intervals};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, card_id: &str, quality: i32, time_ms: Option<u64>, format: &OutputFormat) -> Result<()> {
    let card = app.find_card(card_id)?;
    let (card, entry) = app.storage.submit_review(card.id, quality, time_ms, Utc::now())?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "card": card,
                "review": entry,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{} -> {}", entry.quality, card.status());
            println!("  interval:    {} ({})", card.interval, format_interval(card.interval));
            println!("  ease factor: {:.2} (was {:.2})", card.ease_factor, entry.ease_factor);
            println!("  lapses:      {}", card.lapses);
            if let Some(next) = card.next_review {
                println!("  next review: {}", next.format("%Y-%m-%d"));
            }
        }
    }
    Ok(())
}

pub fn run_preview(app: &App, card_id: &str, format: &OutputFormat) -> Result<()> {
    let card = app.find_card(card_id)?;
    let [again, hard, good, easy] = preview_intervals(&card.scheduling_state());

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "again": again,
                "hard": hard,
                "good": good,
                "easy": easy,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "Again: {}  Hard: {}  Good: {}  Easy: {}",
                format_interval(again),
                format_interval(hard),
                format_interval(good),
                format_interval(easy)
            );
        }
    }
    Ok(())
}
