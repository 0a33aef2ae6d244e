use anyhow::{Context, Result};
use chrono::Utc;

use super::print_card_table;
use crate::app::App;
use crate::OutputFormat;

pub fn run_add(
    app: &App,
    deck_query: &str,
    front: String,
    back: String,
    tags: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let deck = app.find_deck(deck_query)?;
    let tags: Vec<String> = tags
        .map(|t| {
            t.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let card = app
        .storage
        .create_card(deck.id, front, back, tags)
        .context("Failed to create card")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => println!("Added card {} to '{}'", card.id, deck.name),
    }
    Ok(())
}

pub fn run_list(app: &App, deck_query: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(deck_query)?;
    let cards = app.list_cards(&deck)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cards)?),
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("'{}' has no cards.", deck.name);
                return Ok(());
            }
            print_card_table(&cards, Utc::now());
            println!("\n{} cards total", cards.len());
        }
    }
    Ok(())
}
