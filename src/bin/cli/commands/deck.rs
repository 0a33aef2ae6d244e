use anyhow::{Context, Result};
use chrono::Utc;

use crate::app::App;
use crate::OutputFormat;

pub fn run_new(app: &App, name: String, description: Option<String>, format: &OutputFormat) -> Result<()> {
    let deck = app
        .storage
        .create_deck(name, description)
        .context("Failed to create deck")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&deck)?),
        OutputFormat::Plain => println!("Created deck '{}' ({})", deck.name, deck.id),
    }
    Ok(())
}

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let decks = app.storage.list_decks().context("Failed to list decks")?;
    let now = Utc::now();

    match format {
        OutputFormat::Json => {
            let mut output = Vec::new();
            for deck in &decks {
                let stats = app.storage.deck_stats(deck.id, now)?;
                output.push(serde_json::json!({
                    "id": deck.id.to_string(),
                    "name": deck.name,
                    "description": deck.description,
                    "cardCount": stats.total_cards,
                    "dueCount": stats.due_cards,
                }));
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if decks.is_empty() {
                println!("No decks yet. Create one with `sandstone-cli deck new <name>`.");
                return Ok(());
            }
            for deck in &decks {
                let stats = app.storage.deck_stats(deck.id, now)?;
                println!(
                    "{} ({} cards, {} due)",
                    deck.name, stats.total_cards, stats.due_cards
                );
                if let Some(description) = &deck.description {
                    println!("    {}", description);
                }
            }
        }
    }
    Ok(())
}

pub fn run_delete(app: &App, query: &str) -> Result<()> {
    let deck = app.find_deck(query)?;
    app.storage
        .delete_deck(deck.id)
        .with_context(|| format!("Failed to delete deck '{}'", deck.name))?;
    println!("Deleted deck '{}'", deck.name);
    Ok(())
}
