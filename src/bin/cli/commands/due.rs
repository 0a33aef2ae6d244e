use anyhow::Result;
use chrono::Utc;

use sandstone_lib::flashcards::due_cards;

use super::print_card_table;
use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, deck_query: &str, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(deck_query)?;
    let now = Utc::now();
    let due = due_cards(&app.list_cards(&deck)?, now);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&due)?),
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing due in '{}'.", deck.name);
                return Ok(());
            }
            print_card_table(&due, now);
            println!("\n{} due", due.len());
        }
    }
    Ok(())
}
