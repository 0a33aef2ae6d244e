use std::io::{self, BufRead, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use sandstone_lib::flashcards::algorithm::format_interval;
use sandstone_lib::flashcards::{
    due_cards, filter_for_study_mode, Card, Deck, Quality, StudyMode, StudyModeConfig, StudySession,
};

use super::print_card_table;
use crate::app::App;
use crate::OutputFormat;

pub struct StudyOptions {
    pub mode: Option<StudyMode>,
    pub limit: Option<usize>,
    pub shuffle: bool,
    pub weak: bool,
    pub seed: Option<u64>,
    pub all: bool,
}

impl StudyOptions {
    /// Preset mode if given, else config defaults; flags only ever switch things on
    fn config(&self, defaults: &StudyModeConfig) -> StudyModeConfig {
        let mut config = self.mode.map(StudyModeConfig::from).unwrap_or_else(|| defaults.clone());
        if self.limit.is_some() {
            config.card_limit = self.limit;
        }
        config.shuffle |= self.shuffle;
        config.focus_weak |= self.weak;
        config
    }
}

fn study_queue(app: &App, deck: &Deck, options: &StudyOptions) -> Result<Vec<Card>> {
    let cards = app.list_cards(deck)?;
    let candidates = if options.all {
        cards
    } else {
        due_cards(&cards, Utc::now())
    };

    let config = options.config(&app.config.study);
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Ok(filter_for_study_mode(&candidates, &config, &mut rng))
}

pub fn run_list(app: &App, deck_query: &str, options: &StudyOptions, format: &OutputFormat) -> Result<()> {
    let deck = app.find_deck(deck_query)?;
    let queue = study_queue(app, &deck, options)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&queue)?),
        OutputFormat::Plain => {
            print_card_table(&queue, Utc::now());
            println!("\n{} cards queued", queue.len());
        }
    }
    Ok(())
}

enum Answer {
    Rated(Quality),
    Quit,
}

/// Prompt until a valid rating, `q`, or end of input
fn read_rating(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<Answer> {
    loop {
        print!("Rate 0-5 (q to quit): ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(Answer::Quit);
        };
        let line = line?;
        let input = line.trim();
        if input.eq_ignore_ascii_case("q") {
            return Ok(Answer::Quit);
        }

        match input.parse::<i32>().map_err(anyhow::Error::from).and_then(|r| Quality::new(r).map_err(Into::into)) {
            Ok(quality) => return Ok(Answer::Rated(quality)),
            Err(e) => println!("  {}", e),
        }
    }
}

/// Block until Enter; `false` at end of input
fn wait_for_reveal(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<bool> {
    match lines.next() {
        Some(line) => {
            line.context("Failed to read from stdin")?;
            Ok(true)
        }
        None => Ok(false),
    }
}

pub fn run(app: &App, deck_query: &str, options: &StudyOptions) -> Result<()> {
    let deck = app.find_deck(deck_query)?;
    let queue = study_queue(app, &deck, options)?;
    if queue.is_empty() {
        println!("Nothing to study in '{}'.", deck.name);
        return Ok(());
    }

    let mut session = StudySession::start(Some(deck.id), Utc::now());
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Studying '{}': {} cards\n", deck.name, queue.len());

    for (i, card) in queue.iter().enumerate() {
        println!("[{}/{}] {}", i + 1, queue.len(), card.front);
        print!("(press Enter to reveal)");
        io::stdout().flush()?;
        let started = Instant::now();
        if !wait_for_reveal(&mut lines)? {
            break;
        }
        println!("  {}", card.back);

        let quality = match read_rating(&mut lines)? {
            Answer::Rated(quality) => quality,
            Answer::Quit => break,
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let (updated, _) = app
            .storage
            .submit_review(card.id, quality.value() as i32, Some(elapsed_ms), Utc::now())
            .context("Failed to save review")?;
        session.record(quality, Some(elapsed_ms))?;
        println!("  next review in {}\n", format_interval(updated.interval));
    }

    session.finish(Utc::now())?;
    app.storage.save_session(&session).context("Failed to save session")?;

    println!(
        "Session complete: {} reviewed, {} correct ({:.0}%), {}s",
        session.cards_reviewed,
        session.correct_count,
        session.accuracy() * 100.0,
        session.duration(Utc::now()).num_seconds()
    );
    Ok(())
}
