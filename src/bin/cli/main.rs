mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sandstone-cli", about = "Sandstone flashcards and spaced repetition CLI", version)]
struct Cli {
    /// Data directory (default: from config, then platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ModeArg {
    Standard,
    New,
    Review,
    Cram,
    Weak,
}

impl From<ModeArg> for sandstone_lib::flashcards::StudyMode {
    fn from(mode: ModeArg) -> Self {
        use sandstone_lib::flashcards::StudyMode;
        match mode {
            ModeArg::Standard => StudyMode::Standard,
            ModeArg::New => StudyMode::NewOnly,
            ModeArg::Review => StudyMode::ReviewOnly,
            ModeArg::Cram => StudyMode::Cram,
            ModeArg::Weak => StudyMode::WeakCards,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Deck management
    #[command(subcommand)]
    Deck(DeckCommand),

    /// Card management
    #[command(subcommand)]
    Card(CardCommand),

    /// List cards due for review in a deck
    Due {
        /// Deck name (case-insensitive prefix match) or id
        deck: String,
    },

    /// Record a review for a card
    Review {
        /// Card id
        card: String,
        /// Quality rating 0-5 (0 = blackout, 5 = perfect)
        quality: i32,
        /// Time spent answering, in milliseconds
        #[arg(long)]
        time_ms: Option<u64>,
    },

    /// Show the interval each answer button would give a card
    Preview {
        /// Card id
        card: String,
    },

    /// Deck statistics and review activity
    Stats {
        /// Deck name (case-insensitive prefix match) or id
        deck: String,
    },

    /// Study a deck interactively
    Study {
        /// Deck name (case-insensitive prefix match) or id
        deck: String,
        /// Preset study mode (flags below override the config defaults otherwise)
        #[arg(long)]
        mode: Option<ModeArg>,
        /// Maximum cards in the session
        #[arg(long)]
        limit: Option<usize>,
        /// Shuffle the cards
        #[arg(long)]
        shuffle: bool,
        /// Put weak cards first
        #[arg(long)]
        weak: bool,
        /// Seed for shuffling
        #[arg(long)]
        seed: Option<u64>,
        /// Include cards that are not due yet
        #[arg(long)]
        all: bool,
        /// Print the study queue instead of starting a session
        #[arg(long)]
        list: bool,
    },
}

#[derive(Subcommand)]
enum DeckCommand {
    /// Create a deck
    New {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// List decks with card counts
    List,
    /// Delete a deck and all of its cards
    Delete {
        /// Deck name or id
        deck: String,
    },
}

#[derive(Subcommand)]
enum CardCommand {
    /// Add a card to a deck
    Add {
        /// Deck name or id
        deck: String,
        front: String,
        back: String,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// List cards in a deck
    List {
        /// Deck name or id
        deck: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let app = app::App::new(cli.config.as_deref(), cli.data_dir)?;

    match cli.command {
        Command::Deck(DeckCommand::New { name, description }) => {
            commands::deck::run_new(&app, name, description, &cli.format)?;
        }
        Command::Deck(DeckCommand::List) => {
            commands::deck::run_list(&app, &cli.format)?;
        }
        Command::Deck(DeckCommand::Delete { deck }) => {
            commands::deck::run_delete(&app, &deck)?;
        }
        Command::Card(CardCommand::Add { deck, front, back, tags }) => {
            commands::card::run_add(&app, &deck, front, back, tags.as_deref(), &cli.format)?;
        }
        Command::Card(CardCommand::List { deck }) => {
            commands::card::run_list(&app, &deck, &cli.format)?;
        }
        Command::Due { deck } => {
            commands::due::run(&app, &deck, &cli.format)?;
        }
        Command::Review { card, quality, time_ms } => {
            commands::review::run(&app, &card, quality, time_ms, &cli.format)?;
        }
        Command::Preview { card } => {
            commands::review::run_preview(&app, &card, &cli.format)?;
        }
        Command::Stats { deck } => {
            commands::stats::run(&app, &deck, &cli.format)?;
        }
        Command::Study { deck, mode, limit, shuffle, weak, seed, all, list } => {
            let options = commands::study::StudyOptions {
                mode: mode.map(Into::into),
                limit,
                shuffle,
                weak,
                seed,
                all,
            };
            if list {
                commands::study::run_list(&app, &deck, &options, &cli.format)?;
            } else {
                commands::study::run(&app, &deck, &options)?;
            }
        }
    }

    Ok(())
}
