use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use uuid::Uuid;

use sandstone_lib::flashcards::{Card, Deck, FlashcardStorage};
use sandstone_lib::SandstoneConfig;

/// Shared application state for CLI commands
pub struct App {
    pub config: SandstoneConfig,
    pub storage: FlashcardStorage,
}

impl App {
    /// Load config and open storage. `data_dir` overrides the config value.
    pub fn new(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let config = match config_path.map(Path::to_path_buf).or_else(SandstoneConfig::default_path) {
            Some(path) => SandstoneConfig::load(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => SandstoneConfig::default(),
        };

        let data_dir = match data_dir {
            Some(dir) => dir,
            None => config.resolve_data_dir().context("Failed to get data directory")?,
        };
        log::debug!("Using data directory {}", data_dir.display());

        let storage = FlashcardStorage::new(data_dir);
        storage.init().context("Failed to initialize flashcard storage")?;

        Ok(Self { config, storage })
    }

    /// Find a deck by name (case-insensitive prefix match) or id
    pub fn find_deck(&self, query: &str) -> Result<Deck> {
        Ok(self.storage.find_deck(query)?)
    }

    pub fn find_card(&self, id: &str) -> Result<Card> {
        let card_id = Uuid::parse_str(id).with_context(|| format!("Invalid card id '{}'", id))?;
        Ok(self.storage.get_card(card_id)?)
    }

    pub fn list_cards(&self, deck: &Deck) -> Result<Vec<Card>> {
        self.storage
            .list_cards(deck.id)
            .with_context(|| format!("Failed to list cards in '{}'", deck.name))
    }
}
