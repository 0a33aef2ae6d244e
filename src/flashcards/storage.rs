//! Storage operations for flashcards
//!
//! Directory structure:
//! ```text
//! {data_dir}/flashcards/
//! ├── decks.json             # Array of all decks
//! ├── cards/
//! │   └── {card-id}.json     # Card content and scheduling state
//! ├── reviews/
//! │   └── {card-id}.json     # Append-only review history
//! └── sessions/
//!     └── {session-id}.json  # Finished study sessions
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::algorithm::Quality;
use super::errors::{FlashcardError, Result};
use super::models::*;
use super::session::StudySession;
use super::stats::aggregate_stats;

/// Storage manager for flashcard operations
pub struct FlashcardStorage {
    /// Base path for flashcard data (e.g., ~/.local/share/sandstone/flashcards)
    base_path: PathBuf,
}

impl FlashcardStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            base_path: data_dir.join("flashcards"),
        }
    }

    fn cards_dir(&self) -> PathBuf {
        self.base_path.join("cards")
    }

    fn reviews_dir(&self) -> PathBuf {
        self.base_path.join("reviews")
    }

    fn sessions_dir(&self) -> PathBuf {
        self.base_path.join("sessions")
    }

    fn decks_path(&self) -> PathBuf {
        self.base_path.join("decks.json")
    }

    fn card_path(&self, card_id: Uuid) -> PathBuf {
        self.cards_dir().join(format!("{}.json", card_id))
    }

    fn reviews_path(&self, card_id: Uuid) -> PathBuf {
        self.reviews_dir().join(format!("{}.json", card_id))
    }

    fn session_path(&self, session_id: Uuid) -> PathBuf {
        self.sessions_dir().join(format!("{}.json", session_id))
    }

    /// Initialize flashcard storage directories
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.cards_dir())?;
        fs::create_dir_all(self.reviews_dir())?;
        fs::create_dir_all(self.sessions_dir())?;

        let decks_path = self.decks_path();
        if !decks_path.exists() {
            let empty_decks: Vec<Deck> = Vec::new();
            fs::write(&decks_path, serde_json::to_string_pretty(&empty_decks)?)?;
        }

        Ok(())
    }

    // ==================== Deck Operations ====================

    /// List all decks
    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        let decks_path = self.decks_path();
        if !decks_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&decks_path)?;
        let decks: Vec<Deck> = serde_json::from_str(&content)?;
        Ok(decks)
    }

    fn write_decks(&self, decks: &[Deck]) -> Result<()> {
        fs::write(self.decks_path(), serde_json::to_string_pretty(decks)?)?;
        Ok(())
    }

    /// Get a specific deck
    pub fn get_deck(&self, deck_id: Uuid) -> Result<Deck> {
        self.list_decks()?
            .into_iter()
            .find(|d| d.id == deck_id)
            .ok_or(FlashcardError::DeckNotFound(deck_id))
    }

    /// Find a deck by id or name (case-insensitive, exact match before prefix match)
    pub fn find_deck(&self, query: &str) -> Result<Deck> {
        let decks = self.list_decks()?;

        if let Ok(id) = Uuid::parse_str(query) {
            if let Some(deck) = decks.iter().find(|d| d.id == id) {
                return Ok(deck.clone());
            }
        }

        let query_lower = query.to_lowercase();
        if let Some(deck) = decks.iter().find(|d| d.name.to_lowercase() == query_lower) {
            return Ok(deck.clone());
        }

        let matches: Vec<&Deck> = decks
            .iter()
            .filter(|d| d.name.to_lowercase().starts_with(&query_lower))
            .collect();

        match matches.as_slice() {
            [] => Err(FlashcardError::DeckNameNotFound(query.to_string())),
            [deck] => Ok((*deck).clone()),
            _ => Err(FlashcardError::AmbiguousDeckName {
                name: query.to_string(),
                matches: matches.iter().map(|d| d.name.clone()).collect(),
            }),
        }
    }

    /// Create a new deck
    pub fn create_deck(&self, name: String, description: Option<String>) -> Result<Deck> {
        self.init()?;

        let mut deck = Deck::new(name);
        deck.description = description;

        let mut decks = self.list_decks()?;
        decks.push(deck.clone());
        self.write_decks(&decks)?;

        log::info!("Created deck '{}' ({})", deck.name, deck.id);
        Ok(deck)
    }

    /// Delete a deck with all its cards and their review history
    pub fn delete_deck(&self, deck_id: Uuid) -> Result<()> {
        let mut decks = self.list_decks()?;
        if !decks.iter().any(|d| d.id == deck_id) {
            return Err(FlashcardError::DeckNotFound(deck_id));
        }

        for card in self.list_cards(deck_id)? {
            self.delete_card(card.id)?;
        }

        decks.retain(|d| d.id != deck_id);
        self.write_decks(&decks)?;

        log::info!("Deleted deck {}", deck_id);
        Ok(())
    }

    fn touch_deck(&self, deck_id: Uuid, now: DateTime<Utc>) -> Result<()> {
        let mut decks = self.list_decks()?;
        let deck = decks
            .iter_mut()
            .find(|d| d.id == deck_id)
            .ok_or(FlashcardError::DeckNotFound(deck_id))?;
        deck.updated_at = now;
        self.write_decks(&decks)
    }

    // ==================== Card Operations ====================

    /// List all cards in a deck, oldest first
    pub fn list_cards(&self, deck_id: Uuid) -> Result<Vec<Card>> {
        let mut cards: Vec<Card> = self
            .list_all_cards()?
            .into_iter()
            .filter(|c| c.deck_id == deck_id)
            .collect();
        cards.sort_by_key(|c| c.created_at);
        Ok(cards)
    }

    /// List all cards across every deck
    pub fn list_all_cards(&self) -> Result<Vec<Card>> {
        read_json_dir(&self.cards_dir())
    }

    /// Get a specific card
    pub fn get_card(&self, card_id: Uuid) -> Result<Card> {
        let card_path = self.card_path(card_id);
        if !card_path.exists() {
            return Err(FlashcardError::CardNotFound(card_id));
        }

        let content = fs::read_to_string(&card_path)?;
        let card: Card = serde_json::from_str(&content)?;
        Ok(card)
    }

    /// Create a new card in a deck
    pub fn create_card(&self, deck_id: Uuid, front: String, back: String, tags: Vec<String>) -> Result<Card> {
        self.init()?;
        // Fail before writing anything if the deck is missing
        self.get_deck(deck_id)?;

        let mut card = Card::new(deck_id, front, back);
        card.tags = tags;

        fs::write(self.card_path(card.id), serde_json::to_string_pretty(&card)?)?;
        self.touch_deck(deck_id, card.created_at)?;

        log::info!("Created card {} in deck {}", card.id, deck_id);
        Ok(card)
    }

    /// Update a card
    pub fn update_card(&self, card: &Card) -> Result<()> {
        let card_path = self.card_path(card.id);
        if !card_path.exists() {
            return Err(FlashcardError::CardNotFound(card.id));
        }

        fs::write(&card_path, serde_json::to_string_pretty(card)?)?;
        Ok(())
    }

    /// Delete a card and its review history
    pub fn delete_card(&self, card_id: Uuid) -> Result<()> {
        let card_path = self.card_path(card_id);
        if !card_path.exists() {
            return Err(FlashcardError::CardNotFound(card_id));
        }
        fs::remove_file(&card_path)?;

        let reviews_path = self.reviews_path(card_id);
        if reviews_path.exists() {
            fs::remove_file(&reviews_path)?;
        }

        Ok(())
    }

    // ==================== Review Operations ====================

    /// Review history for a card, oldest first
    pub fn list_reviews(&self, card_id: Uuid) -> Result<Vec<ReviewEntry>> {
        let reviews_path = self.reviews_path(card_id);
        if !reviews_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&reviews_path)?;
        let entries: Vec<ReviewEntry> = serde_json::from_str(&content)?;
        Ok(entries)
    }

    /// Review history for every card in a deck
    pub fn list_deck_reviews(&self, deck_id: Uuid) -> Result<Vec<ReviewEntry>> {
        let mut entries = Vec::new();
        for card in self.list_cards(deck_id)? {
            entries.extend(self.list_reviews(card.id)?);
        }
        entries.sort_by_key(|e| e.reviewed_at);
        Ok(entries)
    }

    /// Submit a review for a card.
    ///
    /// Unlike the scheduler, storage rejects ratings outside 0-5.
    pub fn submit_review(
        &self,
        card_id: Uuid,
        rating: i32,
        time_spent_ms: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<(Card, ReviewEntry)> {
        let quality = Quality::new(rating)?;
        let mut card = self.get_card(card_id)?;
        let mut history = self.list_reviews(card_id)?;

        let entry = card.apply_review(quality, now, time_spent_ms);
        history.push(entry.clone());

        // History first: a failed write must leave the stored card untouched
        fs::create_dir_all(self.reviews_dir())?;
        fs::write(self.reviews_path(card_id), serde_json::to_string_pretty(&history)?)?;
        self.update_card(&card)?;

        log::info!(
            "Reviewed card {} with quality {}: next in {} day(s)",
            card_id,
            entry.quality,
            card.interval
        );
        Ok((card, entry))
    }

    /// Statistics for a deck at `now`
    pub fn deck_stats(&self, deck_id: Uuid, now: DateTime<Utc>) -> Result<DeckStats> {
        let cards = self.list_cards(deck_id)?;
        Ok(aggregate_stats(&cards, now))
    }

    // ==================== Session Operations ====================

    pub fn save_session(&self, session: &StudySession) -> Result<()> {
        fs::create_dir_all(self.sessions_dir())?;
        fs::write(
            self.session_path(session.id),
            serde_json::to_string_pretty(session)?,
        )?;
        Ok(())
    }

    /// List sessions, most recent first, optionally limited to one deck
    pub fn list_sessions(&self, deck_id: Option<Uuid>) -> Result<Vec<StudySession>> {
        let mut sessions: Vec<StudySession> = read_json_dir(&self.sessions_dir())?;
        if let Some(deck_id) = deck_id {
            sessions.retain(|s| s.deck_id == Some(deck_id));
        }
        sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(sessions)
    }
}

/// Read every `*.json` file in a directory, skipping files that fail to parse
fn read_json_dir<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map_or(false, |ext| ext == "json") {
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str(&content) {
                Ok(item) => items.push(item),
                Err(e) => log::warn!("Skipping unreadable file {}: {}", path.display(), e),
            }
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn create_test_storage() -> (FlashcardStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FlashcardStorage::new(temp_dir.path().to_path_buf());
        storage.init().unwrap();
        (storage, temp_dir)
    }

    #[test]
    fn test_create_and_find_deck() {
        let (storage, _temp) = create_test_storage();

        let deck = storage
            .create_deck("Biology".to_string(), Some("Paper 1".to_string()))
            .unwrap();
        storage.create_deck("Chemistry".to_string(), None).unwrap();
        storage.create_deck("Chem Practicals".to_string(), None).unwrap();

        assert_eq!(storage.list_decks().unwrap().len(), 3);
        assert_eq!(storage.get_deck(deck.id).unwrap().name, "Biology");
        assert_eq!(storage.find_deck("bio").unwrap().id, deck.id);
        assert_eq!(storage.find_deck(&deck.id.to_string()).unwrap().id, deck.id);
        assert_eq!(storage.find_deck("chemistry").unwrap().name, "Chemistry");
        assert!(matches!(
            storage.find_deck("chem"),
            Err(FlashcardError::AmbiguousDeckName { .. })
        ));
        assert!(matches!(
            storage.find_deck("physics"),
            Err(FlashcardError::DeckNameNotFound(_))
        ));
    }

    #[test]
    fn test_create_card_requires_deck() {
        let (storage, _temp) = create_test_storage();
        let result = storage.create_card(Uuid::new_v4(), "q".to_string(), "a".to_string(), Vec::new());
        assert!(matches!(result, Err(FlashcardError::DeckNotFound(_))));
        assert!(storage.list_all_cards().unwrap().is_empty());
    }

    #[test]
    fn test_submit_review_updates_card_and_history() {
        let (storage, _temp) = create_test_storage();
        let deck = storage.create_deck("Physics".to_string(), None).unwrap();
        let card = storage
            .create_card(deck.id, "F = ?".to_string(), "ma".to_string(), vec!["mechanics".to_string()])
            .unwrap();

        let now = Utc::now();
        let (updated, entry) = storage.submit_review(card.id, 4, Some(3_000), now).unwrap();
        assert_eq!(updated.interval, 1);
        assert_eq!(updated.repetitions, 1);
        assert_eq!(entry.interval, 0);

        let later = now + Duration::days(1);
        storage.submit_review(card.id, 5, None, later).unwrap();

        let stored = storage.get_card(card.id).unwrap();
        assert_eq!(stored.repetitions, 2);
        assert_eq!(stored.interval, 6);
        assert_eq!(stored.tags, vec!["mechanics".to_string()]);
        assert_eq!(stored.last_reviewed, Some(later));

        let history = storage.list_reviews(card.id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].quality, 4);
        assert_eq!(history[1].interval, 1);
        assert_eq!(storage.list_deck_reviews(deck.id).unwrap().len(), 2);
    }

    #[test]
    fn test_submit_review_rejects_invalid_rating() {
        let (storage, _temp) = create_test_storage();
        let deck = storage.create_deck("Maths".to_string(), None).unwrap();
        let card = storage
            .create_card(deck.id, "2+2".to_string(), "4".to_string(), Vec::new())
            .unwrap();

        let result = storage.submit_review(card.id, 7, None, Utc::now());
        assert!(matches!(result, Err(FlashcardError::InvalidRating(7))));
        assert!(storage.list_reviews(card.id).unwrap().is_empty());
        assert_eq!(storage.get_card(card.id).unwrap().repetitions, 0);
    }

    #[test]
    fn test_unreadable_history_leaves_card_unchanged() {
        let (storage, temp) = create_test_storage();
        let deck = storage.create_deck("Latin".to_string(), None).unwrap();
        let card = storage
            .create_card(deck.id, "amo".to_string(), "I love".to_string(), Vec::new())
            .unwrap();
        let now = Utc::now();
        storage.submit_review(card.id, 4, None, now).unwrap();
        let before = storage.get_card(card.id).unwrap();

        fs::write(
            temp.path()
                .join("flashcards")
                .join("reviews")
                .join(format!("{}.json", card.id)),
            "{ broken",
        )
        .unwrap();

        let result = storage.submit_review(card.id, 4, None, now + Duration::days(1));
        assert!(matches!(result, Err(FlashcardError::Json(_))));

        let after = storage.get_card(card.id).unwrap();
        assert_eq!(after.repetitions, before.repetitions);
        assert_eq!(after.interval, before.interval);
        assert_eq!(after.next_review, before.next_review);
        assert_eq!(after.last_reviewed, before.last_reviewed);
    }

    #[test]
    fn test_delete_deck_cascades() {
        let (storage, _temp) = create_test_storage();
        let deck = storage.create_deck("History".to_string(), None).unwrap();
        let keep = storage.create_deck("Geography".to_string(), None).unwrap();
        let card = storage
            .create_card(deck.id, "1066".to_string(), "Hastings".to_string(), Vec::new())
            .unwrap();
        storage
            .create_card(keep.id, "Capital of France".to_string(), "Paris".to_string(), Vec::new())
            .unwrap();
        storage.submit_review(card.id, 3, None, Utc::now()).unwrap();

        storage.delete_deck(deck.id).unwrap();

        assert!(matches!(storage.get_deck(deck.id), Err(FlashcardError::DeckNotFound(_))));
        assert!(matches!(storage.get_card(card.id), Err(FlashcardError::CardNotFound(_))));
        assert!(storage.list_reviews(card.id).unwrap().is_empty());
        assert_eq!(storage.list_all_cards().unwrap().len(), 1);
    }

    #[test]
    fn test_deck_stats() {
        let (storage, _temp) = create_test_storage();
        let deck = storage.create_deck("French".to_string(), None).unwrap();
        for word in ["chat", "chien", "oiseau"] {
            storage
                .create_card(deck.id, word.to_string(), String::new(), Vec::new())
                .unwrap();
        }
        let cards = storage.list_cards(deck.id).unwrap();
        storage.submit_review(cards[0].id, 1, None, Utc::now()).unwrap();

        let stats = storage.deck_stats(deck.id, Utc::now()).unwrap();
        assert_eq!(stats.total_cards, 3);
        assert_eq!(stats.new_cards, 2);
        assert_eq!(stats.relearning_cards, 1);
        assert_eq!(stats.total_lapses, 1);
    }

    #[test]
    fn test_sessions_roundtrip() {
        let (storage, _temp) = create_test_storage();
        let deck_id = Uuid::new_v4();
        let now = Utc::now();

        let mut older = StudySession::start(Some(deck_id), now - Duration::days(1));
        older.record(Quality::clamped(4), Some(1_000)).unwrap();
        older.finish(now - Duration::days(1)).unwrap();
        let newer = StudySession::start(Some(deck_id), now);
        let other = StudySession::start(None, now);

        storage.save_session(&older).unwrap();
        storage.save_session(&newer).unwrap();
        storage.save_session(&other).unwrap();

        let sessions = storage.list_sessions(Some(deck_id)).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, newer.id);
        assert_eq!(sessions[1], older);
        assert_eq!(storage.list_sessions(None).unwrap().len(), 3);
    }

    #[test]
    fn test_corrupt_card_file_is_skipped() {
        let (storage, temp) = create_test_storage();
        let deck = storage.create_deck("Music".to_string(), None).unwrap();
        storage
            .create_card(deck.id, "Do".to_string(), "C".to_string(), Vec::new())
            .unwrap();
        fs::write(
            temp.path().join("flashcards").join("cards").join("broken.json"),
            "{ not json",
        )
        .unwrap();

        assert_eq!(storage.list_cards(deck.id).unwrap().len(), 1);
    }
}
