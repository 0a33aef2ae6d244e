//! Data models for the flashcard system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::algorithm::{compute_review, Quality, SchedulingState, DEFAULT_EASE_FACTOR};
use super::status::classify_status;

/// A deck is a named collection of flashcards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deck {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Status of a card in the spaced repetition system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardStatus {
    /// Never reviewed
    New,
    /// One or two successful reviews so far
    Learning,
    /// Regular spaced review
    Review,
    /// Failed and re-learning
    Relearning,
}

impl Default for CardStatus {
    fn default() -> Self {
        Self::New
    }
}

impl std::fmt::Display for CardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Review => "review",
            Self::Relearning => "relearning",
        };
        f.write_str(label)
    }
}

/// A flashcard with its content and current spaced repetition state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Days until the next review
    #[serde(default)]
    pub interval: u32,
    /// Consecutive successful reviews
    #[serde(default)]
    pub repetitions: u32,
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    /// Derived difficulty in [0, 1], set after the first review
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,
    /// Derived stability in days, set after the first review
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
    /// Times the card has been forgotten
    #[serde(default)]
    pub lapses: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

impl Card {
    pub fn new(deck_id: Uuid, front: String, back: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            deck_id,
            front,
            back,
            tags: Vec::new(),
            interval: 0,
            repetitions: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            difficulty: None,
            stability: None,
            last_reviewed: None,
            next_review: None,
            lapses: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> CardStatus {
        classify_status(self.repetitions, self.lapses)
    }

    /// A card with no scheduled review is always due
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review.map_or(true, |due| due <= now)
    }

    /// Mastered cards have five or more successful reviews and never lapsed
    pub fn is_mastered(&self) -> bool {
        self.repetitions >= 5 && self.lapses == 0
    }

    /// Weak cards sort first when studying in "focus on weak" mode
    pub fn weakness(&self) -> f64 {
        self.lapses as f64 * 2.0 + (3.0 - self.ease_factor)
    }

    pub fn scheduling_state(&self) -> SchedulingState {
        SchedulingState {
            interval: self.interval,
            repetitions: self.repetitions,
            ease_factor: self.ease_factor,
            lapses: self.lapses,
        }
    }

    /// Review the card, updating its schedule in place.
    ///
    /// The returned entry records the interval and ease factor the card had
    /// *before* this review.
    pub fn apply_review(
        &mut self,
        quality: Quality,
        now: DateTime<Utc>,
        time_spent_ms: Option<u64>,
    ) -> ReviewEntry {
        let entry = ReviewEntry::new(self.id, quality, self.interval, self.ease_factor, now, time_spent_ms);

        let outcome = compute_review(quality.value(), &self.scheduling_state(), now);
        self.interval = outcome.interval;
        self.repetitions = outcome.repetitions;
        self.ease_factor = outcome.ease_factor;
        self.difficulty = Some(outcome.difficulty);
        self.stability = Some(outcome.stability);
        self.lapses = outcome.lapses;
        self.next_review = Some(outcome.next_review);
        self.last_reviewed = Some(now);
        self.updated_at = now;

        entry
    }
}

/// A record of a single review attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub id: Uuid,
    pub card_id: Uuid,
    /// When the review occurred
    pub reviewed_at: DateTime<Utc>,
    /// Quality rating (0-5, SM-2 scale)
    pub quality: u8,
    /// Interval at time of review (days)
    pub interval: u32,
    /// Ease factor at time of review
    pub ease_factor: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent_ms: Option<u64>,
}

impl ReviewEntry {
    pub fn new(
        card_id: Uuid,
        quality: Quality,
        interval: u32,
        ease_factor: f64,
        reviewed_at: DateTime<Utc>,
        time_spent_ms: Option<u64>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            card_id,
            reviewed_at,
            quality: quality.value(),
            interval,
            ease_factor,
            time_spent_ms,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.quality >= 3
    }
}

/// Statistics for a collection of cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    pub total_cards: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub review_cards: usize,
    pub relearning_cards: usize,
    pub due_cards: usize,
    pub mastered_cards: usize,
    pub average_ease: f64,
    pub average_difficulty: f64,
    pub total_lapses: u64,
}

impl Default for DeckStats {
    fn default() -> Self {
        Self {
            total_cards: 0,
            new_cards: 0,
            learning_cards: 0,
            review_cards: 0,
            relearning_cards: 0,
            due_cards: 0,
            mastered_cards: 0,
            average_ease: DEFAULT_EASE_FACTOR,
            average_difficulty: 0.0,
            total_lapses: 0,
        }
    }
}

/// Review activity derived from review history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewActivity {
    pub reviews_today: usize,
    pub correct_today: usize,
    pub streak_days: u32,
    /// Share of passing reviews across the whole history
    pub retention: f64,
}
