//! Study mode selection
//!
//! Picks which cards a study session shows and in what order. Shuffling
//! takes an injected RNG so callers (and tests) can seed it.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::models::{Card, CardStatus};

/// Which cards a study session includes and how they are ordered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyModeConfig {
    pub include_new: bool,
    pub include_review: bool,
    /// Also covers relearning cards
    pub include_learning: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_limit: Option<usize>,
    pub shuffle: bool,
    /// Put cards with many lapses and low ease first
    pub focus_weak: bool,
}

impl Default for StudyModeConfig {
    fn default() -> Self {
        Self {
            include_new: true,
            include_review: true,
            include_learning: true,
            card_limit: None,
            shuffle: false,
            focus_weak: false,
        }
    }
}

impl StudyModeConfig {
    fn includes(&self, status: CardStatus) -> bool {
        match status {
            CardStatus::New => self.include_new,
            CardStatus::Learning | CardStatus::Relearning => self.include_learning,
            CardStatus::Review => self.include_review,
        }
    }
}

/// Named presets for common ways of studying a deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StudyMode {
    /// Everything, in scheduled order
    #[default]
    Standard,
    NewOnly,
    ReviewOnly,
    /// Everything, shuffled
    Cram,
    WeakCards,
}

impl From<StudyMode> for StudyModeConfig {
    fn from(mode: StudyMode) -> Self {
        let all = StudyModeConfig::default();
        match mode {
            StudyMode::Standard => all,
            StudyMode::NewOnly => StudyModeConfig {
                include_review: false,
                include_learning: false,
                ..all
            },
            StudyMode::ReviewOnly => StudyModeConfig {
                include_new: false,
                ..all
            },
            StudyMode::Cram => StudyModeConfig {
                shuffle: true,
                ..all
            },
            StudyMode::WeakCards => StudyModeConfig {
                include_new: false,
                focus_weak: true,
                ..all
            },
        }
    }
}

/// Select and order cards for a study session.
///
/// Cards are filtered by status, optionally shuffled (Fisher-Yates), then
/// optionally stable-sorted by descending weakness, and finally capped at
/// `card_limit`. When both `shuffle` and `focus_weak` are set, the shuffle
/// only decides the order among equally weak cards.
pub fn filter_for_study_mode<R: Rng + ?Sized>(
    cards: &[Card],
    config: &StudyModeConfig,
    rng: &mut R,
) -> Vec<Card> {
    let mut selected: Vec<Card> = cards
        .iter()
        .filter(|card| config.includes(card.status()))
        .cloned()
        .collect();

    if config.shuffle {
        selected.shuffle(rng);
    }

    if config.focus_weak {
        selected.sort_by(|a, b| b.weakness().total_cmp(&a.weakness()));
    }

    if let Some(limit) = config.card_limit {
        selected.truncate(limit);
    }

    log::debug!(
        "study mode selected {} of {} cards",
        selected.len(),
        cards.len()
    );

    selected
}

/// Cards due at `now`, oldest due first; unscheduled cards lead
pub fn due_cards(cards: &[Card], now: DateTime<Utc>) -> Vec<Card> {
    let mut due: Vec<Card> = cards.iter().filter(|c| c.is_due(now)).cloned().collect();
    // None sorts before Some
    due.sort_by_key(|c| c.next_review);
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Uuid;

    fn card(front: &str, repetitions: u32, lapses: u32, ease_factor: f64) -> Card {
        let mut card = Card::new(Uuid::nil(), front.to_string(), String::new());
        card.repetitions = repetitions;
        card.lapses = lapses;
        card.ease_factor = ease_factor;
        card
    }

    fn deck() -> Vec<Card> {
        vec![
            card("new", 0, 0, 2.5),
            card("learning", 1, 0, 2.5),
            card("relearning", 0, 3, 1.6),
            card("review", 4, 0, 2.7),
            card("shaky", 5, 1, 1.9),
            card("solid", 8, 0, 3.0),
        ]
    }

    fn fronts(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|c| c.front.as_str()).collect()
    }

    #[test]
    fn test_default_config_keeps_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let selected = filter_for_study_mode(&deck(), &StudyModeConfig::default(), &mut rng);
        assert_eq!(
            fronts(&selected),
            vec!["new", "learning", "relearning", "review", "shaky", "solid"]
        );
    }

    #[test]
    fn test_status_flags() {
        let mut rng = StdRng::seed_from_u64(7);
        let new_only = filter_for_study_mode(&deck(), &StudyMode::NewOnly.into(), &mut rng);
        assert_eq!(fronts(&new_only), vec!["new"]);

        let config = StudyModeConfig {
            include_new: false,
            include_review: false,
            ..StudyModeConfig::default()
        };
        let learning = filter_for_study_mode(&deck(), &config, &mut rng);
        assert_eq!(fronts(&learning), vec!["learning", "relearning"]);
    }

    #[test]
    fn test_card_limit() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = StudyModeConfig {
            card_limit: Some(5),
            shuffle: true,
            ..StudyModeConfig::default()
        };
        let cards: Vec<Card> = (0..20).map(|i| card(&i.to_string(), 0, 0, 2.5)).collect();
        assert_eq!(filter_for_study_mode(&cards, &config, &mut rng).len(), 5);
        assert_eq!(filter_for_study_mode(&cards[..3], &config, &mut rng).len(), 3);
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = StudyModeConfig::from(StudyMode::Cram);
        let cards = deck();

        let shuffled = filter_for_study_mode(&cards, &config, &mut rng);

        let mut expected = fronts(&cards);
        let mut actual = fronts(&shuffled);
        expected.sort_unstable();
        actual.sort_unstable();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_shuffle_is_deterministic_for_a_seed() {
        let config = StudyModeConfig::from(StudyMode::Cram);
        let cards: Vec<Card> = (0..30).map(|i| card(&i.to_string(), 0, 0, 2.5)).collect();

        let first = filter_for_study_mode(&cards, &config, &mut StdRng::seed_from_u64(9));
        let second = filter_for_study_mode(&cards, &config, &mut StdRng::seed_from_u64(9));
        assert_eq!(fronts(&first), fronts(&second));
    }

    #[test]
    fn test_focus_weak_orders_by_weakness() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = StudyModeConfig::from(StudyMode::WeakCards);
        let selected = filter_for_study_mode(&deck(), &config, &mut rng);

        // relearning: 6 + 1.4, shaky: 2 + 1.1, learning: 0.5, review: 0.3, solid: 0
        assert_eq!(
            fronts(&selected),
            vec!["relearning", "shaky", "learning", "review", "solid"]
        );
    }

    #[test]
    fn test_shuffle_only_reorders_equally_weak_cards() {
        let config = StudyModeConfig {
            shuffle: true,
            focus_weak: true,
            ..StudyModeConfig::default()
        };
        let mut cards: Vec<Card> = (0..8)
            .map(|i| card(&format!("tied {}", i), 3, 1, 2.0))
            .collect();
        cards.push(card("weakest", 0, 4, 1.3));
        cards.push(card("strongest", 6, 0, 3.0));

        let mut tied_orders = std::collections::HashSet::new();
        for seed in 0..20 {
            let selected = filter_for_study_mode(&cards, &config, &mut StdRng::seed_from_u64(seed));
            assert_eq!(selected.len(), cards.len());
            assert!(selected
                .windows(2)
                .all(|pair| pair[0].weakness() >= pair[1].weakness()));
            assert_eq!(selected[0].front, "weakest");
            assert_eq!(selected[selected.len() - 1].front, "strongest");

            let tied: Vec<String> = selected[1..9].iter().map(|c| c.front.clone()).collect();
            tied_orders.insert(tied);
        }
        assert!(tied_orders.len() > 1);
    }

    #[test]
    fn test_due_cards_order() {
        let now = Utc::now();
        let mut later = card("later", 3, 0, 2.5);
        later.next_review = Some(now + Duration::days(3));
        let mut yesterday = card("yesterday", 3, 0, 2.5);
        yesterday.next_review = Some(now - Duration::days(1));
        let mut last_week = card("last week", 3, 0, 2.5);
        last_week.next_review = Some(now - Duration::days(7));
        let fresh = card("fresh", 0, 0, 2.5);

        let due = due_cards(&[later, yesterday, fresh, last_week], now);
        assert_eq!(fronts(&due), vec!["fresh", "last week", "yesterday"]);
    }
}
