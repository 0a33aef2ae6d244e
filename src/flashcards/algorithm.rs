//! Spaced Repetition Algorithm
//!
//! SM-2 interval growth with a few FSRS-inspired additions: a lapse-aware
//! ease penalty, a stability bonus on long intervals, and derived
//! difficulty/stability scalars stored on the card.
//!
//! Quality ratings (0-5):
//! - 0: Complete blackout, no recall
//! - 1: Incorrect, but upon seeing answer, remembered
//! - 2: Incorrect, but answer seemed easy to recall
//! - 3: Correct response with serious difficulty
//! - 4: Correct response after hesitation
//! - 5: Perfect response with no hesitation

use chrono::{DateTime, Duration, Utc};

use super::errors::{FlashcardError, Result};

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f64 = 1.3;
/// Maximum ease factor allowed
pub const MAX_EASE_FACTOR: f64 = 3.0;
/// Ease factor of a freshly created card
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
/// Intervals never exceed one year
pub const MAX_INTERVAL_DAYS: u32 = 365;
/// Lowest quality that counts as a successful recall
pub const PASSING_QUALITY: u8 = 3;

const LAPSE_BASE_PENALTY: f64 = 0.2;
const LAPSE_STEP_PENALTY: f64 = 0.05;
const LAPSE_INTERVAL_DECAY: f64 = 0.8;
const STABILITY_BONUS_STEP: f64 = 0.02;
const MAX_STABILITY_BONUS: f64 = 1.2;

/// A quality rating guaranteed to be within 0-5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(u8);

impl Quality {
    /// Strict constructor, rejecting ratings outside 0-5
    pub fn new(rating: i32) -> Result<Self> {
        if (0..=5).contains(&rating) {
            Ok(Self(rating as u8))
        } else {
            Err(FlashcardError::InvalidRating(rating))
        }
    }

    /// Lenient constructor, clamping into 0-5
    pub fn clamped(rating: i32) -> Self {
        Self(rating.clamp(0, 5) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_pass(self) -> bool {
        self.0 >= PASSING_QUALITY
    }
}

/// Scheduling inputs taken from a card before a review
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulingState {
    pub interval: u32,
    pub repetitions: u32,
    pub ease_factor: f64,
    pub lapses: u32,
}

impl Default for SchedulingState {
    fn default() -> Self {
        Self {
            interval: 0,
            repetitions: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            lapses: 0,
        }
    }
}

/// Result of calculating the next review
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub interval: u32,
    pub repetitions: u32,
    pub ease_factor: f64,
    pub difficulty: f64,
    pub stability: f64,
    pub next_review: DateTime<Utc>,
    pub lapses: u32,
}

/// Calculate the next schedule for a card.
///
/// Out-of-range quality is clamped into 0-5 rather than rejected; use
/// [`Quality::new`] first when a strict contract is wanted.
pub fn compute_review(quality: impl Into<i32>, state: &SchedulingState, now: DateTime<Utc>) -> ReviewOutcome {
    let quality = Quality::clamped(quality.into());
    let prior_ease = state.ease_factor.clamp(MIN_EASE_FACTOR, MAX_EASE_FACTOR);

    let (interval, repetitions, ease_factor, lapses) = if quality.is_pass() {
        let repetitions = state.repetitions.saturating_add(1);
        let interval = match repetitions {
            1 => 1,
            2 => 6,
            _ => {
                let bonus = stability_bonus(state.repetitions);
                (state.interval as f64 * prior_ease * bonus).round() as u32
            }
        };

        // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
        let miss = (5 - quality.value()) as f64;
        let ease_factor = prior_ease + (0.1 - miss * (0.08 + miss * 0.02));

        (interval, repetitions, ease_factor, state.lapses)
    } else {
        let lapses = state.lapses.saturating_add(1);
        // Repeated lapses shrink the relearning step toward "again today";
        // the exponent is the lapse count before this failure
        let exponent = state.lapses.min(i32::MAX as u32) as i32;
        let interval = LAPSE_INTERVAL_DECAY.powi(exponent).round() as u32;
        let penalty = LAPSE_BASE_PENALTY + LAPSE_STEP_PENALTY * state.lapses as f64;

        (interval, 0, prior_ease - penalty, lapses)
    };

    let interval = interval.min(MAX_INTERVAL_DAYS);
    let ease_factor = ease_factor.clamp(MIN_EASE_FACTOR, MAX_EASE_FACTOR);
    let difficulty = ((MAX_EASE_FACTOR - ease_factor) / (MAX_EASE_FACTOR - MIN_EASE_FACTOR)).clamp(0.0, 1.0);
    let stability = interval as f64 * (1.0 + 0.1 * repetitions as f64) / (1.0 + 0.1 * lapses as f64);

    log::debug!(
        "quality {} on rep {} (interval {}, ease {:.2}) -> interval {}, ease {:.2}, lapses {}",
        quality.value(),
        state.repetitions,
        state.interval,
        state.ease_factor,
        interval,
        ease_factor,
        lapses
    );

    ReviewOutcome {
        interval,
        repetitions,
        ease_factor,
        difficulty,
        stability,
        next_review: now + Duration::days(interval as i64),
        lapses,
    }
}

/// Interval multiplier that grows slowly with the number of prior successes
fn stability_bonus(repetitions: u32) -> f64 {
    (1.0 + STABILITY_BONUS_STEP * repetitions as f64).min(MAX_STABILITY_BONUS)
}

/// Calculate the preview intervals for each UI rating
/// Used to show users what interval each button would give
pub fn preview_intervals(state: &SchedulingState) -> [u32; 4] {
    let now = Utc::now();
    [1, 2, 3, 4].map(|rating| compute_review(ui_rating_to_quality(rating), state, now).interval)
}

/// Map UI rating (1-4: Again, Hard, Good, Easy) to SM-2 quality (0-5)
pub fn ui_rating_to_quality(rating: i32) -> i32 {
    match rating {
        1 => 1, // Again -> quality 1 (incorrect but recognized)
        2 => 3, // Hard -> quality 3 (correct with difficulty)
        3 => 4, // Good -> quality 4 (correct with hesitation)
        4 => 5, // Easy -> quality 5 (perfect)
        _ => 4,
    }
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1..=6 => format!("{}d", days),
        7..=29 => format!("{}w", days / 7),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}
