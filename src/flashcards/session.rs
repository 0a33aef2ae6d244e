//! Study session tracking
//!
//! A session aggregates the reviews performed in one sitting. It is opened
//! with [`StudySession::start`], fed one rating per reviewed card, and closed
//! with [`StudySession::finish`]; a closed session rejects further updates.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::algorithm::Quality;
use super::errors::{FlashcardError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deck_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub cards_reviewed: usize,
    pub correct_count: usize,
    pub ratings: Vec<u8>,
    /// Sum of per-card answer times
    pub total_time_ms: u64,
}

impl StudySession {
    pub fn start(deck_id: Option<Uuid>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            deck_id,
            started_at: now,
            ended_at: None,
            cards_reviewed: 0,
            correct_count: 0,
            ratings: Vec::new(),
            total_time_ms: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Record one reviewed card
    pub fn record(&mut self, quality: Quality, time_spent_ms: Option<u64>) -> Result<()> {
        if !self.is_active() {
            return Err(FlashcardError::SessionClosed(self.id));
        }

        self.cards_reviewed += 1;
        if quality.is_pass() {
            self.correct_count += 1;
        }
        self.ratings.push(quality.value());
        self.total_time_ms += time_spent_ms.unwrap_or(0);
        Ok(())
    }

    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<()> {
        if !self.is_active() {
            return Err(FlashcardError::SessionClosed(self.id));
        }
        self.ended_at = Some(now.max(self.started_at));
        log::info!(
            "Study session {} closed: {}/{} correct",
            self.id,
            self.correct_count,
            self.cards_reviewed
        );
        Ok(())
    }

    /// Share of passing reviews, 0.0 for an empty session
    pub fn accuracy(&self) -> f64 {
        if self.cards_reviewed == 0 {
            return 0.0;
        }
        self.correct_count as f64 / self.cards_reviewed as f64
    }

    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let sum: u32 = self.ratings.iter().map(|&r| r as u32).sum();
        Some(sum as f64 / self.ratings.len() as f64)
    }

    /// Wall-clock length, up to `now` while the session is still open
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        self.ended_at.unwrap_or(now) - self.started_at
    }
}
