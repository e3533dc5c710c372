//! Best score tracking
//!
//! A single best score persisted under `bikeRacerHighScore` as a decimal
//! string. Anything unparseable or out of range reads as zero.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, keys, set_best_effort};
use crate::validate_score;

/// Best score across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u32,
}

impl HighScore {
    pub fn new(best: u32) -> Self {
        Self { best }
    }

    /// Parse a stored value; only plain in-range integers are accepted
    pub fn parse(raw: &str) -> Option<u32> {
        let score = raw.trim().parse::<u32>().ok()?;
        validate_score(score).then_some(score)
    }

    /// Whether a finished run should replace the best
    pub fn qualifies(&self, score: u32) -> bool {
        validate_score(score) && score > self.best
    }

    /// Record a finished run. Returns true if it became the new best.
    pub fn submit(&mut self, score: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let Some(raw) = store.get(keys::HIGH_SCORE) else {
            return Self::default();
        };
        match Self::parse(&raw) {
            Some(best) => {
                log::info!("loaded high score {best}");
                Self { best }
            }
            None => {
                log::debug!("ignoring stored high score {raw:?}");
                Self::default()
            }
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        if set_best_effort(store, keys::HIGH_SCORE, &self.best.to_string()) {
            log::info!("high score saved ({})", self.best);
        }
    }
}
