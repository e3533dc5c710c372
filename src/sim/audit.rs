//! Invariant audit for a running session
//!
//! Checked on a slow real-time timer. Anything outside the believable
//! envelope ends the run.

use thiserror::Error;

use super::state::{GamePhase, GameState};
use crate::validate_score;

/// A broken session invariant
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Violation {
    /// Score at or above the believable limit
    #[error("SCORE_RANGE: score {score} is out of range")]
    ScoreOutOfRange { score: u32 },
    /// Speed negative, not finite, or far above the configured maximum
    #[error("SPEED_RANGE: speed {speed} outside [0, {limit}]")]
    SpeedOutOfRange { speed: f32, limit: f32 },
}

impl Violation {
    /// Short machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Violation::ScoreOutOfRange { .. } => "SCORE_RANGE",
            Violation::SpeedOutOfRange { .. } => "SPEED_RANGE",
        }
    }
}

/// Check score and speed. Only a `Playing` session is audited.
pub fn audit(state: &GameState) -> Result<(), Violation> {
    if state.phase != GamePhase::Playing {
        return Ok(());
    }

    if !validate_score(state.score) {
        return Err(Violation::ScoreOutOfRange { score: state.score });
    }

    let limit = state.tuning.audit_speed_limit();
    if !(0.0..=limit).contains(&state.speed) {
        return Err(Violation::SpeedOutOfRange {
            speed: state.speed,
            limit,
        });
    }

    Ok(())
}
