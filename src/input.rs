//! Player input
//!
//! Keyboard, touch and tilt all reduce to the same three discrete events.

use crate::consts::LANE_COUNT;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MoveLeft,
    MoveRight,
    TogglePause,
}

impl InputEvent {
    /// Lane direction for movement events
    pub fn direction(&self) -> Option<i8> {
        match self {
            InputEvent::MoveLeft => Some(-1),
            InputEvent::MoveRight => Some(1),
            InputEvent::TogglePause => None,
        }
    }

    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(InputEvent::MoveLeft),
            "ArrowRight" => Some(InputEvent::MoveRight),
            "p" | "P" | " " => Some(InputEvent::TogglePause),
            _ => None,
        }
    }

    /// Map a touch at canvas-relative `x`: left half steers left
    pub fn from_touch(x: f32, canvas_width: f32) -> Self {
        if x < canvas_width / 2.0 {
            InputEvent::MoveLeft
        } else {
            InputEvent::MoveRight
        }
    }
}

/// Turns device tilt (gamma, degrees) into lane moves
///
/// A move needs the tilt past the threshold and the cooldown elapsed since
/// the last move. Tilts at the road edge do not start a cooldown.
#[derive(Debug, Clone)]
pub struct TiltFilter {
    threshold_deg: f32,
    cooldown_ms: f64,
    last_move_ms: Option<f64>,
}

impl TiltFilter {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            threshold_deg: tuning.tilt_threshold,
            cooldown_ms: tuning.tilt_cooldown_ms,
            last_move_ms: None,
        }
    }

    pub fn sample(&mut self, gamma_deg: f32, now_ms: f64, lane: u8) -> Option<InputEvent> {
        if !gamma_deg.is_finite() {
            return None;
        }
        if self
            .last_move_ms
            .is_some_and(|last| now_ms - last < self.cooldown_ms)
        {
            return None;
        }

        let event = if gamma_deg > self.threshold_deg && lane + 1 < LANE_COUNT {
            InputEvent::MoveRight
        } else if gamma_deg < -self.threshold_deg && lane > 0 {
            InputEvent::MoveLeft
        } else {
            return None;
        };
        self.last_move_ms = Some(now_ms);
        Some(event)
    }
}
