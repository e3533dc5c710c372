//! Data-driven game balance
//!
//! Defaults mirror `consts`; a JSON override can replace any subset of fields.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Balance values consulted by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Scroll speed at session start (px per 60 fps frame)
    pub initial_speed: f32,
    /// Speed added on each level up
    pub speed_increment: f32,
    /// Level ups stop once speed reaches this
    pub max_speed: f32,
    /// A level up happens every time score is a multiple of this
    pub score_for_speed_up: u32,
    /// Time between traffic spawns (ms)
    pub spawn_interval_ms: f32,
    /// Exponential smoothing constant for lane changes (higher = snappier)
    pub move_smoothing: f32,
    /// Tilt angle (degrees) that counts as a lane change
    pub tilt_threshold: f32,
    /// Minimum gap between tilt-driven lane changes (ms)
    pub tilt_cooldown_ms: f64,
    /// Chance per traffic spawn of also spawning a coin
    pub coin_spawn_chance: f64,
    /// Chance per traffic spawn of also spawning a power-up
    pub power_up_spawn_chance: f64,
    /// Combo decays to zero after this long without a coin (ms)
    pub combo_timeout_ms: f32,
    /// Particle life (ms)
    pub particle_lifetime_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_speed: INITIAL_SPEED,
            speed_increment: SPEED_INCREMENT,
            max_speed: MAX_SPEED,
            score_for_speed_up: SCORE_FOR_SPEED_UP,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            move_smoothing: MOVE_SMOOTHING,
            tilt_threshold: TILT_THRESHOLD_DEG,
            tilt_cooldown_ms: TILT_COOLDOWN_MS,
            coin_spawn_chance: COIN_SPAWN_CHANCE,
            power_up_spawn_chance: POWER_UP_SPAWN_CHANCE,
            combo_timeout_ms: COMBO_TIMEOUT_MS,
            particle_lifetime_ms: PARTICLE_LIFETIME_MS,
        }
    }
}

impl Tuning {
    /// Parse a JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if !(self.initial_speed > 0.0) {
            return invalid("initial_speed", "must be positive");
        }
        if self.max_speed < self.initial_speed {
            return invalid("max_speed", "must be at least initial_speed");
        }
        if self.speed_increment < 0.0 {
            return invalid("speed_increment", "must not be negative");
        }
        if self.score_for_speed_up == 0 {
            return invalid("score_for_speed_up", "must be non-zero");
        }
        if !(self.spawn_interval_ms > 0.0) {
            return invalid("spawn_interval_ms", "must be positive");
        }
        if !(self.move_smoothing > 0.0) {
            return invalid("move_smoothing", "must be positive");
        }
        if !(0.0..=1.0).contains(&self.coin_spawn_chance) {
            return invalid("coin_spawn_chance", "must be within 0..=1");
        }
        if !(0.0..=1.0).contains(&self.power_up_spawn_chance) {
            return invalid("power_up_spawn_chance", "must be within 0..=1");
        }
        if !(self.combo_timeout_ms > 0.0) {
            return invalid("combo_timeout_ms", "must be positive");
        }
        if !(self.particle_lifetime_ms > 0.0) {
            return invalid("particle_lifetime_ms", "must be positive");
        }
        Ok(())
    }

    /// Highest speed the audit still accepts
    pub fn audit_speed_limit(&self) -> f32 {
        self.max_speed + SPEED_AUDIT_SLACK
    }
}
