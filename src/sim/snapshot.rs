//! Read-only view of a frame for the render sink

use super::collision::Rect;
use super::state::{ActivePowerUp, Coin, GamePhase, GameState, Particle, PowerUpToken, Traffic};
use crate::consts::NIGHT_FROM_LEVEL;

/// Road palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Day,
    Night,
}

impl Background {
    pub fn for_level(level: u32) -> Self {
        if level >= NIGHT_FROM_LEVEL {
            Background::Night
        } else {
            Background::Day
        }
    }
}

/// Everything a renderer needs to draw one frame, borrowed from the state
#[derive(Debug, Clone, Copy)]
pub struct RenderSnapshot<'a> {
    pub phase: GamePhase,
    pub background: Background,
    pub road_offset: f32,
    pub bike: Rect,
    pub traffic: &'a [Traffic],
    pub coins: &'a [Coin],
    pub power_ups: &'a [PowerUpToken],
    pub particles: &'a [Particle],
    pub active_power_up: Option<ActivePowerUp>,
    /// Remaining frames of screen shake
    pub shake: u32,
    /// Frame counter, for pulsing HUD elements
    pub frame: u64,

    // HUD
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
    pub speed: f32,
    pub run_coins: u32,
    pub combo: u32,
}

impl<'a> RenderSnapshot<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        Self {
            phase: state.phase,
            background: Background::for_level(state.level),
            road_offset: state.road_offset,
            bike: state.bike.rect(),
            traffic: &state.traffic,
            coins: &state.coin_items,
            power_ups: &state.power_ups,
            particles: &state.particles,
            active_power_up: state.power_up,
            shake: state.shake,
            frame: state.frame,
            score: state.score,
            high_score: state.high_score,
            level: state.level,
            speed: state.speed,
            run_coins: state.coins,
            combo: state.combo.count,
        }
    }

    /// Fraction of the active power-up still remaining, for the HUD bar
    pub fn power_up_fraction(&self) -> Option<f32> {
        self.active_power_up
            .map(|p| (p.remaining_ms / p.duration_ms).clamp(0.0, 1.0))
    }

    /// Coins and power-ups still on the road (collected ones are hidden)
    pub fn visible_pickups(&self) -> usize {
        self.coins.iter().filter(|c| !c.collected).count()
            + self.power_ups.iter().filter(|p| !p.collected).count()
    }
}
