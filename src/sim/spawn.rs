//! Spawn scheduling
//!
//! Traffic arrives on a fixed interval measured in simulated time. Slow frames
//! catch up by spawning several cars in one tick instead of dropping them.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Coin, GameState, PowerUpKind, PowerUpToken, Traffic};
use crate::consts::LANE_COUNT;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnScheduler {
    /// Milliseconds accumulated toward the next spawn
    pub accumulator_ms: f32,
}

impl SpawnScheduler {
    /// Add `dt` seconds and return how many spawn intervals elapsed
    pub fn advance(&mut self, dt: f32, interval_ms: f32) -> u32 {
        self.accumulator_ms += dt * 1000.0;
        let mut due = 0;
        while self.accumulator_ms >= interval_ms {
            self.accumulator_ms -= interval_ms;
            due += 1;
        }
        due
    }
}

/// Run the scheduler for one tick and spawn whatever came due
pub fn run_spawner(state: &mut GameState, dt: f32) -> u32 {
    let interval = state.tuning.spawn_interval_ms;
    let due = state.spawner.advance(dt, interval);
    for _ in 0..due {
        spawn_traffic(state);
    }
    due
}

/// Spawn one car, and maybe a coin and a power-up alongside it
///
/// Each item picks its own lane independently.
pub fn spawn_traffic(state: &mut GameState) {
    let lane = state.rng.random_range(0..LANE_COUNT);
    let sprite = state.rng.random_range(0..state.car_variants.max(1));
    state.traffic.push(Traffic::new(lane, sprite));
    log::debug!("car spawned in lane {lane}");

    if state.rng.random_bool(state.tuning.coin_spawn_chance) {
        spawn_coin(state);
    }
    if state.rng.random_bool(state.tuning.power_up_spawn_chance) {
        spawn_power_up(state);
    }
}

pub fn spawn_coin(state: &mut GameState) {
    let lane = state.rng.random_range(0..LANE_COUNT);
    state.coin_items.push(Coin::new(lane));
}

pub fn spawn_power_up(state: &mut GameState) {
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let lane = state.rng.random_range(0..LANE_COUNT);
    state.power_ups.push(PowerUpToken::new(kind, lane));
    log::debug!("{} power-up spawned in lane {lane}", kind.as_str());
}
