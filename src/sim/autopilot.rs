//! Demo-mode driver
//!
//! Picks a lane each frame: stay clear of traffic ahead, drift toward
//! pickups when it is safe. Used by the headless demo and attract screens.

use super::state::GameState;
use crate::consts::LANE_COUNT;

/// Extra look-ahead distance per unit of speed (px)
const LOOKAHEAD_PER_SPEED: f32 = 24.0;
const BASE_LOOKAHEAD: f32 = 150.0;
/// Minimum time between two lane changes (ms)
const REACTION_MS: f32 = 140.0;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    cooldown_ms: f32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lane direction to take this frame: -1 left, 1 right, 0 stay
    pub fn steer(&mut self, state: &GameState, dt: f32) -> i8 {
        self.cooldown_ms = (self.cooldown_ms - dt * 1000.0).max(0.0);
        if self.cooldown_ms > 0.0 {
            return 0;
        }

        let current = state.bike.lane;
        let target = best_lane(state);
        if target == current {
            return 0;
        }

        let direction: i8 = if target > current { 1 } else { -1 };
        let next = (current as i8 + direction) as u8;
        // Never cut through a blocked lane on the way
        if lane_blocked(state, next) {
            return 0;
        }
        self.cooldown_ms = REACTION_MS;
        direction
    }
}

fn lookahead(state: &GameState) -> f32 {
    BASE_LOOKAHEAD + state.speed * LOOKAHEAD_PER_SPEED
}

/// A car is in `lane` between the look-ahead horizon and the bike's tail
fn lane_blocked(state: &GameState, lane: u8) -> bool {
    let bike = state.bike.rect();
    let horizon = bike.top() - lookahead(state);
    state.traffic.iter().any(|car| {
        let rect = car.rect();
        car.lane == lane && rect.bottom() > horizon && rect.top() < bike.bottom()
    })
}

/// Pickups ahead in `lane` that are still collectable
fn lane_reward(state: &GameState, lane: u8) -> usize {
    let bike = state.bike.rect();
    let horizon = bike.top() - lookahead(state) * 1.5;
    let coins = state
        .coin_items
        .iter()
        .filter(|c| c.lane == lane && !c.collected)
        .filter(|c| c.rect().bottom() > horizon && c.rect().top() < bike.bottom())
        .count();
    // A power-up is worth a few coins
    let power_ups = state
        .power_ups
        .iter()
        .filter(|p| p.lane == lane && !p.collected)
        .filter(|p| p.rect().bottom() > horizon && p.rect().top() < bike.bottom())
        .count();
    coins + power_ups * 3
}

fn best_lane(state: &GameState) -> u8 {
    let current = state.bike.lane;
    let mut best = current;
    let mut best_score = i32::MIN;

    for lane in 0..LANE_COUNT {
        let mut score = lane_reward(state, lane) as i32 * 10;
        if lane_blocked(state, lane) {
            score -= 1000;
        }
        // Prefer fewer moves, then the middle lane
        score -= (lane as i32 - current as i32).abs() * 2;
        if lane == 1 {
            score += 1;
        }
        if score > best_score {
            best_score = score;
            best = lane;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Coin, GamePhase, Traffic};
    use crate::sim::tick::tick;
    use crate::tuning::Tuning;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_dodges_car_ahead() {
        let mut state = playing(1);
        let mut car = Traffic::new(1, 0);
        car.pos.y = state.bike.y - 150.0;
        state.traffic.push(car);

        let mut pilot = Autopilot::new();
        let direction = pilot.steer(&state, 0.016);
        assert_ne!(direction, 0);
    }

    #[test]
    fn test_stays_when_clear() {
        let state = playing(1);
        let mut pilot = Autopilot::new();
        assert_eq!(pilot.steer(&state, 0.016), 0);
    }

    #[test]
    fn test_goes_for_coin_when_safe() {
        let mut state = playing(1);
        let mut coin = Coin::new(2);
        coin.pos.y = state.bike.y - 120.0;
        state.coin_items.push(coin);

        let mut pilot = Autopilot::new();
        assert_eq!(pilot.steer(&state, 0.016), 1);
        // Reaction cooldown holds the next decision
        assert_eq!(pilot.steer(&state, 0.016), 0);
    }

    #[test]
    fn test_does_not_steer_into_traffic() {
        let mut state = playing(1);
        let mut coin = Coin::new(2);
        coin.pos.y = state.bike.y - 120.0;
        state.coin_items.push(coin);
        let mut car = Traffic::new(2, 0);
        car.pos.y = state.bike.y - 100.0;
        state.traffic.push(car);

        let mut pilot = Autopilot::new();
        assert_eq!(pilot.steer(&state, 0.016), 0);
    }

    #[test]
    fn test_survives_a_while() {
        let mut state = playing(2024);
        let mut pilot = Autopilot::new();
        let dt = 1.0 / 60.0;
        for _ in 0..(60 * 60) {
            match pilot.steer(&state, dt) {
                0 => {}
                d => {
                    state.bike.shift_lane(d);
                }
            }
            tick(&mut state, dt);
            if state.phase != GamePhase::Playing {
                break;
            }
        }
        assert!(state.score >= 5, "autopilot scored only {}", state.score);
    }
}
