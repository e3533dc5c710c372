//! Power-ups, combo scoring and particle bursts

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{ActivePowerUp, BurstKind, GameEvent, GameState, Particle, PowerUpKind};
use crate::consts::*;

// === Power-ups ===

/// Start a power-up effect, replacing whatever was active
///
/// The replaced effect is not reverted: picking up slow-mo while slow-mo is
/// running halves the speed again, and only one doubling happens on expiry.
pub fn activate_power_up(state: &mut GameState, kind: PowerUpKind) {
    let duration_ms = kind.duration_ms();
    state.power_up = Some(ActivePowerUp {
        kind,
        remaining_ms: duration_ms,
        duration_ms,
    });

    if kind == PowerUpKind::SlowMo {
        state.speed *= 0.5;
    }

    log::info!("power-up activated: {}", kind.as_str());
    state.events.push(GameEvent::PowerUpActivated(kind));
}

/// Count down the active effect and revert it on expiry
pub fn update_power_up_timer(state: &mut GameState, dt: f32) {
    let Some(active) = state.power_up.as_mut() else {
        return;
    };
    active.remaining_ms -= dt * 1000.0;
    if active.remaining_ms > 0.0 {
        return;
    }

    let kind = active.kind;
    if kind == PowerUpKind::SlowMo {
        state.speed = (state.speed * 2.0).min(state.tuning.max_speed);
    }
    state.power_up = None;
    state.events.push(GameEvent::PowerUpExpired(kind));
}

/// Spend the shield on a collision. Returns false if no shield was up.
pub fn consume_shield(state: &mut GameState) -> bool {
    if !state.shield_active() {
        return false;
    }
    state.power_up = None;
    state.events.push(GameEvent::ShieldAbsorbed);
    true
}

/// While a magnet is active, drag nearby coins toward the bike
pub fn apply_magnet(state: &mut GameState, dt: f32) {
    if state.active_kind() != Some(PowerUpKind::Magnet) {
        return;
    }

    let bike_center = state.bike.center();
    for coin in state.coin_items.iter_mut().filter(|c| !c.collected) {
        let to_bike = bike_center - coin.rect().center();
        let dist = to_bike.length();
        if dist < MAGNET_RANGE && dist > 1.0 {
            coin.pos += to_bike / dist * MAGNET_PULL * dt;
        }
    }
}

// === Combo ===

/// Extend the combo and restart its decay timer
pub fn increment_combo(state: &mut GameState) {
    state.combo.count += 1;
    state.combo.timer_ms = state.tuning.combo_timeout_ms;
}

/// Decay the combo; drops to zero once the timer runs out
pub fn update_combo_timer(state: &mut GameState, dt: f32) {
    if state.combo.count == 0 {
        return;
    }
    state.combo.timer_ms -= dt * 1000.0;
    if state.combo.timer_ms <= 0.0 {
        state.combo.count = 0;
        state.combo.timer_ms = 0.0;
        state.events.push(GameEvent::ComboReset);
    }
}

/// Collect the coin at `index`
///
/// Value is the combo before this pickup (minimum 1), so the first coin of a
/// fresh combo is worth 1.
pub fn collect_coin(state: &mut GameState, index: usize) {
    let Some(coin) = state.coin_items.get_mut(index) else {
        return;
    };
    if coin.collected {
        return;
    }
    coin.collected = true;
    let center = coin.rect().center();

    let value = state.combo.count.max(1);
    state.coins += value;
    state.total_coins = state.total_coins.saturating_add(value);
    increment_combo(state);

    spawn_burst(state, center, BurstKind::Coin);
    state.events.push(GameEvent::CoinCollected {
        value,
        combo: state.combo.count,
        total_coins: state.total_coins,
    });
    state.check_achievements();
}

// === Particles ===

/// Radial burst of particles at `origin`
pub fn spawn_burst(state: &mut GameState, origin: Vec2, kind: BurstKind) {
    let count = kind.particle_count();
    let palette = kind.palette();
    let life = state.tuning.particle_lifetime_ms;
    let (lift, base_size, size_jitter) = match kind {
        BurstKind::Collision => (2.0, 4.0, 3.0),
        _ => (1.0, 3.0, 2.0),
    };

    state.particles.reserve(count);
    for i in 0..count {
        let angle = TAU / count as f32 * i as f32 + state.rng.random::<f32>() * 0.3;
        let speed = 2.0 + state.rng.random::<f32>() * 3.0;
        let size = base_size + state.rng.random::<f32>() * size_jitter;
        let color = palette[state.rng.random_range(0..palette.len())];
        state.particles.push(Particle {
            pos: origin,
            vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - lift),
            life,
            max_life: life,
            size,
            color,
        });
    }
}

/// Integrate particles and drop the expired ones
///
/// Velocities are per 60 fps frame, scaled by `dt` like the scroll speed.
pub fn update_particles(state: &mut GameState, dt: f32) {
    let frames = dt * FRAMES_PER_SECOND;
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * frames;
        particle.vel.y += PARTICLE_GRAVITY * frames;
        particle.life -= dt * 1000.0;
    }
    state.particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Coin;
    use crate::tuning::Tuning;

    fn playing_state() -> GameState {
        let mut state = GameState::new(42, Tuning::default());
        state.phase = crate::sim::GamePhase::Playing;
        state
    }

    #[test]
    fn test_slowmo_halves_then_restores() {
        let mut state = playing_state();
        state.speed = 8.0;
        activate_power_up(&mut state, PowerUpKind::SlowMo);
        assert_eq!(state.speed, 4.0);

        update_power_up_timer(&mut state, 4.9);
        assert_eq!(state.active_kind(), Some(PowerUpKind::SlowMo));
        update_power_up_timer(&mut state, 0.2);
        assert_eq!(state.active_kind(), None);
        assert_eq!(state.speed, 8.0);
        assert!(state.events.contains(&GameEvent::PowerUpExpired(PowerUpKind::SlowMo)));
    }

    #[test]
    fn test_slowmo_restore_is_capped() {
        let mut state = playing_state();
        state.speed = 15.0;
        activate_power_up(&mut state, PowerUpKind::SlowMo);
        state.speed = 9.0; // levelled up while slowed
        update_power_up_timer(&mut state, 5.0);
        assert_eq!(state.speed, MAX_SPEED);
    }

    #[test]
    fn test_overwrite_does_not_revert() {
        let mut state = playing_state();
        state.speed = 8.0;
        activate_power_up(&mut state, PowerUpKind::SlowMo);
        activate_power_up(&mut state, PowerUpKind::SlowMo);
        assert_eq!(state.speed, 2.0);
        update_power_up_timer(&mut state, 5.0);
        assert_eq!(state.speed, 4.0);

        // Replacing slow-mo by a shield leaves the speed halved for good
        state.speed = 8.0;
        activate_power_up(&mut state, PowerUpKind::SlowMo);
        activate_power_up(&mut state, PowerUpKind::Shield);
        let active = state.power_up.unwrap();
        assert_eq!(active.kind, PowerUpKind::Shield);
        assert_eq!(active.remaining_ms, SHIELD_DURATION_MS);
        update_power_up_timer(&mut state, 8.0);
        assert_eq!(state.speed, 4.0);
    }

    #[test]
    fn test_shield_is_consumed_once() {
        let mut state = playing_state();
        activate_power_up(&mut state, PowerUpKind::Shield);
        assert!(consume_shield(&mut state));
        assert!(!consume_shield(&mut state));
        assert_eq!(state.power_up, None);
    }

    #[test]
    fn test_magnet_pulls_coin_by_strength_times_dt() {
        let mut state = playing_state();
        activate_power_up(&mut state, PowerUpKind::Magnet);
        let bike_center = state.bike.center();

        // Coin whose center sits 50 px straight above the bike center
        let mut coin = Coin::new(1);
        coin.pos = bike_center - Vec2::new(COIN_SIZE / 2.0, 50.0 + COIN_SIZE / 2.0);
        state.coin_items.push(coin);

        let dt = 0.016;
        apply_magnet(&mut state, dt);
        let dist = (bike_center - state.coin_items[0].rect().center()).length();
        assert!((dist - (50.0 - MAGNET_PULL * dt)).abs() < 1e-3);
    }

    #[test]
    fn test_magnet_ignores_far_and_collected_coins() {
        let mut state = playing_state();
        activate_power_up(&mut state, PowerUpKind::Magnet);
        let bike_center = state.bike.center();

        let mut far = Coin::new(0);
        far.pos = bike_center - Vec2::new(0.0, 200.0);
        let mut taken = Coin::new(1);
        taken.pos = bike_center - Vec2::new(0.0, 40.0);
        taken.collected = true;
        state.coin_items = vec![far.clone(), taken.clone()];

        apply_magnet(&mut state, 0.05);
        assert_eq!(state.coin_items[0].pos, far.pos);
        assert_eq!(state.coin_items[1].pos, taken.pos);
    }

    #[test]
    fn test_magnet_inactive_without_power_up() {
        let mut state = playing_state();
        let mut coin = Coin::new(1);
        coin.pos = state.bike.center() - Vec2::new(0.0, 40.0);
        let before = coin.pos;
        state.coin_items.push(coin);
        apply_magnet(&mut state, 0.05);
        assert_eq!(state.coin_items[0].pos, before);
    }

    #[test]
    fn test_coin_value_uses_combo_before_increment() {
        let mut state = playing_state();
        state.combo.count = 3;
        state.coin_items.push(Coin::new(1));
        collect_coin(&mut state, 0);

        assert_eq!(state.coins, 3);
        assert_eq!(state.total_coins, 3);
        assert_eq!(state.combo.count, 4);
        assert_eq!(state.combo.timer_ms, COMBO_TIMEOUT_MS);
        assert!(state.events.contains(&GameEvent::CoinCollected {
            value: 3,
            combo: 4,
            total_coins: 3
        }));
    }

    #[test]
    fn test_first_coin_of_combo_is_worth_one() {
        let mut state = playing_state();
        state.coin_items.push(Coin::new(0));
        state.coin_items.push(Coin::new(1));
        collect_coin(&mut state, 0);
        assert_eq!(state.coins, 1);
        assert_eq!(state.combo.count, 1);
        collect_coin(&mut state, 1);
        assert_eq!(state.coins, 2);
        assert_eq!(state.combo.count, 2);
        // Already collected: no double count
        collect_coin(&mut state, 1);
        assert_eq!(state.coins, 2);
    }

    #[test]
    fn test_combo_decays_only_after_timeout() {
        let mut state = playing_state();
        increment_combo(&mut state);
        increment_combo(&mut state);
        update_combo_timer(&mut state, 2.9);
        assert_eq!(state.combo.count, 2);

        // A new collection refreshes the timer
        increment_combo(&mut state);
        update_combo_timer(&mut state, 2.9);
        assert_eq!(state.combo.count, 3);

        update_combo_timer(&mut state, 0.2);
        assert_eq!(state.combo.count, 0);
        assert!(state.events.contains(&GameEvent::ComboReset));
    }

    #[test]
    fn test_burst_sizes() {
        let mut state = playing_state();
        spawn_burst(&mut state, Vec2::new(100.0, 100.0), BurstKind::Coin);
        assert_eq!(state.particles.len(), BURST_PARTICLES);
        spawn_burst(&mut state, Vec2::new(100.0, 100.0), BurstKind::Collision);
        assert_eq!(state.particles.len(), BURST_PARTICLES + COLLISION_PARTICLES);

        let palette = BurstKind::Collision.palette();
        assert!(state.particles[BURST_PARTICLES..]
            .iter()
            .all(|p| palette.contains(&p.color) && p.size >= 4.0 && p.size <= 7.0));
    }

    #[test]
    fn test_particles_fall_and_expire() {
        let mut state = playing_state();
        spawn_burst(&mut state, Vec2::ZERO, BurstKind::PowerUp);
        let vy_before: Vec<f32> = state.particles.iter().map(|p| p.vel.y).collect();

        update_particles(&mut state, 1.0 / 60.0);
        for (p, before) in state.particles.iter().zip(vy_before) {
            assert!((p.vel.y - (before + PARTICLE_GRAVITY)).abs() < 1e-4);
            assert!(p.alpha() < 1.0);
        }

        // 1200 ms of life: gone after 24 frames of 50 ms
        for _ in 0..24 {
            update_particles(&mut state, 0.05);
        }
        assert!(state.particles.is_empty());
    }
}
