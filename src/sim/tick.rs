//! Per-frame simulation tick
//!
//! Advances the road, the bike and every entity by one variable timestep.

use super::collision::check_collision;
use super::effects::{
    activate_power_up, apply_magnet, collect_coin, consume_shield, spawn_burst, update_combo_timer,
    update_particles, update_power_up_timer,
};
use super::spawn::run_spawner;
use super::state::{BurstKind, GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::highscores::HighScore;

/// Advance the game state by `dt` seconds
///
/// Does nothing unless the state is `Playing`. Order within a tick:
/// timers, spawning, road scroll, bike smoothing, magnet, coins, power-ups,
/// then traffic (scoring, removal, collision).
pub fn tick(state: &mut GameState, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }

    update_power_up_timer(state, dt);
    update_combo_timer(state, dt);
    update_particles(state, dt);

    run_spawner(state, dt);

    // Shake counts down once per simulated frame
    state.shake = state.shake.saturating_sub(1);

    // Speed is in px per 60 fps frame
    let px = state.speed * dt * FRAMES_PER_SECOND;
    state.road_offset += px;
    if state.road_offset > ROAD_OFFSET_WRAP {
        state.road_offset = 0.0;
    }

    state.bike.smooth_toward_target(dt, state.tuning.move_smoothing);
    apply_magnet(state, dt);

    update_coins(state, px);
    update_power_ups(state, px);
    update_traffic(state, px);

    state.frame += 1;
}

fn update_coins(state: &mut GameState, px: f32) {
    let exit_y = CANVAS_HEIGHT + PICKUP_EXIT_MARGIN;
    for i in (0..state.coin_items.len()).rev() {
        state.coin_items[i].pos.y += px;

        let coin = &state.coin_items[i];
        if !coin.collected && check_collision(&state.bike.rect(), &coin.rect()) {
            collect_coin(state, i);
        }

        if state.coin_items[i].pos.y > exit_y {
            state.coin_items.remove(i);
        }
    }
}

fn update_power_ups(state: &mut GameState, px: f32) {
    let exit_y = CANVAS_HEIGHT + PICKUP_EXIT_MARGIN;
    for i in (0..state.power_ups.len()).rev() {
        state.power_ups[i].pos.y += px;

        let token = &state.power_ups[i];
        if !token.collected && check_collision(&state.bike.rect(), &token.rect()) {
            let kind = token.kind;
            let center = token.rect().center();
            state.power_ups[i].collected = true;
            activate_power_up(state, kind);
            spawn_burst(state, center, BurstKind::PowerUp);
        }

        if state.power_ups[i].pos.y > exit_y {
            state.power_ups.remove(i);
        }
    }
}

fn update_traffic(state: &mut GameState, px: f32) {
    let exit_y = CANVAS_HEIGHT + CAR_EXIT_MARGIN;
    let bike_rect = state.bike.rect();

    for i in (0..state.traffic.len()).rev() {
        state.traffic[i].pos.y += px;

        // Scored once the car is fully below the bike
        if !state.traffic[i].passed && state.traffic[i].pos.y > bike_rect.bottom() {
            state.traffic[i].passed = true;
            on_car_passed(state);
        }

        if state.traffic[i].pos.y > exit_y {
            state.traffic.remove(i);
            continue;
        }

        let car_rect = state.traffic[i].rect();
        if check_collision(&bike_rect, &car_rect) {
            if consume_shield(state) {
                state.traffic[i].pos.y = DEFLECT_Y;
                let origin = glam::Vec2::new(car_rect.center().x, bike_rect.top());
                spawn_burst(state, origin, BurstKind::PowerUp);
                log::info!("shield absorbed a collision");
            } else {
                end_run(state);
                break;
            }
        }
    }
}

fn on_car_passed(state: &mut GameState) {
    state.score += 1;
    state.events.push(GameEvent::Scored { score: state.score });
    state.check_achievements();

    if state.score % state.tuning.score_for_speed_up == 0 {
        level_up(state);
    }
}

/// Raise speed and level, unless already at max speed
pub fn level_up(state: &mut GameState) {
    if state.speed >= state.tuning.max_speed {
        return;
    }
    state.speed += state.tuning.speed_increment;
    state.level += 1;
    log::info!("level {} (speed {:.2})", state.level, state.speed);
    state.events.push(GameEvent::LevelUp {
        level: state.level,
        speed: state.speed,
    });
}

/// End the run: shake, crash burst, high score bookkeeping
///
/// The high score only moves for scores inside the believable envelope.
pub fn end_run(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.phase = GamePhase::GameOver;
    state.shake = CRASH_SHAKE_FRAMES;

    let center = state.bike.center();
    spawn_burst(state, center, BurstKind::Collision);

    let mut best = HighScore::new(state.high_score);
    let new_high_score = best.submit(state.score);
    state.high_score = best.best;

    log::info!(
        "game over: score {} (best {}), level {}, coins {}",
        state.score,
        state.high_score,
        state.level,
        state.coins
    );
    state.events.push(GameEvent::GameOver {
        score: state.score,
        new_high_score,
    });
}
