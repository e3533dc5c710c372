//! Everything persisted across sessions

use super::{KeyValueStore, keys, set_best_effort};
use crate::highscores::HighScore;
use crate::settings::Settings;
use crate::sim::Achievements;

/// Loaded once at startup, written back piecemeal as values change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub high_score: HighScore,
    pub total_coins: u32,
    pub achievements: Achievements,
    pub settings: Settings,
}

impl Profile {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self {
            high_score: HighScore::load(store),
            total_coins: load_total_coins(store),
            achievements: load_achievements(store),
            settings: Settings::load(store),
        }
    }
}

fn load_total_coins<S: KeyValueStore + ?Sized>(store: &S) -> u32 {
    let Some(raw) = store.get(keys::COINS) else {
        return 0;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        log::debug!("ignoring stored coin total {raw:?}");
        0
    })
}

/// Stored flags merged over the defaults
fn load_achievements<S: KeyValueStore + ?Sized>(store: &S) -> Achievements {
    let Some(raw) = store.get(keys::ACHIEVEMENTS) else {
        return Achievements::default();
    };
    match serde_json::from_str::<Achievements>(&raw) {
        Ok(stored) => {
            let mut flags = Achievements::default();
            flags.merge(&stored);
            flags
        }
        Err(e) => {
            log::debug!("ignoring stored achievements: {e}");
            Achievements::default()
        }
    }
}

pub fn save_total_coins<S: KeyValueStore + ?Sized>(store: &mut S, total: u32) {
    set_best_effort(store, keys::COINS, &total.to_string());
}

pub fn save_achievements<S: KeyValueStore + ?Sized>(store: &mut S, flags: &Achievements) {
    match serde_json::to_string(flags) {
        Ok(json) => {
            set_best_effort(store, keys::ACHIEVEMENTS, &json);
        }
        Err(e) => log::warn!("could not encode achievements: {e}"),
    }
}
