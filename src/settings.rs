//! Player preferences
//!
//! Persisted as individual `"true"`/`"false"` strings. Missing or malformed
//! values keep their defaults.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, keys, set_best_effort};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Sound effects
    pub sound_enabled: bool,
    /// Background music
    pub music_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_enabled: true,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn load_flag<S: KeyValueStore + ?Sized>(store: &S, key: &str, default: bool) -> bool {
    let Some(raw) = store.get(key) else {
        return default;
    };
    parse_flag(&raw).unwrap_or_else(|| {
        log::debug!("ignoring stored {key} value {raw:?}");
        default
    })
}

impl Settings {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let defaults = Self::default();
        Self {
            sound_enabled: load_flag(store, keys::SOUND, defaults.sound_enabled),
            music_enabled: load_flag(store, keys::MUSIC, defaults.music_enabled),
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        set_best_effort(store, keys::SOUND, &self.sound_enabled.to_string());
        set_best_effort(store, keys::MUSIC, &self.music_enabled.to_string());
        log::info!(
            "settings saved (sound {}, music {})",
            self.sound_enabled,
            self.music_enabled
        );
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        self.music_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_when_missing() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_roundtrip_through_store() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        assert!(!settings.toggle_music());
        settings.save(&mut store);
        assert_eq!(store.get(keys::MUSIC).as_deref(), Some("false"));
        assert_eq!(store.get(keys::SOUND).as_deref(), Some("true"));
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_malformed_flag_keeps_default() {
        let mut store = MemoryStore::new();
        store.set(keys::SOUND, "yes please").unwrap();
        store.set(keys::MUSIC, "false").unwrap();
        let settings = Settings::load(&store);
        assert!(settings.sound_enabled);
        assert!(!settings.music_enabled);
    }
}
