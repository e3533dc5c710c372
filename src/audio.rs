//! Music and sound effect control
//!
//! Gates a `MediaPlayer` behind the player's sound/music preferences and
//! maps simulation events to one-shot effects.

use crate::platform::MediaPlayer;
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Coin picked up
    Coin,
    /// Power-up token picked up
    PowerUp,
    /// Shield took a hit
    ShieldHit,
    /// Speed went up
    LevelUp,
    /// Achievement unlocked
    Achievement,
    /// Run ended
    Crash,
}

impl SoundEffect {
    /// Effect for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::CoinCollected { .. } => Some(SoundEffect::Coin),
            GameEvent::PowerUpActivated(_) => Some(SoundEffect::PowerUp),
            GameEvent::ShieldAbsorbed => Some(SoundEffect::ShieldHit),
            GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
            GameEvent::AchievementUnlocked(_) => Some(SoundEffect::Achievement),
            GameEvent::GameOver { .. } => Some(SoundEffect::Crash),
            GameEvent::Scored { .. } | GameEvent::PowerUpExpired(_) | GameEvent::ComboReset => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    player: Box<dyn MediaPlayer>,
    sound_enabled: bool,
    music_enabled: bool,
    music_playing: bool,
}

impl AudioManager {
    pub fn new(player: Box<dyn MediaPlayer>, settings: &Settings) -> Self {
        Self {
            player,
            sound_enabled: settings.sound_enabled,
            music_enabled: settings.music_enabled,
            music_playing: false,
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sound_enabled = settings.sound_enabled;
        self.music_enabled = settings.music_enabled;
        if !self.music_enabled {
            self.pause_music();
        }
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    /// Start (or resume) the music if enabled
    pub fn play_music(&mut self) {
        if !self.music_enabled || self.music_playing {
            return;
        }
        self.player.play_music();
        self.music_playing = true;
    }

    pub fn pause_music(&mut self) {
        if !self.music_playing {
            return;
        }
        self.player.pause_music();
        self.music_playing = false;
    }

    /// Play the effect for an event, if sound is on
    pub fn on_event(&mut self, event: &GameEvent) {
        if !self.sound_enabled {
            return;
        }
        if let Some(effect) = SoundEffect::for_event(event) {
            self.player.play_effect(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MediaLog;
    use crate::sim::PowerUpKind;

    #[test]
    fn test_music_respects_setting() {
        let log = MediaLog::new();
        let settings = Settings {
            sound_enabled: true,
            music_enabled: false,
        };
        let mut audio = AudioManager::new(Box::new(log.clone()), &settings);
        audio.play_music();
        assert_eq!(log.state().play_calls, 0);

        audio.apply_settings(&Settings::default());
        audio.play_music();
        audio.play_music();
        assert_eq!(log.state().play_calls, 1);
        assert!(audio.is_music_playing());

        audio.apply_settings(&settings);
        assert!(!log.state().music_playing);
    }

    #[test]
    fn test_effects_follow_events() {
        let log = MediaLog::new();
        let mut audio = AudioManager::new(Box::new(log.clone()), &Settings::default());
        audio.on_event(&GameEvent::Scored { score: 1 });
        audio.on_event(&GameEvent::PowerUpActivated(PowerUpKind::Shield));
        audio.on_event(&GameEvent::GameOver {
            score: 1,
            new_high_score: false,
        });
        assert_eq!(log.state().effects, vec![SoundEffect::PowerUp, SoundEffect::Crash]);

        audio.apply_settings(&Settings {
            sound_enabled: false,
            music_enabled: true,
        });
        audio.on_event(&GameEvent::ShieldAbsorbed);
        assert_eq!(log.state().effects.len(), 2);
    }
}
