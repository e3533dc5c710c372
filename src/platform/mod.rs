//! Platform abstraction layer
//!
//! The host implements these seams: drawing, toast notifications and media
//! playback. The simulation never touches them directly; `Game` does.

use std::cell::RefCell;
use std::rc::Rc;

use crate::audio::SoundEffect;
use crate::consts::TOAST_DURATION_MS;
use crate::sim::{Achievement, RenderSnapshot};

/// Draws one frame
pub trait RenderSink {
    fn present(&mut self, frame: &RenderSnapshot<'_>);
}

/// A transient on-screen notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub duration_ms: u32,
}

impl Toast {
    pub fn achievement(achievement: Achievement) -> Self {
        Self {
            title: achievement.title().to_string(),
            description: achievement.description().to_string(),
            duration_ms: TOAST_DURATION_MS,
        }
    }
}

/// Shows toasts
pub trait Notifier {
    fn notify(&mut self, toast: Toast);
}

/// Background music and one-shot effects
pub trait MediaPlayer {
    fn play_music(&mut self);
    fn pause_music(&mut self);
    fn play_effect(&mut self, _effect: SoundEffect) {}
}

/// Render sink that drops frames, counting them
#[derive(Debug, Default)]
pub struct NullSink {
    pub frames: u64,
}

impl RenderSink for NullSink {
    fn present(&mut self, _frame: &RenderSnapshot<'_>) {
        self.frames += 1;
    }
}

/// Notifier that logs and keeps every toast. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct ToastLog {
    toasts: Rc<RefCell<Vec<Toast>>>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.borrow().clone()
    }
}

impl Notifier for ToastLog {
    fn notify(&mut self, toast: Toast) {
        log::info!("{}: {}", toast.title, toast.description);
        self.toasts.borrow_mut().push(toast);
    }
}

/// What a `MediaLog` has been asked to do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaState {
    pub music_playing: bool,
    pub play_calls: u32,
    pub pause_calls: u32,
    pub effects: Vec<SoundEffect>,
}

/// Media player with no output that records calls. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct MediaLog {
    state: Rc<RefCell<MediaState>>,
}

impl MediaLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MediaState {
        self.state.borrow().clone()
    }
}

impl MediaPlayer for MediaLog {
    fn play_music(&mut self) {
        let mut state = self.state.borrow_mut();
        state.music_playing = true;
        state.play_calls += 1;
    }

    fn pause_music(&mut self) {
        let mut state = self.state.borrow_mut();
        state.music_playing = false;
        state.pause_calls += 1;
    }

    fn play_effect(&mut self, effect: SoundEffect) {
        self.state.borrow_mut().effects.push(effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_achievement_toast() {
        let toast = Toast::achievement(Achievement::Combo5);
        assert_eq!(toast.title, "Combo Master");
        assert_eq!(toast.description, "Reached 5x combo");
        assert_eq!(toast.duration_ms, 3000);

        let log = ToastLog::new();
        let mut sink = log.clone();
        sink.notify(toast.clone());
        assert_eq!(log.toasts(), vec![toast]);
    }

    #[test]
    fn test_media_log_records() {
        let log = MediaLog::new();
        let mut player = log.clone();
        player.play_music();
        player.pause_music();
        player.play_effect(SoundEffect::Coin);
        let state = log.state();
        assert!(!state.music_playing);
        assert_eq!((state.play_calls, state.pause_calls), (1, 1));
        assert_eq!(state.effects, vec![SoundEffect::Coin]);
    }
}
