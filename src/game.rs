//! Game session
//!
//! Owns the simulation state and every collaborator around it: the frame
//! clock, storage, assets, audio and notifications. All phase transitions
//! go through here.

use crate::assets::AssetLoader;
use crate::audio::AudioManager;
use crate::highscores::HighScore;
use crate::input::{InputEvent, TiltFilter};
use crate::persistence::{KeyValueStore, Profile, save_achievements, save_total_coins};
use crate::platform::{MediaLog, MediaPlayer, Notifier, Toast, ToastLog};
use crate::settings::Settings;
use crate::sim::{
    Autopilot, FrameClock, GameEvent, GamePhase, GameState, RenderSnapshot, Violation, audit,
    end_run, tick,
};
use crate::tuning::Tuning;

/// Spreads consecutive run seeds apart
const SEED_STRIDE: u64 = 0x9e37_79b9_7f4a_7c15;

pub struct Game<S: KeyValueStore> {
    state: GameState,
    clock: FrameClock,
    store: S,
    settings: Settings,
    assets: AssetLoader,
    audio: AudioManager,
    notifier: Box<dyn Notifier>,
    tilt: TiltFilter,
    autopilot: Option<Autopilot>,
    base_seed: u64,
    runs: u64,
}

impl<S: KeyValueStore> Game<S> {
    /// New session in the menu, with the persisted profile applied
    pub fn new(store: S, tuning: Tuning, seed: u64) -> Self {
        let profile = Profile::load(&store);
        let mut state = GameState::new(seed, tuning);
        state.high_score = profile.high_score.best;
        state.total_coins = profile.total_coins;
        state.achievements = profile.achievements;

        log::info!(
            "profile loaded: best {}, {} coins, {} achievements",
            state.high_score,
            state.total_coins,
            state.achievements.unlocked_count()
        );

        Self {
            tilt: TiltFilter::new(&state.tuning),
            state,
            clock: FrameClock::new(),
            store,
            audio: AudioManager::new(Box::new(MediaLog::new()), &profile.settings),
            settings: profile.settings,
            assets: AssetLoader::new(),
            notifier: Box::new(ToastLog::new()),
            autopilot: None,
            base_seed: seed,
            runs: 0,
        }
    }

    pub fn with_media(mut self, player: Box<dyn MediaPlayer>) -> Self {
        self.audio = AudioManager::new(player, &self.settings);
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_assets(mut self, assets: AssetLoader) -> Self {
        self.assets = assets;
        self
    }

    /// Let the demo driver steer
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled.then(Autopilot::new);
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_playing(&self) -> bool {
        self.state.phase == GamePhase::Playing
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for hosts staging scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn assets(&self) -> &AssetLoader {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetLoader {
        &mut self.assets
    }

    pub fn high_score(&self) -> u32 {
        self.state.high_score
    }

    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot::capture(&self.state)
    }

    /// Advance the asset grace timer; true once assets count as loaded
    pub fn poll_assets(&mut self, now_ms: f64) -> bool {
        self.assets.poll(now_ms)
    }

    // === Transitions ===

    /// Menu or game over to a fresh run. Ignored until assets are loaded.
    pub fn start(&mut self) -> bool {
        if !matches!(self.state.phase, GamePhase::Menu | GamePhase::GameOver) {
            return false;
        }
        if !self.assets.is_loaded() {
            log::debug!("start ignored: assets still loading");
            return false;
        }

        let seed = self.base_seed.wrapping_add(self.runs.wrapping_mul(SEED_STRIDE));
        self.runs += 1;
        self.state.reset_session(seed);
        self.state.car_variants = self.assets.car_sprites().len();
        self.clock.reset();
        if let Some(pilot) = self.autopilot.as_mut() {
            *pilot = Autopilot::new();
        }
        self.state.phase = GamePhase::Playing;
        self.audio.play_music();
        log::info!("run {} started (seed {seed:#x})", self.runs);
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state.phase != GamePhase::Playing {
            return false;
        }
        self.state.phase = GamePhase::Paused;
        self.audio.pause_music();
        log::info!("paused at score {}", self.state.score);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state.phase != GamePhase::Paused {
            return false;
        }
        self.state.phase = GamePhase::Playing;
        // The paused stretch must not show up as one huge delta
        self.clock.reset();
        self.audio.play_music();
        log::info!("resumed");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.state.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => false,
        }
    }

    /// The host page was hidden
    pub fn on_visibility_hidden(&mut self) {
        self.pause();
    }

    pub fn back_to_menu(&mut self) -> bool {
        if self.state.phase != GamePhase::GameOver {
            return false;
        }
        self.state.phase = GamePhase::Menu;
        true
    }

    pub fn restart(&mut self) -> bool {
        if self.state.phase != GamePhase::GameOver {
            return false;
        }
        self.start()
    }

    // === Frame ===

    /// Run one frame at host timestamp `now_ms`
    ///
    /// Returns whether another frame should be scheduled.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if !self.is_playing() {
            return false;
        }
        let dt = self.clock.delta(now_ms);

        if let Some(pilot) = self.autopilot.as_mut() {
            let direction = pilot.steer(&self.state, dt);
            if direction != 0 {
                self.state.bike.shift_lane(direction);
            }
        }

        tick(&mut self.state, dt);
        self.process_events();
        self.is_playing()
    }

    /// End a run that is still playing, with the usual game-over side effects
    pub fn end_run(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        end_run(&mut self.state);
        self.process_events();
        true
    }

    /// Check the session invariants; a violation ends the run
    pub fn audit(&mut self) -> Result<(), Violation> {
        let result = audit(&self.state);
        if let Err(violation) = result {
            log::warn!("audit failed: {violation}");
            end_run(&mut self.state);
            self.process_events();
        }
        result
    }

    fn process_events(&mut self) {
        for event in self.state.drain_events() {
            self.audio.on_event(&event);
            match event {
                GameEvent::CoinCollected { total_coins, .. } => {
                    save_total_coins(&mut self.store, total_coins);
                }
                GameEvent::AchievementUnlocked(achievement) => {
                    save_achievements(&mut self.store, &self.state.achievements);
                    self.notifier.notify(Toast::achievement(achievement));
                }
                GameEvent::GameOver { new_high_score, .. } => {
                    if new_high_score {
                        HighScore::new(self.state.high_score).save(&mut self.store);
                    }
                    self.audio.pause_music();
                }
                GameEvent::Scored { .. }
                | GameEvent::LevelUp { .. }
                | GameEvent::PowerUpActivated(_)
                | GameEvent::PowerUpExpired(_)
                | GameEvent::ComboReset
                | GameEvent::ShieldAbsorbed => {}
            }
        }
    }

    // === Input ===

    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::TogglePause => self.toggle_pause(),
            InputEvent::MoveLeft | InputEvent::MoveRight => {
                if !self.is_playing() {
                    return false;
                }
                event
                    .direction()
                    .is_some_and(|d| self.state.bike.shift_lane(d))
            }
        }
    }

    /// DOM `KeyboardEvent.key`
    pub fn handle_key(&mut self, key: &str) -> bool {
        InputEvent::from_key(key).is_some_and(|event| self.handle_input(event))
    }

    /// Touch at canvas-relative `x`
    pub fn handle_touch(&mut self, x: f32) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.handle_input(InputEvent::from_touch(x, crate::consts::CANVAS_WIDTH))
    }

    /// Device orientation sample (gamma, degrees)
    pub fn handle_tilt(&mut self, gamma_deg: f32, now_ms: f64) -> bool {
        if !self.is_playing() {
            return false;
        }
        match self.tilt.sample(gamma_deg, now_ms, self.state.bike.lane) {
            Some(event) => self.handle_input(event),
            None => false,
        }
    }

    // === Settings ===

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.settings.save(&mut self.store);
        self.audio.apply_settings(&self.settings);
        if self.is_playing() {
            self.audio.play_music();
        }
    }

    pub fn toggle_sound(&mut self) -> bool {
        let mut settings = self.settings;
        let enabled = settings.toggle_sound();
        self.set_settings(settings);
        enabled
    }

    pub fn toggle_music(&mut self) -> bool {
        let mut settings = self.settings;
        let enabled = settings.toggle_music();
        self.set_settings(settings);
        enabled
    }
}
