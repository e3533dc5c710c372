//! Game state and core simulation types
//!
//! Everything a session mutates lives here, owned by a single `GameState`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::achievements::{Achievement, Achievements};
use super::collision::Rect;
use super::spawn::SpawnScheduler;
use crate::consts::*;
use crate::lane_x;
use crate::tuning::Tuning;

/// Current phase of the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen mid-run, resumable
    Paused,
    /// Run ended
    GameOver,
}

/// The player's bike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bike {
    /// Lane the bike is heading for (0..=2)
    pub lane: u8,
    /// Current left edge
    pub x: f32,
    /// Left edge of the target lane
    pub target_x: f32,
    /// Top edge, fixed for the session
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Bike {
    fn default() -> Self {
        let x = lane_x(1, BIKE_WIDTH);
        Self {
            lane: 1,
            x,
            target_x: x,
            y: CANVAS_HEIGHT - BIKE_HEIGHT - BIKE_BOTTOM_MARGIN,
            width: BIKE_WIDTH,
            height: BIKE_HEIGHT,
        }
    }
}

impl Bike {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Retarget one lane left (-1) or right (+1). Returns false at the edge.
    pub fn shift_lane(&mut self, direction: i8) -> bool {
        let next = self.lane as i16 + direction.signum() as i16;
        if !(0..LANE_COUNT as i16).contains(&next) || direction == 0 {
            return false;
        }
        self.lane = next as u8;
        self.target_x = lane_x(self.lane, self.width);
        true
    }

    /// Exponential smoothing toward the target lane
    ///
    /// `x += (target - x) * (1 - e^(-k*dt))`: the blend factor stays in
    /// [0, 1) so the bike never overshoots, whatever the frame rate.
    pub fn smooth_toward_target(&mut self, dt: f32, smoothing: f32) {
        let blend = 1.0 - (-smoothing * dt).exp();
        self.x += (self.target_x - self.x) * blend;
    }
}

/// An oncoming car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traffic {
    pub lane: u8,
    pub pos: Vec2,
    pub size: Vec2,
    /// Index into the loaded car sprites
    pub sprite: usize,
    /// Set once the car has scrolled below the bike
    pub passed: bool,
}

impl Traffic {
    pub fn new(lane: u8, sprite: usize) -> Self {
        Self {
            lane,
            pos: Vec2::new(lane_x(lane, CAR_WIDTH), CAR_SPAWN_Y),
            size: Vec2::new(CAR_WIDTH, CAR_HEIGHT),
            sprite,
            passed: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A collectible coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub lane: u8,
    pub pos: Vec2,
    pub size: Vec2,
    pub collected: bool,
}

impl Coin {
    pub fn new(lane: u8) -> Self {
        Self {
            lane,
            pos: Vec2::new(lane_x(lane, COIN_SIZE), COIN_SPAWN_Y),
            size: Vec2::splat(COIN_SIZE),
            collected: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Absorbs one collision
    Shield,
    /// Halves scroll speed for its duration
    SlowMo,
    /// Pulls nearby coins toward the bike
    Magnet,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Shield, PowerUpKind::SlowMo, PowerUpKind::Magnet];

    /// Effect duration in milliseconds
    pub fn duration_ms(&self) -> f32 {
        match self {
            PowerUpKind::Shield => SHIELD_DURATION_MS,
            PowerUpKind::SlowMo => SLOWMO_DURATION_MS,
            PowerUpKind::Magnet => MAGNET_DURATION_MS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "shield",
            PowerUpKind::SlowMo => "slowmo",
            PowerUpKind::Magnet => "magnet",
        }
    }
}

/// A power-up token on the road
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpToken {
    pub kind: PowerUpKind,
    pub lane: u8,
    pub pos: Vec2,
    pub size: Vec2,
    pub collected: bool,
}

impl PowerUpToken {
    pub fn new(kind: PowerUpKind, lane: u8) -> Self {
        Self {
            kind,
            lane,
            pos: Vec2::new(lane_x(lane, POWER_UP_SIZE), POWER_UP_SPAWN_Y),
            size: Vec2::splat(POWER_UP_SIZE),
            collected: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// The single active power-up effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    /// Time left (ms)
    pub remaining_ms: f32,
    /// Full duration at activation (ms), for HUD timers
    pub duration_ms: f32,
}

/// What a particle burst celebrates; selects count and palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstKind {
    Coin,
    Collision,
    PowerUp,
    Combo,
}

impl BurstKind {
    pub fn particle_count(&self) -> usize {
        match self {
            BurstKind::Collision => COLLISION_PARTICLES,
            _ => BURST_PARTICLES,
        }
    }

    /// 0xRRGGBB palette the burst draws from
    pub fn palette(&self) -> [u32; 3] {
        match self {
            BurstKind::Coin => [0xffd700, 0xffed4e, 0xffaa00],
            BurstKind::Collision => [0xff0000, 0xff6600, 0xffaa00],
            BurstKind::PowerUp => [0x00ff00, 0x00ffaa, 0x00ffff],
            BurstKind::Combo => [0xff00ff, 0xaa00ff, 0x0000ff],
        }
    }
}

/// A particle for visual feedback (not gameplay-affecting)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per 60 fps frame
    pub vel: Vec2,
    /// Remaining life (ms)
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    /// 0xRRGGBB
    pub color: u32,
}

impl Particle {
    /// Opacity, fading linearly with life
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Coin combo multiplier
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    pub count: u32,
    /// Time left before the combo decays (ms)
    pub timer_ms: f32,
}

/// Something that happened during a tick, for the session layer to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A car was passed
    Scored { score: u32 },
    LevelUp { level: u32, speed: f32 },
    CoinCollected { value: u32, combo: u32, total_coins: u32 },
    PowerUpActivated(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    ComboReset,
    /// Shield took a hit in place of the bike
    ShieldAbsorbed,
    AchievementUnlocked(Achievement),
    /// Run ended; `new_high_score` when it beat the previous best
    GameOver { score: u32, new_high_score: bool },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed of the current run
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,

    pub score: u32,
    /// Persisted, survives `reset_session`
    pub high_score: u32,
    /// Coins picked up this run
    pub coins: u32,
    /// Persisted, survives `reset_session`
    pub total_coins: u32,
    /// Scroll speed (px per 60 fps frame)
    pub speed: f32,
    pub level: u32,
    /// Road dash scroll offset
    pub road_offset: f32,
    /// Frames simulated this run (drives render pulses)
    pub frame: u64,
    /// Remaining frames of screen shake
    pub shake: u32,
    pub combo: Combo,
    pub power_up: Option<ActivePowerUp>,
    /// Persisted, survives `reset_session`
    pub achievements: Achievements,

    pub bike: Bike,
    pub traffic: Vec<Traffic>,
    pub coin_items: Vec<Coin>,
    pub power_ups: Vec<PowerUpToken>,
    pub particles: Vec<Particle>,

    pub spawner: SpawnScheduler,
    /// Number of car sprites to pick from when spawning
    pub car_variants: usize,

    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh state in the menu
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            score: 0,
            high_score: 0,
            coins: 0,
            total_coins: 0,
            speed: tuning.initial_speed,
            level: 1,
            road_offset: 0.0,
            frame: 0,
            shake: 0,
            combo: Combo::default(),
            power_up: None,
            achievements: Achievements::default(),
            bike: Bike::default(),
            traffic: Vec::new(),
            coin_items: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            spawner: SpawnScheduler::default(),
            car_variants: 2,
            events: Vec::new(),
            tuning,
        }
    }

    /// Reset every session-scoped field for a new run
    ///
    /// High score, total coins and achievements carry over.
    pub fn reset_session(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.score = 0;
        self.coins = 0;
        self.speed = self.tuning.initial_speed;
        self.level = 1;
        self.road_offset = 0.0;
        self.frame = 0;
        self.shake = 0;
        self.combo = Combo::default();
        self.power_up = None;
        self.bike = Bike::default();
        self.traffic.clear();
        self.coin_items.clear();
        self.power_ups.clear();
        self.particles.clear();
        self.spawner = SpawnScheduler::default();
        self.events.clear();
    }

    /// Kind of the active power-up, if any
    pub fn active_kind(&self) -> Option<PowerUpKind> {
        self.power_up.map(|p| p.kind)
    }

    pub fn shield_active(&self) -> bool {
        self.active_kind() == Some(PowerUpKind::Shield)
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Re-check every achievement against current progress
    pub fn check_achievements(&mut self) {
        let unlocked = self
            .achievements
            .evaluate(self.score, self.combo.count, self.total_coins);
        self.events
            .extend(unlocked.into_iter().map(GameEvent::AchievementUnlocked));
    }
}
