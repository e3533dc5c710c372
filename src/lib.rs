//! Bike Racer - A three-lane arcade dodge racer
//!
//! Core modules:
//! - `sim`: Simulation (motion, collisions, spawning, power-ups, scoring)
//! - `game`: Session state machine that owns the simulation
//! - `driver`: Explicit frame loop and the periodic audit timer
//! - `persistence`: Key-value storage gateway and the persisted profile
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod audio;
pub mod driver;
pub mod error;
pub mod game;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{StorageError, TuningError};
pub use game::Game;
pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 700.0;

    /// Number of lanes
    pub const LANE_COUNT: u8 = 3;
    /// Lane centers; the road spans x = 90..310
    pub const LANE_CENTERS: [f32; LANE_COUNT as usize] = [120.0, 200.0, 280.0];

    /// Player defaults
    pub const BIKE_WIDTH: f32 = 44.0;
    pub const BIKE_HEIGHT: f32 = 76.0;
    /// Gap between the bike's bottom edge and the playfield bottom
    pub const BIKE_BOTTOM_MARGIN: f32 = 34.0;

    /// Entity sizes and spawn heights (negative = above the top edge)
    pub const CAR_WIDTH: f32 = 46.0;
    pub const CAR_HEIGHT: f32 = 78.0;
    pub const CAR_SPAWN_Y: f32 = -110.0;
    pub const COIN_SIZE: f32 = 28.0;
    pub const COIN_SPAWN_Y: f32 = -60.0;
    pub const POWER_UP_SIZE: f32 = 36.0;
    pub const POWER_UP_SPAWN_Y: f32 = -70.0;
    /// Where a shield-deflected car is thrown back to
    pub const DEFLECT_Y: f32 = -150.0;

    /// Removal margins below the bottom edge
    pub const PICKUP_EXIT_MARGIN: f32 = 50.0;
    pub const CAR_EXIT_MARGIN: f32 = 140.0;

    /// Forgiving hitbox insets
    pub const HITBOX_PAD_X: f32 = 10.0;
    pub const HITBOX_PAD_Y: f32 = 12.0;

    /// Speed is in pixels per 60 fps frame
    pub const FRAMES_PER_SECOND: f32 = 60.0;
    /// Largest delta-time accepted from the frame clock (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Road dash pattern wraps after this many pixels
    pub const ROAD_OFFSET_WRAP: f32 = 60.0;
    /// Night palette from this level on
    pub const NIGHT_FROM_LEVEL: u32 = 4;

    /// Balance defaults (see `Tuning`)
    pub const INITIAL_SPEED: f32 = 4.0;
    pub const SPEED_INCREMENT: f32 = 0.25;
    pub const MAX_SPEED: f32 = 15.0;
    pub const SCORE_FOR_SPEED_UP: u32 = 10;
    pub const SPAWN_INTERVAL_MS: f32 = 1100.0;
    pub const MOVE_SMOOTHING: f32 = 18.0;
    pub const COIN_SPAWN_CHANCE: f64 = 0.25;
    pub const POWER_UP_SPAWN_CHANCE: f64 = 0.08;
    pub const COMBO_TIMEOUT_MS: f32 = 3000.0;
    pub const PARTICLE_LIFETIME_MS: f32 = 1200.0;
    pub const TILT_THRESHOLD_DEG: f32 = 16.0;
    pub const TILT_COOLDOWN_MS: f64 = 220.0;

    /// Power-up durations (ms)
    pub const SHIELD_DURATION_MS: f32 = 8000.0;
    pub const SLOWMO_DURATION_MS: f32 = 5000.0;
    pub const MAGNET_DURATION_MS: f32 = 5000.0;

    /// Magnet pull: range (px, center to center) and strength (px/s)
    pub const MAGNET_RANGE: f32 = 80.0;
    pub const MAGNET_PULL: f32 = 200.0;

    /// Particle bursts
    pub const BURST_PARTICLES: usize = 8;
    pub const COLLISION_PARTICLES: usize = 15;
    /// Downward acceleration per update (px/frame²)
    pub const PARTICLE_GRAVITY: f32 = 0.15;

    /// Frames of screen shake after a crash
    pub const CRASH_SHAKE_FRAMES: u32 = 20;

    /// Exclusive upper bound on a believable score
    pub const SCORE_LIMIT: u32 = 1_000_000;
    /// Audit tolerates this much speed above the maximum
    pub const SPEED_AUDIT_SLACK: f32 = 2.0;
    /// Real-time audit period (ms)
    pub const AUDIT_INTERVAL_MS: f64 = 5000.0;

    /// Assets are forced loaded after this grace period (ms)
    pub const ASSET_LOAD_TIMEOUT_MS: f64 = 3000.0;
    /// Achievement toasts stay up this long (ms)
    pub const TOAST_DURATION_MS: u32 = 3000;
}

/// Left edge x for an entity of `width` centered on `lane`
#[inline]
pub fn lane_x(lane: u8, width: f32) -> f32 {
    let lane = lane.min(consts::LANE_COUNT - 1) as usize;
    consts::LANE_CENTERS[lane] - width / 2.0
}

/// Whether a score is within the believable envelope
#[inline]
pub fn validate_score(score: u32) -> bool {
    score < consts::SCORE_LIMIT
}
