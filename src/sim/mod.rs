//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Variable timestep supplied by the caller, clamped upstream
//! - Seeded RNG only
//! - Stable iteration order (reverse index over each entity list)
//! - No rendering or platform dependencies

pub mod achievements;
pub mod audit;
pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod effects;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use achievements::{Achievement, Achievements};
pub use audit::{Violation, audit};
pub use autopilot::Autopilot;
pub use clock::FrameClock;
pub use collision::{Rect, check_collision, inset_collision};
pub use snapshot::{Background, RenderSnapshot};
pub use spawn::SpawnScheduler;
pub use state::{
    ActivePowerUp, Bike, BurstKind, Coin, Combo, GameEvent, GamePhase, GameState, Particle,
    PowerUpKind, PowerUpToken, Traffic,
};
pub use tick::{end_run, level_up, tick};
