//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module stays free of platform code:
//! - Advanced once per animation frame by the measured elapsed time
//! - Seeded RNG only
//! - Side effects (sounds, run results) are queued as events for the session
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod particles;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Contact, obstacle_contact};
pub use particles::BurstStyle;
pub use state::{
    ActivePowerUp, GameEvent, Obstacle, ObstacleKind, Particle, PlayerColor, PowerUpItem,
    PowerUpKind, RunStatus, ShardColor, SimState, SoundCue, Viewport,
};
pub use tick::{TickInput, next_speed, spawn_interval, switch_interval, tick};
