//! Color Flip Rush - a one-tap color matching arcade game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (spawning, physics, collisions, scoring)
//! - `renderer`: WebGPU rendering of a read-only simulation snapshot
//! - `session`: Run lifecycle, high score persistence and sound dispatch
//! - `platform`: Browser/native collaborator seams
//! - `audio`: Procedural Web Audio tones per sound cue
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::TuningError;
pub use highscores::{MemoryStore, ScoreStore};
pub use session::Session;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Fixed play-field geometry and effect constants
///
/// Balance knobs that designers tweak (speeds, spawn rates, durations) live in
/// [`Tuning`] instead.
pub mod consts {
    /// Player's vertical position as a fraction of play height
    pub const PLAYER_Y: f32 = 0.75;
    /// Player ball radius (pixels)
    pub const BALL_RADIUS: f32 = 22.0;
    /// Obstacle band height (pixels)
    pub const OBSTACLE_HEIGHT: f32 = 45.0;

    /// Frames longer than this (ms) are treated as a stall and not simulated
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Obstacles spawn this far above the top edge
    pub const OBSTACLE_SPAWN_Y: f32 = -200.0;
    /// Power-up items spawn slightly above their obstacle
    pub const POWER_UP_SPAWN_Y: f32 = -250.0;
    /// Power-ups keep this distance from the side edges
    pub const POWER_UP_EDGE_MARGIN: f32 = 40.0;
    /// Entities are culled once this far below the bottom edge
    pub const DESPAWN_MARGIN: f32 = 300.0;

    /// Gate gap as a fraction of play width at score 0
    pub const GATE_GAP_INITIAL: f32 = 0.24;
    /// Narrowest gate gap
    pub const GATE_GAP_MIN: f32 = 0.08;
    /// Score needed to shrink the gap by one full play width
    pub const GATE_GAP_SCORE_DIVISOR: f32 = 1200.0;
    /// Block/Switcher band width as a fraction of play width
    pub const BLOCK_WIDTH_FRACTION: f32 = 0.65;
    /// ZigZag band width as a fraction of play width
    pub const ZIGZAG_WIDTH_FRACTION: f32 = 0.88;

    /// Horizontal speed of Moving barriers (pixels/frame)
    pub const MOVING_SPEED: f32 = 2.5;
    /// Moving barriers reverse past this fraction of play width
    pub const MOVING_RANGE: f32 = 0.3;

    /// Switcher countdown before its first color change (ms)
    pub const SWITCHER_FIRST_SWITCH_MS: f32 = 1400.0;
    /// Switcher interval at score 0 (ms)
    pub const SWITCHER_BASE_INTERVAL_MS: f32 = 1600.0;
    /// Fastest switcher interval (ms)
    pub const SWITCHER_MIN_INTERVAL_MS: f32 = 400.0;
    /// Switcher interval shrink per point (ms)
    pub const SWITCHER_MS_PER_POINT: f32 = 5.0;

    /// Half extent of the power-up pickup window around the ball
    pub const PICKUP_HALF_EXTENT: f32 = 45.0;

    /// Particle gravity (pixels/frame²)
    pub const PARTICLE_GRAVITY: f32 = 0.28;
    /// Particle lifetime (seconds)
    pub const PARTICLE_LIFE: f32 = 1.5;
    /// Default particle cap when no settings are applied
    pub const MAX_PARTICLES: usize = 600;

    /// Camera shake per-frame decay factor
    pub const SHAKE_DECAY: f32 = 0.9;
    /// Flash overlay per-frame decay factor
    pub const FLASH_DECAY: f32 = 0.8;
    /// Shake/flash values below this snap to zero
    pub const EFFECT_EPSILON: f32 = 0.01;

    /// Shake after a crash
    pub const CRASH_SHAKE: f32 = 40.0;
    /// Shake after shattering through a matching barrier
    pub const SHATTER_SHAKE: f32 = 20.0;
    /// Flash after shattering through a matching barrier
    pub const SHATTER_FLASH: f32 = 0.6;
    /// Shake after slipping through a gap
    pub const GAP_SHAKE: f32 = 6.0;

    /// Combo steps per multiplier tier
    pub const COMBO_TIER: u32 = 10;
}
