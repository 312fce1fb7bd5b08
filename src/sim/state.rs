//! Simulation state and core entity types
//!
//! One `SimState` lives for the whole process; runs are reset in place.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::particles::{self, BurstStyle};
use crate::consts::*;
use crate::tuning::Tuning;

/// Run status exposed to the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Title screen, waiting for the first tap
    Menu,
    /// Active run
    Playing,
    /// Run ended on a mismatched barrier
    GameOver,
    /// Run ended by reaching the victory score
    Victory,
}

/// The two colors the ball and barriers can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerColor {
    Red,
    #[default]
    Blue,
}

impl PlayerColor {
    pub fn flipped(self) -> Self {
        match self {
            PlayerColor::Red => PlayerColor::Blue,
            PlayerColor::Blue => PlayerColor::Red,
        }
    }
}

/// Barrier shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Two side walls with a gap in the middle
    Gate,
    /// Centered band, 65% of play width
    Block,
    /// Wide centered band, 88% of play width
    ZigZag,
    /// Gate that slides side to side
    Moving,
    /// Block that keeps changing color
    Switcher,
}

impl ObstacleKind {
    /// Gate-like shapes are solid at the sides and open in the middle
    pub fn has_gap(self) -> bool {
        matches!(self, ObstacleKind::Gate | ObstacleKind::Moving)
    }
}

/// A barrier scrolling toward the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top edge (grows downward)
    pub y: f32,
    /// Horizontal displacement from center
    pub x_offset: f32,
    /// Horizontal speed (Moving only)
    pub vx: f32,
    /// Color required to shatter through
    pub color: PlayerColor,
    /// Resolved; never evaluated for collision again
    pub passed: bool,
    pub width: f32,
    pub height: f32,
    /// Countdown to the next color change in ms (Switcher only)
    pub switch_timer: f32,
}

/// Power-up kinds. Only `Ghost` changes gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Pass through any barrier regardless of color
    Ghost,
    /// Collectable, no effect yet
    Bomb,
    /// Collectable, no effect yet
    Mirror,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Ghost, PowerUpKind::Bomb, PowerUpKind::Mirror];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Ghost => "GHOST",
            PowerUpKind::Bomb => "BOMB",
            PowerUpKind::Mirror => "MIRROR",
        }
    }
}

/// A collectable power-up orb
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUpItem {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub collected: bool,
}

/// The currently active power-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub remaining_ms: f32,
}

/// Palette entry for particle shards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShardColor {
    Red,
    Blue,
    Purple,
}

impl From<PlayerColor> for ShardColor {
    fn from(color: PlayerColor) -> Self {
        match color {
            PlayerColor::Red => ShardColor::Red,
            PlayerColor::Blue => ShardColor::Blue,
        }
    }
}

/// A decorative shard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    pub rotation: f32,
    pub angular_vel: f32,
    pub color: ShardColor,
    pub size: f32,
}

/// Play area in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Fixed ball center: horizontally centered, 75% down
    pub fn player_pos(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height * PLAYER_Y)
    }
}

/// Sound cues the simulation asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Flip,
    Match,
    Crash,
    PowerUp,
    /// Every 10th combo step, carrying the new multiplier
    Combo(u32),
}

/// Side effects produced by a tick, drained by the session afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Sound(SoundCue),
    RunStarted,
    Crashed { score: u32 },
    Victory { score: u32 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimState {
    pub status: RunStatus,
    pub score: u32,
    pub combo: u32,
    pub player_color: PlayerColor,
    /// Scroll speed (pixels/frame)
    pub speed: f32,
    pub power_up: Option<ActivePowerUp>,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUpItem>,
    pub particles: Vec<Particle>,
    /// Milliseconds since the last obstacle spawn
    pub spawn_timer: f32,
    /// Camera shake magnitude (pixels)
    pub shake: f32,
    /// White overlay intensity (0-1)
    pub flash: f32,
    pub viewport: Viewport,
    /// Best score known to the HUD
    pub high_score: u32,
    pub tuning: Tuning,
    /// Particles beyond this count are dropped oldest first
    pub particle_cap: usize,
    /// Pending side effects for the session
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl SimState {
    /// Create a state sitting on the menu
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        Self {
            status: RunStatus::Menu,
            score: 0,
            combo: 0,
            player_color: PlayerColor::default(),
            speed: tuning.initial_speed,
            power_up: None,
            obstacles: Vec::with_capacity(16),
            power_ups: Vec::with_capacity(4),
            particles: Vec::with_capacity(MAX_PARTICLES),
            spawn_timer: 0.0,
            shake: 0.0,
            flash: 0.0,
            viewport,
            high_score: 0,
            tuning,
            particle_cap: MAX_PARTICLES,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Score bonus tier derived from the combo
    pub fn multiplier(&self) -> u32 {
        self.combo / COMBO_TIER + 1
    }

    /// Ghost mode lets solid hits through regardless of color
    pub fn is_ghost(&self) -> bool {
        matches!(
            self.power_up,
            Some(ActivePowerUp {
                kind: PowerUpKind::Ghost,
                ..
            })
        )
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn play(&mut self, cue: SoundCue) {
        self.emit(GameEvent::Sound(cue));
    }

    /// Clear everything a run accumulates; keeps viewport, tuning and high score
    fn reset_run(&mut self) {
        self.score = 0;
        self.combo = 0;
        self.player_color = PlayerColor::default();
        self.speed = self.tuning.initial_speed;
        self.power_up = None;
        self.obstacles.clear();
        self.power_ups.clear();
        self.particles.clear();
        self.spawn_timer = 0.0;
        self.shake = 0.0;
        self.flash = 0.0;
    }

    /// Start (or restart) a run from any status
    pub fn start_run(&mut self) {
        self.reset_run();
        self.status = RunStatus::Playing;
        self.emit(GameEvent::RunStarted);
        log::info!("Run started (best so far: {})", self.high_score);
    }

    /// Leave a finished run for the title screen
    pub fn return_to_menu(&mut self) {
        self.reset_run();
        self.status = RunStatus::Menu;
    }

    /// Toggle the ball color (only while playing)
    pub fn flip_color(&mut self) {
        if self.status != RunStatus::Playing {
            return;
        }
        self.player_color = self.player_color.flipped();
        self.play(SoundCue::Flip);
        let at = self.viewport.player_pos();
        let color = self.player_color.into();
        self.spawn_burst(at, color, 10, BurstStyle::Ambient);
    }

    /// Emit a burst of shards into this state's particle pool
    pub fn spawn_burst(&mut self, origin: Vec2, color: ShardColor, count: usize, style: BurstStyle) {
        particles::spawn_burst(
            &mut self.particles,
            &mut self.rng,
            self.particle_cap,
            origin,
            color,
            count,
            style,
        );
    }

    /// Credit one successfully resolved barrier
    pub fn award_pass(&mut self) {
        self.score += 1;
        self.combo += 1;

        if self.score >= self.tuning.victory_score {
            self.status = RunStatus::Victory;
            self.high_score = self.high_score.max(self.score);
            self.emit(GameEvent::Victory { score: self.score });
            log::info!("Victory at score {}", self.score);
        }

        if self.combo.is_multiple_of(COMBO_TIER) {
            let level = self.multiplier();
            self.play(SoundCue::Combo(level));
        }
    }

    /// End the run on a mismatched solid hit
    pub fn crash(&mut self) {
        self.status = RunStatus::GameOver;
        self.shake = CRASH_SHAKE;
        self.high_score = self.high_score.max(self.score);
        self.play(SoundCue::Crash);
        self.emit(GameEvent::Crashed { score: self.score });
        log::info!("Crashed at score {} (combo {})", self.score, self.combo);
    }
}
