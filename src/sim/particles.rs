//! Shatter bursts
//!
//! Creation only happens here; the tick advances particles once per frame.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use super::state::{Particle, ShardColor};
use crate::consts::{PARTICLE_GRAVITY, PARTICLE_LIFE};

/// How violently a burst flies apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstStyle {
    /// Small puff (flips, switcher changes, pickups)
    Ambient,
    /// Barrier shattering: fast, thrown upward
    Impact,
}

impl BurstStyle {
    fn speed_range(self) -> (f32, f32) {
        match self {
            BurstStyle::Ambient => (2.0, 8.0),
            BurstStyle::Impact => (6.0, 20.0),
        }
    }

    fn upward_bias(self) -> f32 {
        match self {
            BurstStyle::Ambient => 0.0,
            BurstStyle::Impact => 4.0,
        }
    }
}

/// Spawn `count` shards jittered around `origin`
///
/// Once the pool exceeds `cap` the oldest shards are dropped.
pub fn spawn_burst<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    cap: usize,
    origin: Vec2,
    color: ShardColor,
    count: usize,
    style: BurstStyle,
) {
    if cap == 0 {
        return;
    }

    let (min_speed, max_speed) = style.speed_range();
    for _ in 0..count {
        let angle = rng.random::<f32>() * TAU;
        let speed = min_speed + rng.random::<f32>() * (max_speed - min_speed);
        let jitter = Vec2::new(
            (rng.random::<f32>() - 0.5) * 50.0,
            (rng.random::<f32>() - 0.5) * 15.0,
        );

        particles.push(Particle {
            pos: origin + jitter,
            vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - style.upward_bias()),
            life: PARTICLE_LIFE,
            max_life: PARTICLE_LIFE,
            rotation: rng.random::<f32>() * TAU,
            angular_vel: (rng.random::<f32>() - 0.5) * 0.4,
            color,
            size: 3.0 + rng.random::<f32>() * 12.0,
        });
    }

    if particles.len() > cap {
        let excess = particles.len() - cap;
        particles.drain(..excess);
    }
}

impl Particle {
    /// Advance one frame; returns false once expired
    pub fn step(&mut self, dt_ms: f32) -> bool {
        self.pos += self.vel;
        self.rotation += self.angular_vel;
        self.life -= dt_ms / 1000.0;
        self.vel.y += PARTICLE_GRAVITY;
        self.life > 0.0
    }

    /// Fade factor for rendering
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Advance every particle and compact out the expired ones in place
pub fn advance(particles: &mut Vec<Particle>, dt_ms: f32) {
    particles.retain_mut(|p| p.step(dt_ms));
}
