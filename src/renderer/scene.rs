//! Frame composition
//!
//! Turns a read-only simulation snapshot into a pixel-space vertex list. The
//! pipeline maps pixels to clip space; nothing here touches the GPU.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::FRAC_PI_4;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::consts::BALL_RADIUS;
use crate::settings::Settings;
use crate::sim::collision::{band_bounds, gate_gap_fraction};
use crate::sim::{Obstacle, ObstacleKind, PlayerColor, PowerUpKind, ShardColor, SimState};

const GRID_SPACING: f32 = 90.0;
const TRAIL_LENGTH: f32 = 180.0;
const HALO_PADDING: f32 = 8.0;
const PASSED_ALPHA: f32 = 0.1;
/// Switchers pulse an outline this close to changing color (ms)
const SWITCH_WARNING_MS: f32 = 600.0;
const ORB_RADIUS: f32 = 16.0;
const CIRCLE_SEGMENTS: u32 = 32;

pub fn player_color(color: PlayerColor) -> [f32; 4] {
    match color {
        PlayerColor::Red => colors::RED,
        PlayerColor::Blue => colors::BLUE,
    }
}

fn shard_color(color: ShardColor) -> [f32; 4] {
    match color {
        ShardColor::Red => colors::RED,
        ShardColor::Blue => colors::BLUE,
        ShardColor::Purple => colors::ACCENT_PURPLE,
    }
}

/// Camera offset for this frame; uniform in `±shake/2` on each axis
pub fn shake_offset(shake: f32, time: f64, enabled: bool) -> Vec2 {
    if !enabled || shake <= 0.0 {
        return Vec2::ZERO;
    }
    let mut rng = Pcg32::seed_from_u64(time.to_bits());
    Vec2::new(
        (rng.random::<f32>() - 0.5) * shake,
        (rng.random::<f32>() - 0.5) * shake,
    )
}

/// Build the complete vertex list for one frame. `time` is in seconds.
pub fn build_frame(state: &SimState, settings: &Settings, time: f64) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);

    if settings.quality.grid_enabled() {
        grid(&mut out, state, time);
    }
    for obs in &state.obstacles {
        obstacle(&mut out, obs, state.score, state.viewport.width, time);
    }
    power_ups(&mut out, state, time);
    for p in &state.particles {
        shapes::shard(
            &mut out,
            p.pos,
            p.size,
            p.rotation,
            with_alpha(shard_color(p.color), p.alpha()),
        );
    }
    player(&mut out, state, settings);

    let offset = shake_offset(state.shake, time, settings.effective_screen_shake());
    if offset != Vec2::ZERO {
        for v in &mut out {
            v.position[0] += offset.x;
            v.position[1] += offset.y;
        }
    }

    // Flash covers the whole screen and does not shake
    if settings.effective_flash() && state.flash > 0.0 {
        shapes::rect(
            &mut out,
            0.0,
            0.0,
            state.viewport.width,
            state.viewport.height,
            with_alpha(colors::WHITE, state.flash.min(1.0)),
        );
    }

    out
}

fn grid(out: &mut Vec<Vertex>, state: &SimState, time: f64) {
    let (w, h) = (state.viewport.width, state.viewport.height);
    // Scroll at roughly the barrier speed (pixels/frame at 60fps)
    let scroll = ((time * 60.0 * state.speed as f64) % GRID_SPACING as f64) as f32;

    let mut y = scroll - GRID_SPACING;
    while y < h {
        shapes::rect(out, 0.0, y, w, 1.0, colors::GRID);
        y += GRID_SPACING;
    }
    let mut x = 0.0;
    while x < w {
        shapes::rect(out, x, 0.0, 1.0, h, colors::GRID);
        x += GRID_SPACING;
    }
}

/// Rectangle with glassy highlight and shadow strips
fn glass_rect(out: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, color: [f32; 4], alpha: f32) {
    shapes::rect(out, x, y, w, h, with_alpha(color, alpha));
    shapes::rect(out, x, y + 6.0, w, 10.0, with_alpha(colors::WHITE, 0.3 * alpha));
    shapes::rect(out, x, y + h - 16.0, w, 8.0, with_alpha(colors::BLACK, 0.12 * alpha));
}

fn obstacle(out: &mut Vec<Vertex>, obs: &Obstacle, score: u32, width: f32, time: f64) {
    let alpha = if obs.passed { PASSED_ALPHA } else { 1.0 };
    let color = player_color(obs.color);

    if obs.kind.has_gap() {
        let side = (1.0 - gate_gap_fraction(score)) / 2.0;
        let wall = width * side;
        glass_rect(out, obs.x_offset, obs.y, wall, obs.height, color, alpha);
        glass_rect(out, width * (1.0 - side) + obs.x_offset, obs.y, wall, obs.height, color, alpha);
        return;
    }

    let (left, right) = band_bounds(width, obs.kind, obs.x_offset);
    glass_rect(out, left, obs.y, right - left, obs.height, color, alpha);

    if !obs.passed && obs.kind == ObstacleKind::Switcher && obs.switch_timer < SWITCH_WARNING_MS {
        let pulse = 0.5 + 0.5 * (time as f32 * 20.0).sin();
        shapes::outline_rect(
            out,
            left,
            obs.y,
            right - left,
            obs.height,
            4.0,
            with_alpha(colors::WHITE, pulse),
        );
    }
}

fn power_ups(out: &mut Vec<Vertex>, state: &SimState, time: f64) {
    let pulse = 1.0 + 0.15 * (time as f32 * 6.0).sin();
    for item in state.power_ups.iter().filter(|p| !p.collected) {
        let rim = match item.kind {
            PowerUpKind::Ghost => colors::WHITE,
            PowerUpKind::Bomb | PowerUpKind::Mirror => colors::ACCENT_YELLOW,
        };
        let r = ORB_RADIUS * pulse;
        shapes::circle(out, item.pos, r, colors::ACCENT_PURPLE, CIRCLE_SEGMENTS);
        shapes::ring(out, item.pos, r, r + 3.0, rim, CIRCLE_SEGMENTS);
    }
}

fn player(out: &mut Vec<Vertex>, state: &SimState, settings: &Settings) {
    let pos = state.viewport.player_pos();
    let body = if state.is_ghost() {
        colors::GHOST
    } else {
        player_color(state.player_color)
    };

    if settings.trail {
        shapes::gradient_rect(
            out,
            pos.x - BALL_RADIUS,
            pos.y,
            BALL_RADIUS * 2.0,
            TRAIL_LENGTH,
            with_alpha(body, 0.35),
            with_alpha(body, 0.0),
        );
    }

    shapes::circle(out, pos, BALL_RADIUS + HALO_PADDING, colors::WHITE, CIRCLE_SEGMENTS);
    shapes::circle(out, pos, BALL_RADIUS, body, CIRCLE_SEGMENTS);
    shapes::ellipse(
        out,
        pos + Vec2::new(-10.0, -10.0),
        10.0,
        6.0,
        FRAC_PI_4,
        with_alpha(colors::WHITE, 0.6),
        16,
    );
}
