//! Ball-vs-barrier overlap tests
//!
//! Everything is one-dimensional: the ball sits at a fixed height, so once a
//! barrier's vertical span reaches the ball only the horizontal extents matter.

use glam::Vec2;

use super::state::ObstacleKind;
use crate::consts::*;

/// Outcome of testing the ball against a barrier row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// The ball overlaps the opaque part of the barrier
    Solid,
    /// The ball slips through the opening
    Gap,
}

/// Gate opening as a fraction of play width; narrows with score
pub fn gate_gap_fraction(score: u32) -> f32 {
    (GATE_GAP_INITIAL - score as f32 / GATE_GAP_SCORE_DIVISOR).max(GATE_GAP_MIN)
}

/// Inner edges of a gate's two side walls, as x coordinates
pub fn gate_bounds(width: f32, score: u32, x_offset: f32) -> (f32, f32) {
    let side = (1.0 - gate_gap_fraction(score)) / 2.0;
    (width * side + x_offset, width * (1.0 - side) + x_offset)
}

/// Width of a centered band as a fraction of play width
pub fn band_width_fraction(kind: ObstacleKind) -> f32 {
    match kind {
        ObstacleKind::ZigZag => ZIGZAG_WIDTH_FRACTION,
        _ => BLOCK_WIDTH_FRACTION,
    }
}

/// Left and right edges of a centered band
pub fn band_bounds(width: f32, kind: ObstacleKind, x_offset: f32) -> (f32, f32) {
    let band = width * band_width_fraction(kind);
    let left = (width - band) / 2.0 + x_offset;
    (left, left + band)
}

/// True when the circle is not entirely inside `[left, right]`
#[inline]
pub fn circle_leaves_gap(center_x: f32, radius: f32, left: f32, right: f32) -> bool {
    center_x - radius < left || center_x + radius > right
}

/// True when the circle overlaps `[left, right]`
#[inline]
pub fn circle_overlaps_band(center_x: f32, radius: f32, left: f32, right: f32) -> bool {
    center_x + radius > left && center_x - radius < right
}

/// Whether a barrier's vertical span currently overlaps the ball
#[inline]
pub fn in_player_band(obstacle_y: f32, obstacle_height: f32, player_y: f32, radius: f32) -> bool {
    obstacle_y > player_y - radius - obstacle_height && obstacle_y < player_y + radius
}

/// Test the ball against a barrier row of the given shape
pub fn obstacle_contact(
    kind: ObstacleKind,
    x_offset: f32,
    ball_x: f32,
    radius: f32,
    width: f32,
    score: u32,
) -> Contact {
    let solid = if kind.has_gap() {
        let (left, right) = gate_bounds(width, score, x_offset);
        circle_leaves_gap(ball_x, radius, left, right)
    } else {
        let (left, right) = band_bounds(width, kind, x_offset);
        circle_overlaps_band(ball_x, radius, left, right)
    };

    if solid { Contact::Solid } else { Contact::Gap }
}

/// Square pickup window around the ball
#[inline]
pub fn in_pickup_window(item: Vec2, player: Vec2) -> bool {
    (item.x - player.x).abs() < PICKUP_HALF_EXTENT && (item.y - player.y).abs() < PICKUP_HALF_EXTENT
}
