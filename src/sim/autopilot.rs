//! Idle/demo mode - flips the ball for the player
//!
//! Looks at the next unresolved barrier heading for the ball and asks for a
//! flip when that barrier would be a mismatched solid hit.

use super::collision::{Contact, obstacle_contact};
use super::state::{Obstacle, SimState};
use crate::consts::BALL_RADIUS;

/// How far above the ball the autopilot starts reacting (pixels)
const LOOKAHEAD: f32 = 260.0;

/// The closest unresolved barrier that has not yet reached the ball
pub fn next_threat(state: &SimState) -> Option<&Obstacle> {
    let player = state.viewport.player_pos();
    state
        .obstacles
        .iter()
        .filter(|o| !o.passed)
        .filter(|o| o.y < player.y + BALL_RADIUS && o.y + o.height > player.y - BALL_RADIUS - LOOKAHEAD)
        .max_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
}

/// Whether the ball should change color right now
pub fn wants_flip(state: &SimState) -> bool {
    if state.is_ghost() {
        return false;
    }
    let Some(threat) = next_threat(state) else {
        return false;
    };

    let player = state.viewport.player_pos();
    let contact = obstacle_contact(
        threat.kind,
        threat.x_offset,
        player.x,
        BALL_RADIUS,
        state.viewport.width,
        state.score,
    );
    contact == Contact::Solid && threat.color != state.player_color
}
