//! Procedural barrier and power-up spawning

use glam::Vec2;
use rand::Rng;

use super::state::{Obstacle, ObstacleKind, PlayerColor, PowerUpItem, PowerUpKind, SimState};
use crate::consts::*;

/// Pick a barrier shape from a single roll in `[0, 1)`
///
/// Thresholds are checked in a fixed priority order against the same roll, so
/// harder shapes only appear once the score unlocks them and early runs stay
/// on Gates and Blocks.
pub fn choose_obstacle_kind(score: u32, dice: f32) -> ObstacleKind {
    if score > 100 && dice < 0.2 {
        ObstacleKind::Switcher
    } else if score > 60 && dice < 0.4 {
        ObstacleKind::Moving
    } else if score > 30 && dice < 0.55 {
        ObstacleKind::ZigZag
    } else if dice < 0.4 {
        ObstacleKind::Block
    } else {
        ObstacleKind::Gate
    }
}

/// Spawn one barrier above the screen, sometimes with a power-up
pub fn spawn_obstacle(state: &mut SimState) {
    let width = state.viewport.width;
    let kind = choose_obstacle_kind(state.score, state.rng.random::<f32>());
    let color = if state.rng.random_bool(0.5) {
        PlayerColor::Red
    } else {
        PlayerColor::Blue
    };
    let vx = match kind {
        ObstacleKind::Moving if state.rng.random_bool(0.5) => MOVING_SPEED,
        ObstacleKind::Moving => -MOVING_SPEED,
        _ => 0.0,
    };
    let switch_timer = if kind == ObstacleKind::Switcher {
        SWITCHER_FIRST_SWITCH_MS
    } else {
        0.0
    };

    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        kind,
        y: OBSTACLE_SPAWN_Y,
        x_offset: 0.0,
        vx,
        color,
        passed: false,
        width,
        height: OBSTACLE_HEIGHT,
        switch_timer,
    });
    log::debug!("Spawned {:?} #{} ({:?}) at score {}", kind, id, color, state.score);

    if state.rng.random_bool(state.tuning.power_up_chance) {
        let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
        let span = (width - 2.0 * POWER_UP_EDGE_MARGIN).max(0.0);
        let x = state.rng.random::<f32>() * span + POWER_UP_EDGE_MARGIN;
        let id = state.next_entity_id();
        state.power_ups.push(PowerUpItem {
            id,
            kind,
            pos: Vec2::new(x, POWER_UP_SPAWN_Y),
            collected: false,
        });
        log::debug!("Spawned {} power-up #{}", kind.as_str(), id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;

    #[test]
    fn test_low_score_only_gates_and_blocks() {
        for i in 0..100 {
            let dice = i as f32 / 100.0;
            let kind = choose_obstacle_kind(0, dice);
            let expected = if dice < 0.4 { ObstacleKind::Block } else { ObstacleKind::Gate };
            assert_eq!(kind, expected, "dice {dice}");
        }
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(choose_obstacle_kind(101, 0.1), ObstacleKind::Switcher);
        assert_eq!(choose_obstacle_kind(100, 0.1), ObstacleKind::Moving);
        assert_eq!(choose_obstacle_kind(101, 0.3), ObstacleKind::Moving);
        assert_eq!(choose_obstacle_kind(60, 0.3), ObstacleKind::ZigZag);
        assert_eq!(choose_obstacle_kind(31, 0.5), ObstacleKind::ZigZag);
        assert_eq!(choose_obstacle_kind(30, 0.5), ObstacleKind::Gate);
        assert_eq!(choose_obstacle_kind(30, 0.3), ObstacleKind::Block);
        assert_eq!(choose_obstacle_kind(500, 0.55), ObstacleKind::Gate);
    }

    #[test]
    fn test_spawned_obstacle_shape() {
        let mut state = SimState::new(11, Viewport::new(400.0, 800.0), Tuning::default());
        state.score = 150;
        for _ in 0..200 {
            spawn_obstacle(&mut state);
        }

        assert_eq!(state.obstacles.len(), 200);
        for obs in &state.obstacles {
            assert_eq!(obs.y, OBSTACLE_SPAWN_Y);
            assert_eq!(obs.height, OBSTACLE_HEIGHT);
            assert_eq!(obs.width, 400.0);
            assert!(!obs.passed);
            match obs.kind {
                ObstacleKind::Moving => assert_eq!(obs.vx.abs(), MOVING_SPEED),
                _ => assert_eq!(obs.vx, 0.0),
            }
            match obs.kind {
                ObstacleKind::Switcher => assert_eq!(obs.switch_timer, SWITCHER_FIRST_SWITCH_MS),
                _ => assert_eq!(obs.switch_timer, 0.0),
            }
        }
        assert!(state.obstacles.iter().any(|o| o.kind == ObstacleKind::Switcher));

        let mut ids: Vec<u32> = state.obstacles.iter().map(|o| o.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_power_ups_spawn_inside_margins() {
        let tuning = Tuning {
            power_up_chance: 1.0,
            ..Tuning::default()
        };
        let mut state = SimState::new(5, Viewport::new(400.0, 800.0), tuning);
        for _ in 0..50 {
            spawn_obstacle(&mut state);
        }

        assert_eq!(state.power_ups.len(), 50);
        for item in &state.power_ups {
            assert!(item.pos.x >= POWER_UP_EDGE_MARGIN && item.pos.x < 400.0 - POWER_UP_EDGE_MARGIN);
            assert_eq!(item.pos.y, POWER_UP_SPAWN_Y);
            assert!(!item.collected);
        }
    }

    #[test]
    fn test_no_power_ups_when_chance_zero() {
        let tuning = Tuning {
            power_up_chance: 0.0,
            ..Tuning::default()
        };
        let mut state = SimState::new(5, Viewport::new(400.0, 800.0), tuning);
        for _ in 0..50 {
            spawn_obstacle(&mut state);
        }
        assert!(state.power_ups.is_empty());
    }
}
