//! Per-frame simulation update
//!
//! Advances the state once per animation frame by the real elapsed time.

use super::autopilot;
use super::collision::{self, Contact};
use super::particles::{self, BurstStyle};
use super::spawner;
use super::state::{ActivePowerUp, ObstacleKind, RunStatus, ShardColor, SimState, SoundCue};
use crate::consts::*;
use crate::tuning::Tuning;

/// Input queued since the previous frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap/click/space: start or restart when idle, flip color while playing
    pub primary: bool,
    /// Leave a finished run for the title screen
    pub return_to_menu: bool,
    /// Idle/demo mode - autopilot flips the ball
    pub autopilot: bool,
}

/// Advance the simulation by one frame of `elapsed_ms`
pub fn tick(state: &mut SimState, input: &TickInput, elapsed_ms: f32) {
    // Only a finished run can be left; a live one ends by crashing or winning
    if input.return_to_menu && matches!(state.status, RunStatus::GameOver | RunStatus::Victory) {
        state.return_to_menu();
    }
    if input.primary {
        match state.status {
            RunStatus::Playing => state.flip_color(),
            RunStatus::Menu | RunStatus::GameOver | RunStatus::Victory => state.start_run(),
        }
    }

    if state.status != RunStatus::Playing {
        return;
    }

    // Stall (tab hidden, debugger): skip instead of taking one huge step
    if elapsed_ms > MAX_FRAME_MS {
        log::debug!("Skipping {:.0}ms frame", elapsed_ms);
        return;
    }
    let dt = elapsed_ms.max(0.0);

    if input.autopilot && autopilot::wants_flip(state) {
        state.flip_color();
    }

    state.speed = next_speed(state.speed, dt, state.score, &state.tuning);

    state.spawn_timer += dt;
    if state.spawn_timer > spawn_interval(state.score, &state.tuning) {
        spawner::spawn_obstacle(state);
        state.spawn_timer = 0.0;
    }

    decay_effects(state);
    advance_obstacles(state, dt);

    let speed = state.speed;
    for item in &mut state.power_ups {
        item.pos.y += speed;
    }

    particles::advance(&mut state.particles, dt);

    resolve_collisions(state);
    if state.status != RunStatus::Playing {
        return;
    }

    collect_power_ups(state);
    tick_power_up(state, dt);
    cull_offscreen(state);
}

/// Steady acceleration compounded by a score-driven ramp, capped at max speed
pub fn next_speed(speed: f32, dt: f32, score: u32, tuning: &Tuning) -> f32 {
    let ramp = 1.0 + score as f32 / tuning.speed_score_divisor;
    ((speed + tuning.speed_accel * dt) * ramp).min(tuning.max_speed)
}

/// Milliseconds between spawns; shrinks with score down to the floor
pub fn spawn_interval(score: u32, tuning: &Tuning) -> f32 {
    (tuning.spawn_interval_ms - score as f32 * tuning.spawn_ms_per_point).max(tuning.min_spawn_interval_ms)
}

/// Milliseconds between Switcher color changes
pub fn switch_interval(score: u32) -> f32 {
    (SWITCHER_BASE_INTERVAL_MS - score as f32 * SWITCHER_MS_PER_POINT).max(SWITCHER_MIN_INTERVAL_MS)
}

fn decay_effects(state: &mut SimState) {
    state.shake *= SHAKE_DECAY;
    if state.shake < EFFECT_EPSILON {
        state.shake = 0.0;
    }

    state.flash *= FLASH_DECAY;
    if state.flash < EFFECT_EPSILON {
        state.flash = 0.0;
    }
}

fn advance_obstacles(state: &mut SimState, dt: f32) {
    let width = state.viewport.width;
    let speed = state.speed;
    let next_switch = switch_interval(state.score);
    let mut switched = Vec::new();

    for obs in &mut state.obstacles {
        obs.y += speed;

        if obs.kind == ObstacleKind::Moving && obs.vx != 0.0 {
            obs.x_offset += obs.vx;
            if obs.x_offset.abs() > width * MOVING_RANGE {
                obs.vx = -obs.vx;
            }
        }

        if obs.kind == ObstacleKind::Switcher {
            obs.switch_timer -= dt;
            if obs.switch_timer <= 0.0 {
                obs.color = obs.color.flipped();
                obs.switch_timer = next_switch;
                switched.push((glam::Vec2::new(width / 2.0 + obs.x_offset, obs.y), obs.color));
            }
        }
    }

    for (at, color) in switched {
        state.spawn_burst(at, color.into(), 10, BurstStyle::Ambient);
    }
}

/// Resolve every unresolved barrier overlapping the ball this frame
fn resolve_collisions(state: &mut SimState) {
    let player = state.viewport.player_pos();
    let width = state.viewport.width;

    for i in 0..state.obstacles.len() {
        if state.status != RunStatus::Playing {
            break;
        }

        let obs = state.obstacles[i];
        if obs.passed || !collision::in_player_band(obs.y, obs.height, player.y, BALL_RADIUS) {
            continue;
        }

        let contact =
            collision::obstacle_contact(obs.kind, obs.x_offset, player.x, BALL_RADIUS, width, state.score);

        match contact {
            Contact::Solid if !state.is_ghost() && obs.color != state.player_color => {
                state.crash();
            }
            Contact::Solid => {
                state.obstacles[i].passed = true;
                state.play(SoundCue::Match);
                state.shake = SHATTER_SHAKE;
                state.flash = SHATTER_FLASH;

                let color = ShardColor::from(obs.color);
                let mid_y = obs.y + obs.height / 2.0;
                if obs.kind.has_gap() {
                    for fraction in [0.15, 0.85] {
                        let at = glam::Vec2::new(width * fraction + obs.x_offset, mid_y);
                        state.spawn_burst(at, color, 30, BurstStyle::Impact);
                    }
                } else {
                    state.spawn_burst(glam::Vec2::new(player.x, mid_y), color, 50, BurstStyle::Impact);
                }
                state.award_pass();
            }
            Contact::Gap => {
                state.obstacles[i].passed = true;
                state.play(SoundCue::Match);
                state.shake = GAP_SHAKE;
                state.award_pass();
            }
        }
    }
}

fn collect_power_ups(state: &mut SimState) {
    let player = state.viewport.player_pos();
    let duration = state.tuning.power_up_duration_ms;
    let mut collected = Vec::new();

    for item in &mut state.power_ups {
        if !item.collected && collision::in_pickup_window(item.pos, player) {
            item.collected = true;
            collected.push((item.kind, item.pos));
        }
    }

    for (kind, at) in collected {
        state.play(SoundCue::PowerUp);
        state.spawn_burst(at, ShardColor::Purple, 20, BurstStyle::Ambient);
        state.power_up = Some(ActivePowerUp {
            kind,
            remaining_ms: duration,
        });
        log::info!("{} power-up active", kind.as_str());
    }
}

fn tick_power_up(state: &mut SimState, dt: f32) {
    if let Some(active) = &mut state.power_up {
        active.remaining_ms -= dt;
        if active.remaining_ms <= 0.0 {
            log::debug!("{} power-up expired", active.kind.as_str());
            state.power_up = None;
        }
    }
}

fn cull_offscreen(state: &mut SimState) {
    let limit = state.viewport.height + DESPAWN_MARGIN;
    state.obstacles.retain(|o| o.y < limit);
    state.power_ups.retain(|p| p.pos.y < limit && !p.collected);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{
        GameEvent, Obstacle, PlayerColor, PowerUpItem, PowerUpKind, Viewport,
    };
    use glam::Vec2;
    use proptest::prelude::*;

    const WIDTH: f32 = 400.0;
    const HEIGHT: f32 = 800.0;
    const FRAME: f32 = 16.0;

    fn playing() -> SimState {
        let mut state = SimState::new(42, Viewport::new(WIDTH, HEIGHT), Tuning::default());
        state.start_run();
        state.events.clear();
        state
    }

    /// A barrier whose top edge sits so that the next frame lands it on the ball
    fn at_player(state: &mut SimState, kind: ObstacleKind, color: PlayerColor) -> usize {
        let player_y = state.viewport.player_pos().y;
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind,
            y: player_y - OBSTACLE_HEIGHT / 2.0 - state.speed,
            x_offset: 0.0,
            vx: 0.0,
            color,
            passed: false,
            width: WIDTH,
            height: OBSTACLE_HEIGHT,
            switch_timer: 10_000.0,
        });
        state.obstacles.len() - 1
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_menu_tap_starts_run() {
        let mut state = SimState::new(1, Viewport::new(WIDTH, HEIGHT), Tuning::default());
        tick(&mut state, &idle(), FRAME);
        assert_eq!(state.status, RunStatus::Menu);
        assert_eq!(state.speed, state.tuning.initial_speed);

        let tap = TickInput {
            primary: true,
            ..Default::default()
        };
        tick(&mut state, &tap, FRAME);
        assert_eq!(state.status, RunStatus::Playing);
        assert!(state.events.contains(&GameEvent::RunStarted));
    }

    #[test]
    fn test_tap_while_playing_flips() {
        let mut state = playing();
        let tap = TickInput {
            primary: true,
            ..Default::default()
        };
        tick(&mut state, &tap, FRAME);
        assert_eq!(state.player_color, PlayerColor::Red);
        assert_eq!(state.status, RunStatus::Playing);
    }

    #[test]
    fn test_empty_field_accelerates_without_scoring() {
        let mut state = playing();
        let mut last_speed = state.speed;
        for _ in 0..50 {
            tick(&mut state, &idle(), FRAME);
            assert!(state.speed > last_speed);
            last_speed = state.speed;
            assert_eq!(state.score, 0);
            assert_eq!(state.combo, 0);
        }
    }

    #[test]
    fn test_stalled_frame_is_skipped() {
        let mut state = playing();
        state.spawn_timer = 123.0;
        let before = state.speed;
        tick(&mut state, &idle(), 250.0);
        assert_eq!(state.speed, before);
        assert_eq!(state.spawn_timer, 123.0);
    }

    #[test]
    fn test_spawns_after_interval() {
        let mut state = playing();
        let frames = (spawn_interval(0, &state.tuning) / FRAME).ceil() as usize + 1;
        for _ in 0..frames {
            tick(&mut state, &idle(), FRAME);
        }
        assert_eq!(state.obstacles.len(), 1);
        assert!(state.spawn_timer < FRAME * 2.0);
    }

    #[test]
    fn test_centered_gate_is_a_safe_pass() {
        let mut state = playing();
        let idx = at_player(&mut state, ObstacleKind::Gate, PlayerColor::Red);
        tick(&mut state, &idle(), FRAME);

        assert_eq!(state.status, RunStatus::Playing);
        assert_eq!(state.score, 1);
        assert_eq!(state.combo, 1);
        assert!(state.obstacles[idx].passed);
        assert_eq!(state.flash, 0.0);
        assert_eq!(state.shake, GAP_SHAKE);
    }

    #[test]
    fn test_mismatched_block_crashes() {
        let mut state = playing();
        state.high_score = 0;
        state.score = 5;
        at_player(&mut state, ObstacleKind::Block, PlayerColor::Red);
        tick(&mut state, &idle(), FRAME);

        assert_eq!(state.status, RunStatus::GameOver);
        assert_eq!(state.score, 5);
        assert_eq!(state.shake, CRASH_SHAKE);
        assert_eq!(state.high_score, 5);
        assert!(state.events.contains(&GameEvent::Crashed { score: 5 }));
        assert!(state.events.contains(&GameEvent::Sound(SoundCue::Crash)));
    }

    #[test]
    fn test_matching_block_shatters() {
        let mut state = playing();
        let idx = at_player(&mut state, ObstacleKind::Switcher, PlayerColor::Blue);
        tick(&mut state, &idle(), FRAME);

        assert_eq!(state.status, RunStatus::Playing);
        assert_eq!(state.score, 1);
        assert!(state.obstacles[idx].passed);
        assert_eq!(state.flash, SHATTER_FLASH);
        assert_eq!(state.particles.len(), 50);
    }

    #[test]
    fn test_gate_wall_shatter_spawns_two_bursts() {
        let mut state = playing();
        let idx = at_player(&mut state, ObstacleKind::Moving, PlayerColor::Blue);
        state.obstacles[idx].x_offset = 80.0;
        tick(&mut state, &idle(), FRAME);

        assert_eq!(state.score, 1);
        assert_eq!(state.particles.len(), 60);
    }

    #[test]
    fn test_ghost_survives_mismatch() {
        let mut state = playing();
        state.power_ups.push(PowerUpItem {
            id: 99,
            kind: PowerUpKind::Ghost,
            pos: state.viewport.player_pos() - Vec2::new(0.0, state.speed),
            collected: false,
        });
        tick(&mut state, &idle(), FRAME);
        assert!(state.is_ghost());
        assert!(state.power_ups.is_empty());
        assert!(state.events.contains(&GameEvent::Sound(SoundCue::PowerUp)));

        at_player(&mut state, ObstacleKind::Block, PlayerColor::Red);
        tick(&mut state, &idle(), FRAME);
        assert_eq!(state.status, RunStatus::Playing);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_power_up_expires() {
        let mut state = playing();
        state.power_up = Some(ActivePowerUp {
            kind: PowerUpKind::Ghost,
            remaining_ms: 40.0,
        });
        tick(&mut state, &idle(), FRAME);
        tick(&mut state, &idle(), FRAME);
        assert!(state.is_ghost());
        tick(&mut state, &idle(), FRAME);
        assert!(state.power_up.is_none());
        assert!(!state.is_ghost());
    }

    #[test]
    fn test_inert_power_ups_do_not_ghost() {
        let mut state = playing();
        state.power_up = Some(ActivePowerUp {
            kind: PowerUpKind::Mirror,
            remaining_ms: 5000.0,
        });
        at_player(&mut state, ObstacleKind::Block, PlayerColor::Red);
        tick(&mut state, &idle(), FRAME);
        assert_eq!(state.status, RunStatus::GameOver);
    }

    #[test]
    fn test_passed_obstacle_is_never_rechecked() {
        let mut state = playing();
        let idx = at_player(&mut state, ObstacleKind::Block, PlayerColor::Red);
        state.obstacles[idx].passed = true;
        tick(&mut state, &idle(), FRAME);
        assert_eq!(state.status, RunStatus::Playing);
        assert_eq!(state.score, 0);
        assert!(state.obstacles[idx].passed);
    }

    #[test]
    fn test_victory_halts_scoring() {
        let mut state = playing();
        state.score = state.tuning.victory_score - 1;
        at_player(&mut state, ObstacleKind::Gate, PlayerColor::Red);
        at_player(&mut state, ObstacleKind::Gate, PlayerColor::Red);
        tick(&mut state, &idle(), FRAME);

        assert_eq!(state.status, RunStatus::Victory);
        assert_eq!(state.score, 999);

        at_player(&mut state, ObstacleKind::Gate, PlayerColor::Red);
        tick(&mut state, &idle(), FRAME);
        assert_eq!(state.score, 999);
    }

    #[test]
    fn test_crash_stops_later_collisions_in_same_frame() {
        let mut state = playing();
        at_player(&mut state, ObstacleKind::Block, PlayerColor::Red);
        let gate = at_player(&mut state, ObstacleKind::Gate, PlayerColor::Red);
        tick(&mut state, &idle(), FRAME);
        assert_eq!(state.status, RunStatus::GameOver);
        assert_eq!(state.score, 0);
        assert!(!state.obstacles[gate].passed);
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut state = playing();
        state.score = 30;
        at_player(&mut state, ObstacleKind::Block, PlayerColor::Red);
        tick(&mut state, &idle(), FRAME);
        assert_eq!(state.status, RunStatus::GameOver);

        // No physics while crashed
        let frozen = state.obstacles[0].y;
        tick(&mut state, &idle(), FRAME);
        assert_eq!(state.obstacles[0].y, frozen);

        let tap = TickInput {
            primary: true,
            ..Default::default()
        };
        tick(&mut state, &tap, FRAME);
        assert_eq!(state.status, RunStatus::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 30);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_return_to_menu() {
        let mut state = playing();
        state.score = 4;
        state.crash();
        let back = TickInput {
            return_to_menu: true,
            ..Default::default()
        };
        tick(&mut state, &back, FRAME);
        assert_eq!(state.status, RunStatus::Menu);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_return_to_menu_ignored_mid_run() {
        let mut state = playing();
        state.score = 40;
        let back = TickInput {
            return_to_menu: true,
            ..Default::default()
        };
        tick(&mut state, &back, FRAME);
        assert_eq!(state.status, RunStatus::Playing);
        assert_eq!(state.score, 40);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_switch_interval_floor() {
        assert_eq!(switch_interval(0), 1600.0);
        assert_eq!(switch_interval(100), 1100.0);
        assert_eq!(switch_interval(240), 400.0);
        assert_eq!(switch_interval(300), 400.0);
    }

    #[test]
    fn test_moving_barrier_reverses() {
        let mut state = playing();
        let idx = at_player(&mut state, ObstacleKind::Moving, PlayerColor::Blue);
        state.obstacles[idx].y = -100.0;
        state.obstacles[idx].vx = MOVING_SPEED;
        state.obstacles[idx].x_offset = WIDTH * MOVING_RANGE - 1.0;
        tick(&mut state, &idle(), FRAME);
        assert_eq!(state.obstacles[idx].vx, -MOVING_SPEED);
    }

    #[test]
    fn test_switcher_changes_color() {
        let mut state = playing();
        let idx = at_player(&mut state, ObstacleKind::Switcher, PlayerColor::Red);
        state.obstacles[idx].y = -100.0;
        state.obstacles[idx].switch_timer = 10.0;
        tick(&mut state, &idle(), FRAME);

        assert_eq!(state.obstacles[idx].color, PlayerColor::Blue);
        assert_eq!(state.obstacles[idx].switch_timer, switch_interval(0));
        assert_eq!(state.particles.len(), 10);
    }

    #[test]
    fn test_offscreen_entities_are_culled() {
        let mut state = playing();
        let idx = at_player(&mut state, ObstacleKind::Gate, PlayerColor::Red);
        state.obstacles[idx].y = HEIGHT + DESPAWN_MARGIN - 1.0;
        state.power_ups.push(PowerUpItem {
            id: 7,
            kind: PowerUpKind::Bomb,
            pos: Vec2::new(40.0, HEIGHT + DESPAWN_MARGIN - 1.0),
            collected: false,
        });
        tick(&mut state, &idle(), FRAME);
        assert!(state.obstacles.is_empty());
        assert!(state.power_ups.is_empty());
    }

    #[test]
    fn test_effects_decay() {
        let mut state = playing();
        state.shake = 10.0;
        state.flash = 0.5;
        tick(&mut state, &idle(), FRAME);
        assert!((state.shake - 9.0).abs() < 1e-4);
        assert!((state.flash - 0.4).abs() < 1e-4);
        for _ in 0..200 {
            tick(&mut state, &idle(), FRAME);
        }
        assert_eq!(state.flash, 0.0);
    }

    #[test]
    fn test_autopilot_survives_a_while() {
        let mut state = playing();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..60 * 30 {
            tick(&mut state, &input, FRAME);
            if state.status != RunStatus::Playing {
                break;
            }
        }
        assert!(state.score > 5, "autopilot only reached {}", state.score);
    }

    proptest! {
        #[test]
        fn prop_speed_never_exceeds_max(
            speed in 0.0f32..20.0,
            dt in 0.0f32..=100.0,
            score in 0u32..1000,
        ) {
            let tuning = Tuning::default();
            prop_assert!(next_speed(speed, dt, score, &tuning) <= tuning.max_speed);
        }

        #[test]
        fn prop_speed_non_decreasing_in_score(
            dts in proptest::collection::vec(0.0f32..=100.0, 1..60),
            score in 0u32..900,
            bump in 1u32..100,
        ) {
            let tuning = Tuning::default();
            let mut low = tuning.initial_speed;
            let mut high = tuning.initial_speed;
            for dt in dts {
                low = next_speed(low, dt, score, &tuning);
                high = next_speed(high, dt, score + bump, &tuning);
                prop_assert!(high >= low);
            }
        }

        #[test]
        fn prop_spawn_interval_floored_and_non_increasing(score in 0u32..2000, step in 0u32..50) {
            let tuning = Tuning::default();
            let a = spawn_interval(score, &tuning);
            let b = spawn_interval(score + step, &tuning);
            prop_assert!(a >= tuning.min_spawn_interval_ms);
            prop_assert!(b <= a);
        }

        #[test]
        fn prop_pass_outcome_rule(
            kind_idx in 0usize..5,
            offset in -150.0f32..150.0,
            score in 0u32..900,
            obstacle_red in any::<bool>(),
            player_red in any::<bool>(),
            ghost in any::<bool>(),
        ) {
            let kinds = [
                ObstacleKind::Gate,
                ObstacleKind::Block,
                ObstacleKind::ZigZag,
                ObstacleKind::Moving,
                ObstacleKind::Switcher,
            ];
            let kind = kinds[kind_idx];
            let color = if obstacle_red { PlayerColor::Red } else { PlayerColor::Blue };

            let mut state = playing();
            state.score = score;
            state.combo = score;
            state.player_color = if player_red { PlayerColor::Red } else { PlayerColor::Blue };
            if ghost {
                state.power_up = Some(ActivePowerUp { kind: PowerUpKind::Ghost, remaining_ms: 5000.0 });
            }
            let idx = at_player(&mut state, kind, color);
            state.obstacles[idx].x_offset = offset;

            let solid = collision::obstacle_contact(kind, offset, WIDTH / 2.0, BALL_RADIUS, WIDTH, score)
                == Contact::Solid;
            let should_crash = solid && !ghost && color != state.player_color;

            tick(&mut state, &idle(), FRAME);

            if should_crash {
                prop_assert_eq!(state.status, RunStatus::GameOver);
                prop_assert_eq!(state.score, score);
                prop_assert!(!state.obstacles[idx].passed);
            } else {
                prop_assert_eq!(state.score, score + 1);
                prop_assert_eq!(state.combo, score + 1);
                prop_assert!(state.obstacles[idx].passed);
                prop_assert_eq!(state.multiplier(), state.combo / 10 + 1);
            }
        }
    }
}
