//! Per-frame session update
//!
//! Drives one `GameState` through Idle -> Running -> GameOver -> Running.
//! Settings arrive as an explicit snapshot on every call.

use super::collision::{circle_rect_overlap, rect_overlap};
use super::spawner::scroll_speed;
use super::state::{GameEvent, GameState, SessionPhase, billboard_bottom};
use crate::consts::*;
use crate::settings::Settings;

/// Begin a fresh run (valid from any phase)
pub fn start(state: &mut GameState) {
    state.score = 0;
    state.distance = 0;
    state.elapsed_ms = 0.0;
    state.time_ticks = 0;
    state.spawner.reset();
    state.physics.reset_player();
    state.phase = SessionPhase::Running;
    state.events.push(GameEvent::Started);
    log::info!("Run started");
}

/// Advance a running session by `dt` seconds.
///
/// On the idle screen only the player moves, so a hop there still lands.
/// A finished run stays frozen until `start`.
pub fn tick(state: &mut GameState, settings: &Settings, dt: f32) {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    match state.phase {
        SessionPhase::Running => {}
        SessionPhase::Idle => {
            state.physics.advance(dt);
            return;
        }
        SessionPhase::GameOver => return,
    }
    state.time_ticks += 1;

    state.physics.advance(dt);

    let speed = scroll_speed(settings.scroll_base_speed(), state.distance);
    state.spawner.advance(dt, speed);

    let player = state.physics.player.rect();
    if state.spawner.obstacles.iter().any(|o| rect_overlap(&player, &o.rect())) {
        state.phase = SessionPhase::GameOver;
        state.events.push(GameEvent::GameOver {
            score: state.score,
            distance: state.distance,
        });
        log::info!("Game over: score {}, distance {}", state.score, state.distance);
        return;
    }

    for coin in state.spawner.coins.iter_mut().filter(|c| !c.collected) {
        if circle_rect_overlap(&coin.circle(), &player) {
            coin.collected = true;
            state.score += COIN_VALUE;
            state.events.push(GameEvent::CoinCollected { score: state.score });
        }
    }

    state.elapsed_ms += dt as f64 * 1000.0;
    state.distance = (state.elapsed_ms / MS_PER_DISTANCE).floor() as u64;

    let viewport = state.viewport();
    let ground_y = state.physics.ground_y();
    if let Some(kind) = state.spawner.maybe_spawn_obstacle(
        state.elapsed_ms,
        settings.spacing_percent(),
        viewport.width,
        ground_y,
        &state.physics.player,
    ) {
        state.events.push(GameEvent::ObstacleSpawned { kind });
    }
}

/// Jump height actually requested from the integrator.
///
/// The configured height is compensated for small viewports, then capped so
/// the apex stays a safety margin below the billboards.
pub fn jump_height_for(state: &GameState, settings: &Settings) -> f32 {
    let viewport = state.viewport();
    let used_scale = if settings.width_scale {
        viewport.width / WIDE_REFERENCE_WIDTH
    } else {
        state.physics.scale().physics_scale
    };

    let mut desired = settings.jump_height();
    if used_scale > 0.0 && used_scale < 1.0 {
        desired /= used_scale;
    }

    let rest_top = state.physics.ground_y() - state.physics.player.size.y;
    let clearance = billboard_bottom(viewport, settings.billboard_offset()) + BILLBOARD_SAFETY_MARGIN;
    let cap = (rest_top - clearance).max(MIN_JUMP_HEIGHT);
    desired.min(cap)
}

/// Jump if grounded. Allowed while idle or running; refused after game over.
pub fn jump(state: &mut GameState, settings: &Settings) -> bool {
    if state.phase == SessionPhase::GameOver {
        return false;
    }
    let height = jump_height_for(state, settings);
    let jumped = state.physics.jump(height);
    if jumped {
        state.events.push(GameEvent::Jumped {
            velocity: state.physics.player.vy,
        });
    }
    jumped
}
