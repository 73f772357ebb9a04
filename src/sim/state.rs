//! Session state and core simulation types
//!
//! One `GameState` is a complete, independent simulation: player physics,
//! spawned entities, counters and phase. Nothing here is global.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Circle, Rect};
use super::physics::{Physics, PlayerBody};
use super::scale::Viewport;
use super::spawner::Spawner;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Nothing running yet
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Run ended, waits for the next start
    GameOver,
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Rock,
    Box,
}

impl ObstacleKind {
    /// Unscaled (width, height)
    pub fn base_size(&self) -> (f32, f32) {
        match self {
            ObstacleKind::Rock => ROCK_SIZE,
            ObstacleKind::Box => BOX_SIZE,
        }
    }
}

/// A ground obstacle scrolling toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }
}

/// A collectible coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub center: Vec2,
    pub radius: f32,
    pub collected: bool,
}

impl Coin {
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }
}

/// Things that happened during a tick, drained by the frame driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Jumped { velocity: f32 },
    ObstacleSpawned { kind: ObstacleKind },
    CoinCollected { score: u64 },
    GameOver { score: u64, distance: u64 },
}

/// The three fixed billboards hanging above the track
pub fn billboard_rects(viewport: Viewport, billboard_offset: f32) -> [Rect; 3] {
    let vp = viewport.sanitized();
    let w = (vp.width * 0.19).round().max(160.0);
    let h = (vp.height * 0.17).round().max(80.0);
    let margin = (vp.width - w * 3.0) / 4.0;
    let offset = if billboard_offset.is_finite() { billboard_offset } else { 80.0 };
    let y = offset.min((vp.height * 0.3).round()).max(8.0);

    [0.0, 1.0, 2.0].map(|i| Rect::new(margin * (i + 1.0) + w * i, y, w, h))
}

/// Lowest edge of any billboard (largest y)
pub fn billboard_bottom(viewport: Viewport, billboard_offset: f32) -> f32 {
    billboard_rects(viewport, billboard_offset)
        .iter()
        .map(Rect::bottom)
        .fold(f32::MIN, f32::max)
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: SessionPhase,
    pub score: u64,
    pub distance: u64,
    /// Milliseconds of simulated time since `start`
    pub elapsed_ms: f64,
    /// Ticks processed while running
    pub time_ticks: u64,
    pub physics: Physics,
    pub spawner: Spawner,
    /// Pending events (drained by the caller)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle session for a viewport, tuned from `settings`
    pub fn new(viewport: Viewport, settings: &Settings, seed: u64) -> Self {
        let physics = Physics::new(
            viewport,
            settings.min_gravity_mult(),
            settings.gravity_global_mult(),
        );
        let mut state = Self {
            phase: SessionPhase::Idle,
            score: 0,
            distance: 0,
            elapsed_ms: 0.0,
            time_ticks: 0,
            physics,
            spawner: Spawner::new(seed),
            events: Vec::new(),
        };
        state.spawner.seed_initial_coins(&state.physics.player, state.physics.ground_y());
        state
    }

    pub fn player(&self) -> &PlayerBody {
        &self.physics.player
    }

    pub fn viewport(&self) -> Viewport {
        self.physics.viewport()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.spawner.obstacles
    }

    pub fn coins(&self) -> &[Coin] {
        &self.spawner.coins
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Recompute scale and ground for a new viewport without pausing
    pub fn resize(&mut self, viewport: Viewport) {
        self.physics.init(viewport);
        if self.phase == SessionPhase::Idle {
            self.spawner.coins.clear();
            self.spawner.seed_initial_coins(&self.physics.player, self.physics.ground_y());
        }
        log::debug!(
            "Resized to {}x{}, ground at {}",
            self.viewport().width,
            self.viewport().height,
            self.physics.ground_y()
        );
    }

    /// Push gravity tuning from a fresh settings snapshot; position is kept
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.physics.set_scale(self.viewport().height);
        self.physics.set_min_gravity_mult(settings.min_gravity_mult());
        self.physics.set_gravity_global_mult(settings.gravity_global_mult());
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billboard_layout() {
        let rects = billboard_rects(Viewport::new(1280.0, 720.0), 80.0);
        // 0.19 * 1280 = 243.2 -> 243; 0.17 * 720 = 122.4 -> 122
        assert_eq!(rects[0].w, 243.0);
        assert_eq!(rects[0].h, 122.0);
        assert_eq!(rects[0].y, 80.0);
        let margin = (1280.0 - 243.0 * 3.0) / 4.0;
        assert_eq!(rects[0].x, margin);
        assert_eq!(rects[2].x, margin * 3.0 + 243.0 * 2.0);
        assert_eq!(billboard_bottom(Viewport::new(1280.0, 720.0), 80.0), 202.0);
    }

    #[test]
    fn test_billboard_offset_clamped() {
        // Offset is clamped to [8, 0.3 * height]
        let low = billboard_rects(Viewport::new(1280.0, 720.0), -40.0);
        assert_eq!(low[0].y, 8.0);
        let high = billboard_rects(Viewport::new(1280.0, 720.0), 5000.0);
        assert_eq!(high[0].y, 216.0);
    }

    #[test]
    fn test_new_state_is_idle_with_starting_coins() {
        let state = GameState::new(Viewport::new(1280.0, 720.0), &Settings::default(), 7);
        assert_eq!(state.phase, SessionPhase::Idle);
        assert_eq!(state.coins().len(), 3);
        assert!(state.obstacles().is_empty());
        assert!(state.player().on_ground);
    }

    #[test]
    fn test_resize_keeps_session_running() {
        let mut state = GameState::new(Viewport::new(1280.0, 720.0), &Settings::default(), 7);
        state.phase = SessionPhase::Running;
        state.score = 300;
        state.resize(Viewport::new(600.0, 900.0));
        assert_eq!(state.phase, SessionPhase::Running);
        assert_eq!(state.score, 300);
        assert_eq!(state.physics.ground_y(), (900.0f32 * 0.78).round());
        assert_eq!(state.player().pos.y, state.physics.ground_y() - PLAYER_HEIGHT);
    }
}
