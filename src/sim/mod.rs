//! Simulation module
//!
//! All gameplay logic lives here:
//! - No rendering or DOM dependencies
//! - No globals: every simulation is one `GameState` value
//! - Settings come in as an explicit snapshot
//! - Seeded RNG only

pub mod collision;
pub mod physics;
pub mod scale;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Circle, Rect, circle_rect_overlap, rect_overlap};
pub use physics::{Physics, PlayerBody, Telemetry};
pub use scale::{ScaleState, Viewport};
pub use spawner::{Spawner, min_interval_ms, scroll_speed};
pub use state::{Coin, GameEvent, GameState, Obstacle, ObstacleKind, SessionPhase, billboard_rects};
pub use tick::{jump, jump_height_for, start, tick};
