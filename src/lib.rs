//! Meadow Runner - a side-scrolling runner game core
//!
//! Core modules:
//! - `sim`: Simulation (scale, physics, collisions, spawning, session loop)
//! - `settings`: Tuning snapshot read from the key-value store
//! - `highscores`: Bounded high-score ledger
//! - `persistence`: Key-value store abstraction (LocalStorage on web)
//! - `platform`: Frame clock, change events and the frame driver

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::{ScoreEntry, ScoreLedger};
pub use persistence::{KeyValueStore, MemoryStore, StoreError};
pub use platform::{ChangeEvent, FrameClock, Game};
pub use settings::{AssetHandles, Settings};

/// Game configuration constants
pub mod consts {
    /// Reference viewport height for physics scaling
    pub const BASE_HEIGHT: f32 = 720.0;
    /// Reference viewport width for the gravity curve and narrow-layout cutoff
    pub const BASE_WIDTH: f32 = 900.0;
    /// Reference width for obstacle sizing and width-based jump scaling
    pub const WIDE_REFERENCE_WIDTH: f32 = 1280.0;

    /// Physics scale never drops below this, keeps small viewports playable
    pub const MIN_PHYSICS_SCALE: f32 = 0.85;
    /// Exponent of the width -> gravity multiplier curve
    pub const GRAVITY_CURVE_EXP: f32 = 2.0;
    /// Baseline gravity (pixels/s²)
    pub const BASE_GRAVITY: f32 = 2000.0;
    /// Below this the effective gravity counts as disabled
    pub const GRAVITY_EPSILON: f32 = 0.0001;

    /// Ground line as a fraction of viewport height
    pub const GROUND_FRACTION: f32 = 0.72;
    /// Ground fraction on narrow viewports (< BASE_WIDTH)
    pub const GROUND_FRACTION_NARROW: f32 = 0.78;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 44.0;
    pub const PLAYER_HEIGHT: f32 = 64.0;
    /// Player x as a fraction of viewport width
    pub const PLAYER_X_FRACTION: f32 = 0.09;

    /// Jumps never target less than this (pixels)
    pub const MIN_JUMP_HEIGHT: f32 = 8.0;
    /// Clearance kept between the jump apex and the billboards' bottom edge
    pub const BILLBOARD_SAFETY_MARGIN: f32 = 12.0;

    /// Obstacle sizes (before width scaling)
    pub const ROCK_SIZE: (f32, f32) = (48.0, 36.0);
    pub const BOX_SIZE: (f32, f32) = (52.0, 52.0);
    /// Obstacles sit this far above the ground line
    pub const OBSTACLE_GROUND_OFFSET: f32 = 28.0;
    /// Probability an obstacle is a rock (otherwise a box)
    pub const ROCK_CHANCE: f64 = 0.7;

    /// Coin defaults
    pub const COIN_RADIUS: f32 = 12.0;
    pub const COIN_CHANCE: f64 = 0.45;
    /// Coins spawn this far ahead of their obstacle
    pub const COIN_LEAD: f32 = 140.0;
    /// Coin center sits this far above the player's feet
    pub const COIN_FOOT_OFFSET: f32 = 36.0;
    pub const COIN_VALUE: u64 = 100;

    /// Entities are culled once their right edge passes this x
    pub const CULL_X: f32 = -50.0;

    /// Distance counter ticks once per this many milliseconds
    pub const MS_PER_DISTANCE: f64 = 100.0;

    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}
