//! Platform layer
//!
//! Glue between the simulation and whatever drives it:
//! - `FrameClock`: wall-clock timestamps -> frame dt
//! - `ChangeEvent`: configuration/asset/resize notifications
//! - `Game`: the frame driver owning store, settings, session and ledger
//! - `web`: wasm-bindgen handle for the browser (wasm32 only)

mod game;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::{FinishedRun, Game};

use crate::consts::MAX_FRAME_DT;
use crate::sim::Viewport;

/// Notifications from the configuration/asset collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChangeEvent {
    /// Settings were written to the store, re-read them
    SettingsChanged,
    /// Billboard/background images changed, re-fetch handles
    AssetsChanged,
    /// Viewport size changed (applied immediately)
    Resized(Viewport),
}

/// Turns repaint timestamps into simulation dt
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous frame, clamped to `MAX_FRAME_DT`.
    ///
    /// The first frame yields 0; a clock going backwards yields 0.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) if now_ms.is_finite() => ((now_ms - last) / 1000.0).max(0.0) as f32,
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.last_ms = Some(now_ms);
        }
        if dt > MAX_FRAME_DT {
            log::debug!("Clamping frame dt {:.3}s to {:.3}s", dt, MAX_FRAME_DT);
            MAX_FRAME_DT
        } else {
            dt
        }
    }

    /// Forget the previous timestamp (e.g. after the page was hidden)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
