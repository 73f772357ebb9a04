//! Browser bindings
//!
//! The page's canvas code owns rendering and the requestAnimationFrame loop;
//! it calls into `WebGame` each frame and draws from `snapshot()`.

use wasm_bindgen::prelude::*;

use super::{ChangeEvent, Game, now_ms};
use crate::persistence::{KeyValueStore, LocalStorage, MemoryStore};
use crate::sim::{GameEvent, SessionPhase, Viewport};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Meadow Runner core loaded");
}

fn open_store() -> Box<dyn KeyValueStore> {
    match LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("{} - scores and settings will not persist", e);
            Box::new(MemoryStore::new())
        }
    }
}

#[wasm_bindgen]
pub struct WebGame {
    inner: Game<Box<dyn KeyValueStore>>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebGame {
        let seed = js_sys::Date::now() as u64;
        Self {
            inner: Game::new(open_store(), Viewport::new(width, height), seed),
        }
    }

    /// Call from the repaint callback with its timestamp.
    /// Returns true when this frame ended the run.
    pub fn frame(&mut self, now: f64) -> bool {
        self.inner
            .frame(now)
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. }))
    }

    pub fn start(&mut self) {
        self.inner.start();
    }

    pub fn jump(&mut self) -> bool {
        self.inner.jump()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.inner
            .notify(ChangeEvent::Resized(Viewport::new(width, height)));
    }

    #[wasm_bindgen(js_name = settingsChanged)]
    pub fn settings_changed(&mut self) {
        self.inner.notify(ChangeEvent::SettingsChanged);
    }

    #[wasm_bindgen(js_name = assetsChanged)]
    pub fn assets_changed(&mut self) {
        self.inner.notify(ChangeEvent::AssetsChanged);
    }

    /// Tab hidden: the next frame after return is a zero step
    #[wasm_bindgen(js_name = pauseClock)]
    pub fn pause_clock(&mut self) {
        self.inner.pause_clock();
    }

    pub fn score(&self) -> f64 {
        self.inner.state().score as f64
    }

    pub fn distance(&self) -> f64 {
        self.inner.state().distance as f64
    }

    pub fn phase(&self) -> String {
        match self.inner.phase() {
            SessionPhase::Idle => "idle",
            SessionPhase::Running => "running",
            SessionPhase::GameOver => "game-over",
        }
        .to_string()
    }

    /// Save the finished run; returns the rank or 0 if it didn't place
    #[wasm_bindgen(js_name = saveScore)]
    pub fn save_score(&mut self, name: &str) -> u32 {
        self.inner
            .save_score(name, now_ms())
            .map(|r| r as u32)
            .unwrap_or(0)
    }

    #[wasm_bindgen(js_name = clearScores)]
    pub fn clear_scores(&mut self) {
        if let Err(e) = self.inner.clear_scores() {
            log::warn!("Could not clear high scores: {}", e);
        }
    }

    /// High scores as JSON, filtered by name
    pub fn scores(&self, filter: Option<String>) -> String {
        let list = self.inner.ledger().query(filter.as_deref());
        serde_json::to_string(&list).unwrap_or_else(|_| "[]".to_string())
    }

    /// Full render snapshot (player, obstacles, coins, counters) as JSON
    pub fn snapshot(&self) -> String {
        serde_json::to_string(self.inner.state()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Physics overlay readout as JSON, or null when disabled
    pub fn telemetry(&self) -> Option<String> {
        self.inner
            .telemetry()
            .and_then(|t| serde_json::to_string(&t).ok())
    }

    /// Asset handles as JSON
    pub fn assets(&self) -> String {
        serde_json::to_string(self.inner.assets()).unwrap_or_else(|_| "{}".to_string())
    }
}
