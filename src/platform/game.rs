//! Frame driver
//!
//! Owns everything a running page needs: the store, the settings snapshot,
//! asset handles, one simulation and the score ledger. The host calls
//! `frame` from its repaint callback and renders from `state()`.

use crate::highscores::{ScoreEntry, ScoreLedger};
use crate::persistence::{KeyValueStore, StoreError};
use crate::settings::{AssetHandles, Settings};
use crate::sim::{self, GameEvent, GameState, SessionPhase, Telemetry, Viewport};

use super::{ChangeEvent, FrameClock};

/// Score and distance of the last finished run, waiting to be saved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishedRun {
    pub score: u64,
    pub distance: u64,
}

pub struct Game<S: KeyValueStore> {
    store: S,
    settings: Settings,
    assets: AssetHandles,
    state: GameState,
    ledger: ScoreLedger,
    clock: FrameClock,
    pending: Vec<ChangeEvent>,
    finished: Option<FinishedRun>,
}

impl<S: KeyValueStore> Game<S> {
    pub fn new(store: S, viewport: Viewport, seed: u64) -> Self {
        let settings = Settings::load(&store);
        let assets = AssetHandles::load(&store);
        let ledger = ScoreLedger::load(&store);
        let state = GameState::new(viewport, &settings, seed);
        log::info!(
            "Game initialized at {}x{} with seed {}",
            state.viewport().width,
            state.viewport().height,
            seed
        );
        Self {
            store,
            settings,
            assets,
            state,
            ledger,
            clock: FrameClock::new(),
            pending: Vec::new(),
            finished: None,
        }
    }

    /// Deliver a change notification.
    ///
    /// Resizes apply at once; settings/asset refreshes are queued and applied
    /// at the start of the next frame.
    pub fn notify(&mut self, event: ChangeEvent) {
        match event {
            ChangeEvent::Resized(viewport) => self.state.resize(viewport),
            other => {
                if !self.pending.contains(&other) {
                    self.pending.push(other);
                }
            }
        }
    }

    fn apply_pending(&mut self) {
        for event in std::mem::take(&mut self.pending) {
            match event {
                ChangeEvent::SettingsChanged => {
                    self.settings = Settings::load(&self.store);
                    self.state.apply_settings(&self.settings);
                    log::info!("Settings refreshed");
                }
                ChangeEvent::AssetsChanged => {
                    self.assets = AssetHandles::load(&self.store);
                    log::info!("Assets refreshed");
                }
                ChangeEvent::Resized(viewport) => self.state.resize(viewport),
            }
        }
    }

    /// Run one repaint: apply pending changes, then tick by the wall-clock delta
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        self.apply_pending();
        let dt = self.clock.advance(now_ms);
        sim::tick(&mut self.state, &self.settings, dt);

        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::GameOver { score, distance } = *event {
                self.finished = Some(FinishedRun { score, distance });
            }
        }
        events
    }

    /// Start (or restart) a run
    pub fn start(&mut self) {
        self.finished = None;
        sim::start(&mut self.state);
    }

    pub fn jump(&mut self) -> bool {
        sim::jump(&mut self.state, &self.settings)
    }

    /// Record the last finished run under `name`. Returns the rank achieved.
    pub fn save_score(&mut self, name: &str, timestamp: f64) -> Option<usize> {
        let run = self.finished.take()?;
        let entry = ScoreEntry::new(name, run.score, run.distance, timestamp);
        match self.ledger.record(&mut self.store, entry) {
            Ok(rank) => rank,
            Err(e) => {
                log::warn!("Could not save high score: {}", e);
                None
            }
        }
    }

    pub fn clear_scores(&mut self) -> Result<(), StoreError> {
        self.ledger.clear(&mut self.store)
    }

    /// Change settings, persist them and schedule a refresh for the next frame
    pub fn update_settings(&mut self, edit: impl FnOnce(&mut Settings)) -> Result<(), StoreError> {
        let mut next = self.settings.clone();
        edit(&mut next);
        next.save(&mut self.store)?;
        self.notify(ChangeEvent::SettingsChanged);
        Ok(())
    }

    /// Telemetry for the overlay, only when it is switched on
    pub fn telemetry(&self) -> Option<Telemetry> {
        self.settings
            .show_physics
            .then(|| self.state.physics.telemetry())
    }

    /// Forget the last frame time, so the next frame is a zero step
    pub fn pause_clock(&mut self) {
        self.clock.reset();
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn assets(&self) -> &AssetHandles {
        &self.assets
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn finished_run(&self) -> Option<FinishedRun> {
        self.finished
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
