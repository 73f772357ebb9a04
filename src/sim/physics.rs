//! Vertical player physics
//!
//! Semi-implicit Euler integration of the player's vertical motion against a
//! ground line, with jump impulses derived from a desired apex height under
//! the current effective gravity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::scale::{self, ScaleState, Viewport};
use crate::consts::*;

/// The runner. Only moves vertically; x is fixed per viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Top-left corner (pixels)
    pub pos: Vec2,
    /// Width, height (pixels)
    pub size: Vec2,
    /// Vertical velocity (pixels/s, positive is down)
    pub vy: f32,
    pub on_ground: bool,
}

impl Default for PlayerBody {
    fn default() -> Self {
        Self {
            pos: Vec2::new(120.0, 0.0),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            vy: 0.0,
            on_ground: true,
        }
    }
}

impl PlayerBody {
    /// Bounding box for collision tests
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// y of the player's top edge when standing on `ground_y`
    #[inline]
    pub fn resting_y(&self, ground_y: f32) -> f32 {
        ground_y - self.size.y
    }
}

/// Diagnostic readout for the physics overlay. Never fed back into the sim.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Telemetry {
    /// Acceleration applied during the last advance (pixels/s²)
    pub accel: Vec2,
    pub velocity: Vec2,
    pub position: Vec2,
}

/// Physics integrator owning the player, the ground line and the scale state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Physics {
    pub player: PlayerBody,
    ground_y: f32,
    viewport: Viewport,
    scale: ScaleState,
    gravity_enabled: bool,
    telemetry: Telemetry,
}

impl Physics {
    /// Create an integrator for a viewport with the given gravity tuning
    pub fn new(viewport: Viewport, min_gravity_mult: f32, gravity_global_mult: f32) -> Self {
        let mut physics = Self {
            player: PlayerBody::default(),
            ground_y: 0.0,
            viewport,
            scale: scale::resolve(viewport, min_gravity_mult, gravity_global_mult),
            gravity_enabled: true,
            telemetry: Telemetry::default(),
        };
        physics.init(viewport);
        physics
    }

    /// Re-resolve scale and ground for a viewport and put the player on the ground
    pub fn init(&mut self, viewport: Viewport) {
        self.viewport = viewport.sanitized();
        self.scale = scale::resolve(
            self.viewport,
            self.scale.min_gravity_mult,
            self.scale.gravity_global_mult,
        );
        self.ground_y = scale::ground_y(self.viewport);
        self.reset_player();
        self.telemetry.accel = Vec2::new(0.0, self.effective_gravity());
    }

    /// Place the player at rest on the ground line
    pub fn reset_player(&mut self) {
        self.player.pos.x = (self.viewport.width * PLAYER_X_FRACTION).round();
        self.player.pos.y = self.player.resting_y(self.ground_y);
        self.player.vy = 0.0;
        self.player.on_ground = true;
    }

    /// Update the height-derived physics scale, keeping the player where it is
    pub fn set_scale(&mut self, height: f32) {
        self.scale.physics_scale = scale::physics_scale_for_height(height);
        self.telemetry.accel.y = self.effective_gravity();
    }

    pub fn set_min_gravity_mult(&mut self, v: f32) {
        if !v.is_finite() {
            return;
        }
        self.scale.min_gravity_mult = scale::clamp_min_gravity(v);
        self.scale.gravity_multiplier =
            scale::gravity_multiplier_for_width(self.viewport.width, self.scale.min_gravity_mult);
        self.telemetry.accel.y = self.effective_gravity();
    }

    pub fn set_gravity_global_mult(&mut self, v: f32) {
        if !v.is_finite() {
            return;
        }
        self.scale.gravity_global_mult = v.max(0.0);
        self.telemetry.accel.y = self.effective_gravity();
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.gravity_enabled = enabled;
        self.telemetry.accel.y = self.effective_gravity();
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled
    }

    /// Base gravity before any scaling (0 when disabled)
    #[inline]
    pub fn base_gravity(&self) -> f32 {
        if self.gravity_enabled { BASE_GRAVITY } else { 0.0 }
    }

    /// Fully scaled gravity (pixels/s²)
    #[inline]
    pub fn effective_gravity(&self) -> f32 {
        self.base_gravity() * self.scale.gravity_factor()
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scale(&self) -> &ScaleState {
        &self.scale
    }

    pub fn telemetry(&self) -> Telemetry {
        self.telemetry
    }

    /// Advance the player by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let g = self.effective_gravity();
        let rest = self.player.resting_y(self.ground_y);

        self.player.vy += g * dt;
        self.player.pos.y += self.player.vy * dt;

        // A jump issued this frame still sits exactly on the ground line
        let landed = self.player.pos.y > rest || (self.player.pos.y == rest && self.player.vy >= 0.0);
        if landed {
            self.player.pos.y = rest;
            self.player.vy = 0.0;
            self.player.on_ground = true;
        }

        self.telemetry = Telemetry {
            accel: Vec2::new(0.0, g),
            velocity: Vec2::new(0.0, self.player.vy),
            position: self.player.pos,
        };
    }

    /// Jump so the apex sits `desired_height` pixels above the ground.
    ///
    /// v0 = sqrt(2 * g * h). Returns false (and changes nothing) when airborne.
    pub fn jump(&mut self, desired_height: f32) -> bool {
        if !self.player.on_ground {
            return false;
        }
        let h = desired_height.max(MIN_JUMP_HEIGHT);
        let g = self.effective_gravity();

        let v0 = if g <= GRAVITY_EPSILON {
            // No gravity means no finite apex; use a small fixed hop
            (2.0 * 9.8 * h).sqrt() * 0.1
        } else {
            (2.0 * g * h).sqrt()
        };

        self.player.vy = -v0;
        self.player.on_ground = false;
        self.telemetry.velocity.y = self.player.vy;
        true
    }

    /// Apex height of the current upward velocity under the current gravity
    pub fn predicted_apex(&self) -> Option<f32> {
        let g = self.effective_gravity();
        if g <= GRAVITY_EPSILON || self.player.vy >= 0.0 {
            return None;
        }
        Some(self.player.vy * self.player.vy / (2.0 * g))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn physics() -> Physics {
        Physics::new(Viewport::new(1280.0, 720.0), 0.45, 1.0)
    }

    #[test]
    fn test_init_places_player_on_ground() {
        let p = physics();
        assert_eq!(p.ground_y(), 518.0);
        assert_eq!(p.player.pos.x, 115.0);
        assert_eq!(p.player.pos.y, 518.0 - PLAYER_HEIGHT);
        assert!(p.player.on_ground);
        assert_eq!(p.effective_gravity(), BASE_GRAVITY);
    }

    #[test]
    fn test_jump_airborne_is_noop() {
        let mut p = physics();
        assert!(p.jump(120.0));
        p.advance(1.0 / 60.0);
        let before = p.player;
        assert!(!p.jump(300.0));
        assert_eq!(p.player, before);
    }

    #[test]
    fn test_jump_reaches_desired_apex() {
        let mut p = physics();
        assert!(p.jump(120.0));
        assert!(!p.player.on_ground);
        assert!(p.player.vy < 0.0);
        let apex = p.predicted_apex().unwrap();
        assert!((apex - 120.0).abs() < 1e-2);
    }

    #[test]
    fn test_jump_height_floor() {
        let mut p = physics();
        p.jump(-50.0);
        let apex = p.predicted_apex().unwrap();
        assert!((apex - MIN_JUMP_HEIGHT).abs() < 1e-3);
    }

    #[test]
    fn test_jump_without_gravity_uses_fallback() {
        let mut p = physics();
        p.set_gravity_enabled(false);
        assert_eq!(p.effective_gravity(), 0.0);
        assert!(p.jump(120.0));
        assert!(p.player.vy.is_finite());
        assert!(p.player.vy < 0.0);
        assert!(p.predicted_apex().is_none());
    }

    #[test]
    fn test_full_jump_lands() {
        let mut p = physics();
        let rest = p.player.pos.y;
        p.jump(120.0);
        let mut highest = rest;
        for _ in 0..240 {
            p.advance(1.0 / 120.0);
            highest = highest.min(p.player.pos.y);
        }
        assert!(p.player.on_ground);
        assert_eq!(p.player.pos.y, rest);
        // Discrete integration lands within a few pixels of the analytic apex
        assert!((rest - highest - 120.0).abs() < 4.0);
    }

    #[test]
    fn test_live_tuning_keeps_position() {
        let mut p = Physics::new(Viewport::new(450.0, 720.0), 0.45, 1.0);
        p.jump(120.0);
        p.advance(0.05);
        let pos = p.player.pos;
        p.set_min_gravity_mult(0.2);
        p.set_gravity_global_mult(0.5);
        p.set_scale(1440.0);
        assert_eq!(p.player.pos, pos);
        let expected = BASE_GRAVITY * (0.2 + 0.8 * 0.25) * 0.5 * 2.0;
        assert!((p.effective_gravity() - expected).abs() < 1e-2);
    }

    #[test]
    fn test_telemetry_tracks_advance() {
        let mut p = physics();
        p.jump(100.0);
        p.advance(0.01);
        let t = p.telemetry();
        assert_eq!(t.accel.y, p.effective_gravity());
        assert_eq!(t.velocity.y, p.player.vy);
        assert_eq!(t.position, p.player.pos);
    }

    proptest! {
        #[test]
        fn test_advance_never_sinks_below_ground(
            dts in proptest::collection::vec(0.0f32..0.5, 1..60),
            jump_at in 0usize..60,
            height in 0.0f32..600.0,
        ) {
            let mut p = physics();
            let rest = p.player.resting_y(p.ground_y());
            for (i, dt) in dts.iter().enumerate() {
                if i == jump_at {
                    p.jump(height);
                }
                p.advance(*dt);
                prop_assert!(p.player.pos.y <= rest);
                if p.player.on_ground {
                    prop_assert_eq!(p.player.vy, 0.0);
                }
            }
        }

        #[test]
        fn test_apex_matches_requested_height(
            height in 8.0f32..800.0,
            width in 200.0f32..2560.0,
            vh in 200.0f32..1600.0,
            global in 0.1f32..3.0,
        ) {
            let mut p = Physics::new(Viewport::new(width, vh), 0.45, global);
            prop_assert!(p.jump(height));
            let apex = p.predicted_apex().unwrap();
            prop_assert!((apex - height).abs() <= height * 1e-4 + 1e-3);
        }
    }
}
