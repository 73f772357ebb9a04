//! Viewport-adaptive scale resolution
//!
//! Converts raw viewport pixels into the physics scale factor, the
//! width-based gravity multiplier and the ground line fraction.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: WIDE_REFERENCE_WIDTH,
            height: BASE_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Replace absent (zero, negative, non-finite) dimensions with reference values
    pub fn sanitized(self) -> Self {
        Self {
            width: positive_or(self.width, BASE_WIDTH),
            height: positive_or(self.height, BASE_HEIGHT),
        }
    }
}

#[inline]
fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

/// Resolved scale parameters feeding the physics integrator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleState {
    /// Height-derived scale, never below `MIN_PHYSICS_SCALE`
    pub physics_scale: f32,
    /// Width-derived gravity multiplier in [min_gravity_mult, 1]
    pub gravity_multiplier: f32,
    /// Global gravity tuning
    pub gravity_global_mult: f32,
    /// Floor of the gravity multiplier curve
    pub min_gravity_mult: f32,
}

impl Default for ScaleState {
    fn default() -> Self {
        resolve(Viewport::default(), 0.45, 1.0)
    }
}

impl ScaleState {
    /// Product of every multiplier applied to the base gravity
    #[inline]
    pub fn gravity_factor(&self) -> f32 {
        self.gravity_multiplier * self.gravity_global_mult * self.physics_scale
    }
}

/// physics_scale = max(MIN_PHYSICS_SCALE, height / BASE_HEIGHT)
pub fn physics_scale_for_height(height: f32) -> f32 {
    let height = positive_or(height, BASE_HEIGHT);
    (height / BASE_HEIGHT).max(MIN_PHYSICS_SCALE)
}

/// Smooth ease-in of gravity as the viewport narrows:
/// min + (1 - min) * t^2 with t = clamp(width / BASE_WIDTH, 0, 1)
pub fn gravity_multiplier_for_width(width: f32, min_gravity_mult: f32) -> f32 {
    let min = clamp_min_gravity(min_gravity_mult);
    let width = positive_or(width, BASE_WIDTH);
    let t = (width / BASE_WIDTH).clamp(0.0, 1.0);
    if t < 1.0 {
        (min + (1.0 - min) * t.powf(GRAVITY_CURVE_EXP)).max(min)
    } else {
        1.0
    }
}

/// Narrow viewports get a lower ground line to keep jump clearance
pub fn ground_fraction(width: f32) -> f32 {
    if positive_or(width, BASE_WIDTH) < BASE_WIDTH {
        GROUND_FRACTION_NARROW
    } else {
        GROUND_FRACTION
    }
}

/// Ground line y (pixels) for a viewport
pub fn ground_y(viewport: Viewport) -> f32 {
    let vp = viewport.sanitized();
    (vp.height * ground_fraction(vp.width)).round()
}

#[inline]
pub(crate) fn clamp_min_gravity(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

/// Resolve every scale parameter for a viewport
pub fn resolve(viewport: Viewport, min_gravity_mult: f32, gravity_global_mult: f32) -> ScaleState {
    let min_gravity_mult = clamp_min_gravity(min_gravity_mult);
    ScaleState {
        physics_scale: physics_scale_for_height(viewport.height),
        gravity_multiplier: gravity_multiplier_for_width(viewport.width, min_gravity_mult),
        gravity_global_mult: if gravity_global_mult.is_finite() {
            gravity_global_mult.max(0.0)
        } else {
            1.0
        },
        min_gravity_mult,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_physics_scale_floor() {
        assert_eq!(physics_scale_for_height(720.0), 1.0);
        assert_eq!(physics_scale_for_height(1440.0), 2.0);
        assert_eq!(physics_scale_for_height(300.0), MIN_PHYSICS_SCALE);
        // Absent height falls back to the reference
        assert_eq!(physics_scale_for_height(0.0), 1.0);
    }

    #[test]
    fn test_gravity_multiplier_curve() {
        assert_eq!(gravity_multiplier_for_width(900.0, 0.45), 1.0);
        assert_eq!(gravity_multiplier_for_width(1920.0, 0.45), 1.0);

        // Half width: 0.45 + 0.55 * 0.25
        let half = gravity_multiplier_for_width(450.0, 0.45);
        assert!((half - 0.5875).abs() < 1e-5);

        // Tiny widths approach the floor
        let tiny = gravity_multiplier_for_width(1.0, 0.45);
        assert!(tiny >= 0.45 && tiny < 0.46);
    }

    #[test]
    fn test_ground_fraction() {
        assert_eq!(ground_fraction(899.0), GROUND_FRACTION_NARROW);
        assert_eq!(ground_fraction(900.0), GROUND_FRACTION);
        assert_eq!(ground_fraction(0.0), GROUND_FRACTION);
        assert_eq!(ground_y(Viewport::new(1280.0, 720.0)), 518.0);
        assert_eq!(ground_y(Viewport::new(400.0, 800.0)), 624.0);
    }

    #[test]
    fn test_resolve_degenerate_viewport() {
        let scale = resolve(Viewport::new(0.0, f32::NAN), 0.45, 1.0);
        assert_eq!(scale.physics_scale, 1.0);
        assert_eq!(scale.gravity_multiplier, 1.0);
        assert!(scale.gravity_factor() > 0.0);
    }

    proptest! {
        #[test]
        fn test_gravity_multiplier_monotonic_and_bounded(
            a in 0.0f32..4000.0,
            b in 0.0f32..4000.0,
            min in 0.0f32..=1.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let m_lo = gravity_multiplier_for_width(lo.max(0.5), min);
            let m_hi = gravity_multiplier_for_width(hi.max(0.5), min);
            prop_assert!(m_lo <= m_hi + 1e-6);
            prop_assert!(m_lo >= min - 1e-6 && m_lo <= 1.0);
            prop_assert!(m_hi >= min - 1e-6 && m_hi <= 1.0);
        }
    }
}
