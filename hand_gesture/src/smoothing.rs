//! Hand position estimate: camera → scene mapping plus an exponential
//! moving average.
//!
//! The reference point is the middle-finger MCP (landmark 9), which moves
//! with the palm and barely with the fingers.

use crate::landmarks::Point3;

/// Smoothing factor.  Larger values follow the hand faster; smaller values
/// smooth harder at the cost of lag.
pub const SMOOTHING_ALPHA: f32 = 0.25;

// Calibration: normalized camera span → scene units.
pub const SCENE_SPAN_X: f32 = 22.0;
pub const SCENE_SPAN_Y: f32 = 16.0;
pub const SCENE_SPAN_Z: f32 = 15.0;

/// Map a normalized landmark into scene space.
///
/// The camera frame centre lands on the scene origin; y and z are flipped so
/// "up in the image" and "toward the camera" become +y and +z.
pub fn to_scene(landmark: Point3) -> Point3 {
    Point3 {
        x:  (landmark.x - 0.5) * SCENE_SPAN_X,
        y: -(landmark.y - 0.5) * SCENE_SPAN_Y,
        z: -landmark.z * SCENE_SPAN_Z,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PositionFilter
// ════════════════════════════════════════════════════════════════════════════

/// Per-axis exponential moving average with a persistent accumulator.
///
/// Starts at the origin and is never reset; frames without a hand simply
/// skip [`update`](Self::update), so the last estimate is held.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionFilter {
    alpha: f32,
    state: Point3,
}

impl Default for PositionFilter {
    fn default() -> Self {
        PositionFilter::new()
    }
}

impl PositionFilter {
    pub fn new() -> Self {
        PositionFilter { alpha: SMOOTHING_ALPHA, state: Point3::ORIGIN }
    }

    /// Filter with a custom factor, clamped to `(0, 1]`.  A non-finite
    /// factor falls back to [`SMOOTHING_ALPHA`].
    pub fn with_alpha(alpha: f32) -> Self {
        let alpha = if alpha.is_finite() {
            alpha.clamp(f32::EPSILON, 1.0)
        } else {
            SMOOTHING_ALPHA
        };
        PositionFilter { alpha, state: Point3::ORIGIN }
    }

    pub fn alpha(&self) -> f32 { self.alpha }

    /// `s ← s + α·(raw − s)`; returns the new estimate.
    ///
    /// A step that would leave the estimate non-finite is dropped and the
    /// previous estimate is kept.
    pub fn update(&mut self, raw: Point3) -> Point3 {
        let next = self.state.lerp(&raw, self.alpha);
        if next.is_finite() {
            self.state = next;
        }
        self.state
    }

    pub fn current(&self) -> Point3 { self.state }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
