//! Hand landmark geometry and the validating boundary for detector output.
//!
//! Detectors hand us 21 normalized points per hand (x, y in `[0, 1]` of the
//! camera frame, z as relative depth).  Nothing downstream trusts that shape
//! until it has passed through [`LandmarkSet::from_points`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of landmarks in one hand.
pub const LANDMARK_COUNT: usize = 21;

/// How far outside `[0, 1]` an x or y coordinate may drift before the whole
/// sample is rejected.  Detectors overshoot a little when the hand is partly
/// out of frame.
pub const COORD_MARGIN: f32 = 0.5;

/// Largest relative depth accepted.  Detector depth is wrist-relative and
/// stays well under this for any hand in frame.
pub const DEPTH_LIMIT: f32 = 1.0;

/// Landmark indices of the 21-point hand topology.
pub mod index {
    pub const WRIST:      usize = 0;
    pub const THUMB_CMC:  usize = 1;
    pub const THUMB_MCP:  usize = 2;
    pub const THUMB_IP:   usize = 3;
    pub const THUMB_TIP:  usize = 4;
    pub const INDEX_MCP:  usize = 5;
    pub const INDEX_PIP:  usize = 6;
    pub const INDEX_DIP:  usize = 7;
    pub const INDEX_TIP:  usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP:   usize = 13;
    pub const RING_PIP:   usize = 14;
    pub const RING_DIP:   usize = 15;
    pub const RING_TIP:   usize = 16;
    pub const PINKY_MCP:  usize = 17;
    pub const PINKY_PIP:  usize = 18;
    pub const PINKY_DIP:  usize = 19;
    pub const PINKY_TIP:  usize = 20;
}

// ════════════════════════════════════════════════════════════════════════════
// Point3
// ════════════════════════════════════════════════════════════════════════════

/// A 3D coordinate.  Used both for normalized camera-space landmarks and for
/// scene-space positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Point3 { x, y, z }
    }

    /// Euclidean distance in 3D.
    pub fn distance(&self, other: &Point3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Move `t` of the way toward `target` (t = 0 → self, t = 1 → target).
    pub fn lerp(&self, target: &Point3, t: f32) -> Point3 {
        Point3 {
            x: self.x + t * (target.x - self.x),
            y: self.y + t * (target.y - self.y),
            z: self.z + t * (target.z - self.z),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSet
// ════════════════════════════════════════════════════════════════════════════

/// Why a raw sample was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LandmarkError {
    #[error("expected 21 landmarks, got {0}")]
    WrongCount(usize),

    #[error("landmark {0} has a non-finite coordinate")]
    NonFinite(usize),

    #[error("landmark {index} lies outside the camera frame ({x:.3}, {y:.3}, {z:.3})")]
    OutOfRange { index: usize, x: f32, y: f32, z: f32 },
}

/// One hand's 21 landmarks, validated.
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkSet {
    points: [Point3; LANDMARK_COUNT],
}

impl LandmarkSet {
    /// Validate an untrusted sample.
    pub fn from_points(points: &[Point3]) -> Result<Self, LandmarkError> {
        if points.len() != LANDMARK_COUNT {
            return Err(LandmarkError::WrongCount(points.len()));
        }

        let lo = -COORD_MARGIN;
        let hi = 1.0 + COORD_MARGIN;
        let mut out = [Point3::ORIGIN; LANDMARK_COUNT];
        for (i, p) in points.iter().enumerate() {
            if !p.is_finite() {
                return Err(LandmarkError::NonFinite(i));
            }
            if p.x < lo || p.x > hi || p.y < lo || p.y > hi || p.z.abs() > DEPTH_LIMIT {
                return Err(LandmarkError::OutOfRange { index: i, x: p.x, y: p.y, z: p.z });
            }
            out[i] = *p;
        }

        Ok(LandmarkSet { points: out })
    }

    /// Landmark at `idx` (see [`index`]).  Panics if `idx >= 21`.
    pub fn get(&self, idx: usize) -> Point3 {
        self.points[idx]
    }

    pub fn wrist(&self) -> Point3 {
        self.points[index::WRIST]
    }

    pub fn points(&self) -> &[Point3; LANDMARK_COUNT] {
        &self.points
    }
}

impl TryFrom<&[Point3]> for LandmarkSet {
    type Error = LandmarkError;

    fn try_from(points: &[Point3]) -> Result<Self, Self::Error> {
        LandmarkSet::from_points(points)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
