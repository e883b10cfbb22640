//! Synthetic hand poses.
//!
//! Builds a plausible upright 21-point hand in normalized camera space.  The
//! simulation source uses it to stand in for a real detector, and the tests
//! use it to produce landmark sets with known finger states.

use crate::classifier::{Finger, FingerStates};
use crate::landmarks::{index, Point3, LANDMARK_COUNT};

/// Wrist offset from the palm centre (image y grows downward).
const WRIST_DROP: f32 = 0.15;
/// Horizontal MCP offsets for index, middle, ring, pinky.
const MCP_SPREAD: [f32; 4] = [-0.045, 0.0, 0.04, 0.08];
const PIP_RISE:   f32 = 0.05;

/// Build a hand whose middle-finger MCP (landmark 9) sits exactly at `palm`
/// and whose fingers are extended or curled per `fingers`.
///
/// All points share `palm.z`.
pub fn synthesize_hand(palm: Point3, fingers: FingerStates) -> Vec<Point3> {
    let Point3 { x, y, z } = palm;
    let at = |dx: f32, dy: f32| Point3::new(x + dx, y + dy, z);

    let mut pts = vec![palm; LANDMARK_COUNT];
    pts[index::WRIST] = at(0.01, WRIST_DROP);

    pts[index::THUMB_CMC] = at(-0.04, 0.11);
    pts[index::THUMB_MCP] = at(-0.07, 0.07);
    pts[index::THUMB_IP]  = at(-0.09, 0.04);
    pts[index::THUMB_TIP] = at(-0.10, 0.01);

    for (finger, dx) in Finger::ALL.iter().zip(MCP_SPREAD) {
        let mcp = finger.base() - 1;
        let dip = finger.tip() - 1;
        pts[mcp]           = at(dx, 0.0);
        pts[finger.base()] = at(dx, -PIP_RISE);
        if fingers.is(*finger) {
            pts[dip]          = at(dx, -0.085);
            pts[finger.tip()] = at(dx, -0.11);
        } else {
            // Folded back over the palm.
            pts[dip]          = at(dx, -0.02);
            pts[finger.tip()] = at(dx, 0.02);
        }
    }

    pts
}
