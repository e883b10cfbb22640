//! # hand_gesture
//!
//! Turns per-frame hand landmark samples into a stable control signal: a
//! finger count plus a smoothed 3D hand position, applied to three
//! remembered "slots" that persist across frames.
//!
//! ## Finger pattern → slot mapping
//!
//! | Extended fingers | Count | Slot |
//! |---|---|---|
//! | index | 1 | 0 |
//! | index + middle | 2 | 1 |
//! | index + middle + ring | 3 | 2 |
//! | index + middle + ring + pinky | 4 | — (reserved) |
//! | anything else, or no hand | 0 | — |
//!
//! ## Pipeline
//!
//! ```text
//! raw sample ─► LandmarkSet::from_points ─► count_fingers ─┐
//!                       │                                   ├─► SlotMemory ─► GestureState
//!                       └─► to_scene(lm 9) ─► PositionFilter┘
//! ```
//!
//! [`GestureInterpreter`] owns all cross-frame state.  It never fails: a
//! malformed sample is handled exactly like a frame with no hand.

pub mod landmarks;
pub mod classifier;
pub mod smoothing;
pub mod slots;
pub mod interpreter;
pub mod pose;

pub use landmarks::{LandmarkError, LandmarkSet, Point3, LANDMARK_COUNT};
pub use classifier::{count_fingers, extended_fingers, Finger, FingerCount, FingerStates};
pub use smoothing::{to_scene, PositionFilter, SMOOTHING_ALPHA};
pub use slots::{Slot, SlotMemory, SLOT_COUNT};
pub use interpreter::{GestureInterpreter, GestureState};
pub use pose::synthesize_hand;
