//! The gesture interpreter: one update per completed inference cycle.
//!
//! `GestureInterpreter` owns every piece of cross-frame state (the smoothing
//! accumulator and the slot memory) and turns each sample into a fresh,
//! immutable [`GestureState`].

use tracing::{debug, trace};

use crate::classifier::{count_fingers, FingerCount};
use crate::landmarks::{index, LandmarkSet, Point3};
use crate::slots::{Slot, SlotMemory, SLOT_COUNT};
use crate::smoothing::{to_scene, PositionFilter};

// ════════════════════════════════════════════════════════════════════════════
// GestureState
// ════════════════════════════════════════════════════════════════════════════

/// Snapshot produced by one interpreter update.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureState {
    pub finger_count:  FingerCount,
    /// Smoothed hand position in scene units.
    pub hand_pos:      Point3,
    /// A valid landmark set arrived on this frame.
    pub hand_detected: bool,
    /// Number of updates that produced this snapshot (0 = initial state).
    pub frame:         u64,
    pub slots:         [Slot; SLOT_COUNT],
}

impl GestureState {
    /// The slot lit on this frame, if any.
    pub fn active_slot(&self) -> Option<&Slot> {
        self.slots.iter().find(|s| s.active)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureInterpreter
// ════════════════════════════════════════════════════════════════════════════

pub struct GestureInterpreter {
    filter: PositionFilter,
    memory: SlotMemory,
    latest: GestureState,
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        GestureInterpreter::new()
    }
}

impl GestureInterpreter {
    pub fn new() -> Self {
        GestureInterpreter::with_filter(PositionFilter::new())
    }

    /// Interpreter with a pre-configured smoothing filter.
    pub fn with_filter(filter: PositionFilter) -> Self {
        let memory = SlotMemory::new();
        let latest = GestureState {
            finger_count:  FingerCount::Zero,
            hand_pos:      filter.current(),
            hand_detected: false,
            frame:         0,
            slots:         memory.slots(None),
        };
        GestureInterpreter { filter, memory, latest }
    }

    /// Feed one raw sample (`None` = no hand this cycle).
    ///
    /// Samples that fail validation are handled as `None`.
    pub fn update(&mut self, sample: Option<&[Point3]>) -> GestureState {
        let set = sample.and_then(|points| match LandmarkSet::from_points(points) {
            Ok(set) => Some(set),
            Err(e)  => {
                debug!(frame = self.latest.frame + 1, "malformed sample dropped: {}", e);
                None
            }
        });
        self.update_set(set.as_ref())
    }

    /// Feed one already-validated landmark set.
    pub fn update_set(&mut self, set: Option<&LandmarkSet>) -> GestureState {
        let frame = self.latest.frame + 1;

        let (count, hand_pos) = match set {
            Some(set) => {
                let count = count_fingers(set);
                let raw   = to_scene(set.get(index::MIDDLE_MCP));
                (count, self.filter.update(raw))
            }
            None => (FingerCount::Zero, self.filter.current()),
        };

        let active = count.slot();
        if let Some(slot) = active {
            self.memory.commit(slot, hand_pos);
        }

        if count != self.latest.finger_count {
            debug!(frame, from = %self.latest.finger_count, to = %count, "finger count changed");
        }
        trace!(frame, count = %count, x = hand_pos.x, y = hand_pos.y, z = hand_pos.z, "gesture update");

        self.latest = GestureState {
            finger_count:  count,
            hand_pos,
            hand_detected: set.is_some(),
            frame,
            slots:         self.memory.slots(active),
        };
        self.latest.clone()
    }

    /// Most recent snapshot (the initial state before any update).
    pub fn state(&self) -> &GestureState {
        &self.latest
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FingerStates;
    use crate::pose::synthesize_hand;
    use crate::slots::HOME_POSITIONS;

    fn hand(n: usize, x: f32, y: f32) -> Vec<Point3> {
        synthesize_hand(Point3::new(x, y, 0.0), FingerStates::first(n))
    }

    #[test]
    fn initial_state() {
        let it = GestureInterpreter::new();
        let s = it.state();
        assert_eq!(s.finger_count, FingerCount::Zero);
        assert_eq!(s.hand_pos, Point3::ORIGIN);
        assert_eq!(s.frame, 0);
        assert!(!s.hand_detected);
        assert!(s.active_slot().is_none());
        for (i, slot) in s.slots.iter().enumerate() {
            assert_eq!(slot.position, HOME_POSITIONS[i]);
        }
    }

    #[test]
    fn two_fingers_drive_slot_one() {
        let mut it = GestureInterpreter::new();
        let s = it.update(Some(&hand(2, 0.75, 0.25)));
        assert_eq!(s.finger_count, FingerCount::Two);
        assert_eq!(s.active_slot().map(|sl| sl.id), Some(1));
        assert_eq!(s.slots[1].position, s.hand_pos);
        assert_eq!(s.slots[0].position, HOME_POSITIONS[0]);
        assert_eq!(s.slots[2].position, HOME_POSITIONS[2]);
    }

    #[test]
    fn no_hand_holds_filter() {
        let mut it = GestureInterpreter::new();
        let moved = it.update(Some(&hand(1, 0.9, 0.1))).hand_pos;
        for _ in 0..50 {
            let s = it.update(None);
            assert_eq!(s.hand_pos, moved);
            assert!(!s.hand_detected);
            assert_eq!(s.finger_count, FingerCount::Zero);
        }
    }

    #[test]
    fn fist_moves_filter_but_no_slot() {
        let mut it = GestureInterpreter::new();
        let s = it.update(Some(&hand(0, 0.9, 0.5)));
        assert_eq!(s.finger_count, FingerCount::Zero);
        assert!(s.hand_detected);
        assert!(s.hand_pos.x > 0.0);
        assert!(s.active_slot().is_none());
        for (i, slot) in s.slots.iter().enumerate() {
            assert_eq!(slot.position, HOME_POSITIONS[i]);
        }
    }

    #[test]
    fn four_is_reserved() {
        let mut it = GestureInterpreter::new();
        let s = it.update(Some(&hand(4, 0.2, 0.5)));
        assert_eq!(s.finger_count, FingerCount::Four);
        assert!(s.active_slot().is_none());
        for (i, slot) in s.slots.iter().enumerate() {
            assert_eq!(slot.position, HOME_POSITIONS[i]);
        }
    }

    #[test]
    fn malformed_sample_is_no_hand() {
        let mut it = GestureInterpreter::new();
        let before = it.update(Some(&hand(3, 0.6, 0.4)));
        let truncated = &hand(3, 0.6, 0.4)[..20];
        let s = it.update(Some(truncated));
        assert_eq!(s.finger_count, FingerCount::Zero);
        assert!(!s.hand_detected);
        assert_eq!(s.hand_pos, before.hand_pos);
        assert_eq!(s.slots[2].position, before.slots[2].position);
        assert!(!s.slots[2].active);
    }

    #[test]
    fn frame_counter_advances_every_update() {
        let mut it = GestureInterpreter::new();
        it.update(None);
        it.update(Some(&hand(1, 0.5, 0.5)));
        it.update(Some(&[]));
        assert_eq!(it.state().frame, 3);
    }

    #[test]
    fn switching_slots_parks_the_previous_one() {
        let mut it = GestureInterpreter::new();
        let first = it.update(Some(&hand(1, 0.2, 0.5)));
        let parked = first.slots[0].position;
        let s = it.update(Some(&hand(3, 0.8, 0.5)));
        assert!(!s.slots[0].active);
        assert_eq!(s.slots[0].position, parked);
        assert!(s.slots[2].active);
        assert_eq!(s.slots[2].position, s.hand_pos);
    }
}
