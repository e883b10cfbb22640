//! Finger-count classification.
//!
//! A finger counts as extended when its tip is farther from the wrist than
//! its base (PIP) joint is.  The test is insensitive to hand scale and to
//! rigid rotation of the whole hand.
//!
//! Known limitation: a finger bent sideways, rather than folded toward the
//! palm, keeps its tip far from the wrist and still reads as extended.
//!
//! The count is an exact pattern match, not a sum.  Shapes such as
//! "middle only" or "index + ring" are deliberately reported as
//! [`FingerCount::Zero`] rather than guessed at.

use crate::landmarks::{index, LandmarkSet};

// ════════════════════════════════════════════════════════════════════════════
// Finger
// ════════════════════════════════════════════════════════════════════════════

/// The four fingers that take part in counting.  The thumb never does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// Landmark index of the fingertip.
    pub fn tip(self) -> usize {
        match self {
            Finger::Index  => index::INDEX_TIP,
            Finger::Middle => index::MIDDLE_TIP,
            Finger::Ring   => index::RING_TIP,
            Finger::Pinky  => index::PINKY_TIP,
        }
    }

    /// Landmark index of the joint the tip is compared against.
    pub fn base(self) -> usize {
        match self {
            Finger::Index  => index::INDEX_PIP,
            Finger::Middle => index::MIDDLE_PIP,
            Finger::Ring   => index::RING_PIP,
            Finger::Pinky  => index::PINKY_PIP,
        }
    }
}

/// True when `finger` is extended in `set`.
pub fn is_extended(set: &LandmarkSet, finger: Finger) -> bool {
    let wrist = set.wrist();
    set.get(finger.tip()).distance(&wrist) > set.get(finger.base()).distance(&wrist)
}

// ════════════════════════════════════════════════════════════════════════════
// FingerStates
// ════════════════════════════════════════════════════════════════════════════

/// Extension flag for each counted finger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FingerStates {
    pub index:  bool,
    pub middle: bool,
    pub ring:   bool,
    pub pinky:  bool,
}

impl FingerStates {
    pub const fn new(index: bool, middle: bool, ring: bool, pinky: bool) -> Self {
        FingerStates { index, middle, ring, pinky }
    }

    /// The canonical pose for a count: the first `n` fingers extended,
    /// counting from the index.  `n > 4` saturates at all four.
    pub fn first(n: usize) -> Self {
        FingerStates::new(n >= 1, n >= 2, n >= 3, n >= 4)
    }

    pub fn is(&self, finger: Finger) -> bool {
        match finger {
            Finger::Index  => self.index,
            Finger::Middle => self.middle,
            Finger::Ring   => self.ring,
            Finger::Pinky  => self.pinky,
        }
    }

    pub fn count(&self) -> FingerCount {
        match (self.index, self.middle, self.ring, self.pinky) {
            (true,  false, false, false) => FingerCount::One,
            (true,  true,  false, false) => FingerCount::Two,
            (true,  true,  true,  false) => FingerCount::Three,
            (true,  true,  true,  true)  => FingerCount::Four,
            _                            => FingerCount::Zero,
        }
    }
}

/// Evaluate all four extension predicates.
pub fn extended_fingers(set: &LandmarkSet) -> FingerStates {
    FingerStates {
        index:  is_extended(set, Finger::Index),
        middle: is_extended(set, Finger::Middle),
        ring:   is_extended(set, Finger::Ring),
        pinky:  is_extended(set, Finger::Pinky),
    }
}

/// Classify a landmark set.
pub fn count_fingers(set: &LandmarkSet) -> FingerCount {
    extended_fingers(set).count()
}

// ════════════════════════════════════════════════════════════════════════════
// FingerCount
// ════════════════════════════════════════════════════════════════════════════

/// Result of classification.
///
/// `Zero` covers both "no hand" and "unrecognized shape".  `Four` is computed
/// but reserved: it selects no slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FingerCount {
    #[default]
    Zero,
    One,
    Two,
    Three,
    Four,
}

impl FingerCount {
    pub fn as_u8(self) -> u8 {
        match self {
            FingerCount::Zero  => 0,
            FingerCount::One   => 1,
            FingerCount::Two   => 2,
            FingerCount::Three => 3,
            FingerCount::Four  => 4,
        }
    }

    /// Slot addressed by this count, if any.
    pub fn slot(self) -> Option<usize> {
        match self {
            FingerCount::One   => Some(0),
            FingerCount::Two   => Some(1),
            FingerCount::Three => Some(2),
            FingerCount::Zero | FingerCount::Four => None,
        }
    }
}

impl std::fmt::Display for FingerCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Point3;
    use crate::pose::synthesize_hand;
    use proptest::prelude::*;

    fn hand(fingers: FingerStates) -> LandmarkSet {
        LandmarkSet::from_points(&synthesize_hand(Point3::new(0.5, 0.5, 0.0), fingers)).unwrap()
    }

    #[test]
    fn canonical_poses_count() {
        assert_eq!(count_fingers(&hand(FingerStates::first(0))), FingerCount::Zero);
        assert_eq!(count_fingers(&hand(FingerStates::first(1))), FingerCount::One);
        assert_eq!(count_fingers(&hand(FingerStates::first(2))), FingerCount::Two);
        assert_eq!(count_fingers(&hand(FingerStates::first(3))), FingerCount::Three);
        assert_eq!(count_fingers(&hand(FingerStates::first(4))), FingerCount::Four);
    }

    #[test]
    fn middle_only_is_not_one() {
        let states = FingerStates::new(false, true, false, false);
        assert_eq!(count_fingers(&hand(states)), FingerCount::Zero);
    }

    #[test]
    fn gap_in_sequence_is_zero() {
        let states = FingerStates::new(true, false, true, false);
        assert_eq!(count_fingers(&hand(states)), FingerCount::Zero);
    }

    #[test]
    fn pinky_without_ring_is_zero() {
        let states = FingerStates::new(true, true, false, true);
        assert_eq!(states.count(), FingerCount::Zero);
    }

    #[test]
    fn extension_is_scale_invariant() {
        // Shrink the whole hand about the wrist; predicates must not change.
        let big = synthesize_hand(Point3::new(0.5, 0.5, 0.0), FingerStates::first(2));
        let wrist = big[0];
        let small: Vec<Point3> = big.iter().map(|p| wrist.lerp(p, 0.3)).collect();
        let set = LandmarkSet::from_points(&small).unwrap();
        assert_eq!(extended_fingers(&set), FingerStates::first(2));
    }

    #[test]
    fn tie_is_not_extended() {
        let mut pts = vec![Point3::new(0.5, 0.5, 0.0); 21];
        pts[0] = Point3::new(0.5, 0.75, 0.0);
        // Tip and PIP mirror each other about the wrist: equal distance.
        pts[6] = Point3::new(0.25, 0.5, 0.0);
        pts[8] = Point3::new(0.75, 0.5, 0.0);
        let set = LandmarkSet::from_points(&pts).unwrap();
        assert!(!is_extended(&set, Finger::Index));
    }

    #[test]
    fn count_slot_mapping() {
        assert_eq!(FingerCount::Zero.slot(), None);
        assert_eq!(FingerCount::One.slot(), Some(0));
        assert_eq!(FingerCount::Two.slot(), Some(1));
        assert_eq!(FingerCount::Three.slot(), Some(2));
        assert_eq!(FingerCount::Four.slot(), None);
    }

    fn recognized(s: FingerStates) -> Option<FingerCount> {
        const PREFIX_COUNTS: [FingerCount; 4] =
            [FingerCount::One, FingerCount::Two, FingerCount::Three, FingerCount::Four];
        (1..=4).find(|&n| FingerStates::first(n) == s).map(|n| PREFIX_COUNTS[n - 1])
    }

    proptest! {
        #[test]
        fn only_prefix_patterns_are_recognized(
            index in any::<bool>(),
            middle in any::<bool>(),
            ring in any::<bool>(),
            pinky in any::<bool>(),
        ) {
            let states = FingerStates::new(index, middle, ring, pinky);
            let count = count_fingers(&hand(states));
            match recognized(states) {
                Some(expected) => prop_assert_eq!(count, expected),
                None           => prop_assert_eq!(count, FingerCount::Zero),
            }
        }

        #[test]
        fn classification_survives_translation(
            x in 0.2f32..0.8,
            y in 0.25f32..0.7,
            z in -0.3f32..0.3,
            n in 0usize..=4,
        ) {
            let pts = synthesize_hand(Point3::new(x, y, z), FingerStates::first(n));
            let set = LandmarkSet::from_points(&pts).unwrap();
            prop_assert_eq!(extended_fingers(&set), FingerStates::first(n));
        }
    }
}
