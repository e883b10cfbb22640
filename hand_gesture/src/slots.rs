//! The three addressable slots and the memory of where each was left.

use crate::landmarks::Point3;

pub const SLOT_COUNT: usize = 3;

/// Display color per slot (0xRRGGBB): blue, pink, green.
pub const SLOT_COLORS: [u32; SLOT_COUNT] = [0x3B82F6, 0xEC4899, 0x10B981];

/// Where each slot sits before it has ever been commanded.
pub const HOME_POSITIONS: [Point3; SLOT_COUNT] = [
    Point3::new(-4.0, 0.0, 0.0),
    Point3::new( 0.0, 0.0, 0.0),
    Point3::new( 4.0, 0.0, 0.0),
];

/// One slot as seen in a snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    /// 0, 1, 2 ↔ finger counts 1, 2, 3.
    pub id:       usize,
    pub position: Point3,
    pub active:   bool,
    pub color:    u32,
}

impl Slot {
    /// Finger count that selects this slot.
    pub fn finger_count(&self) -> u8 {
        self.id as u8 + 1
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SlotMemory
// ════════════════════════════════════════════════════════════════════════════

/// Last committed position of every slot.  Lives for the whole session.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotMemory {
    positions: [Point3; SLOT_COUNT],
}

impl Default for SlotMemory {
    fn default() -> Self {
        SlotMemory::new()
    }
}

impl SlotMemory {
    pub fn new() -> Self {
        SlotMemory { positions: HOME_POSITIONS }
    }

    /// Stored position of `slot`, or `None` if the id is out of range.
    pub fn position(&self, slot: usize) -> Option<Point3> {
        self.positions.get(slot).copied()
    }

    /// Park `slot` at `position`.  Out-of-range ids are ignored and reported
    /// as `false`.
    pub fn commit(&mut self, slot: usize, position: Point3) -> bool {
        match self.positions.get_mut(slot) {
            Some(p) => { *p = position; true }
            None    => false,
        }
    }

    /// Build the slot list with at most `active` lit.
    pub fn slots(&self, active: Option<usize>) -> [Slot; SLOT_COUNT] {
        std::array::from_fn(|id| Slot {
            id,
            position: self.positions[id],
            active:   active == Some(id),
            color:    SLOT_COLORS[id],
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
