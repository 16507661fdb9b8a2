use crate::resource::{BufferTargets, MAX_TARGETS};

/// Maps each target of a capability mask to a dense slot index.
///
/// Built once by scanning the mask in slot order (Vertex, Color,
/// TexCoords) and handing out `0..len` to the targets that are present.
/// The table never changes after construction.
///
/// # Example
///
/// ```ignore
/// let table = TargetSlotTable::new(BufferTargets::VERTEX_TEX_COORDS);
/// table.slot(BufferTargets::VERTEX);      // Some(0)
/// table.slot(BufferTargets::TEX_COORDS);  // Some(1)
/// table.slot(BufferTargets::COLOR);       // None
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSlotTable {
    slots: [Option<u8>; MAX_TARGETS],
    len: u8,
}

impl TargetSlotTable {
    /// Build the table for a capability mask
    pub fn new(mask: BufferTargets) -> Self {
        let mut slots = [None; MAX_TARGETS];
        let mut len = 0u8;
        for (bit, target) in BufferTargets::ORDER.iter().enumerate() {
            if mask.contains(*target) {
                slots[bit] = Some(len);
                len += 1;
            }
        }
        Self { slots, len }
    }

    /// Slot index of a single target, or None if the target is not in the table
    ///
    /// Unions and the empty mask have no slot.
    pub fn slot(&self, target: BufferTargets) -> Option<usize> {
        if !target.is_single() {
            return None;
        }
        let bit = target.bits().trailing_zeros() as usize;
        self.slots.get(bit).copied().flatten().map(usize::from)
    }

    /// Number of slots (popcount of the mask)
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the table has no slots
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Targets with a slot, in slot order
    pub fn targets(&self) -> impl Iterator<Item = BufferTargets> + '_ {
        BufferTargets::ORDER.into_iter()
            .zip(self.slots.iter())
            .filter_map(|(target, slot)| slot.map(|_| target))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "slot_table_tests.rs"]
mod tests;
