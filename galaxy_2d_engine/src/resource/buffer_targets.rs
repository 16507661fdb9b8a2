/// Capability mask over the three vertex-attribute streams a MultiBuffer can hold.

use bitflags::bitflags;

/// Maximum number of streams a single MultiBuffer can multiplex
pub const MAX_TARGETS: usize = 3;

bitflags! {
    /// Set of logical targets (attribute streams)
    ///
    /// A single bit names one stream; unions describe what a buffer
    /// supports. The unions below are plain ORs of the elemental bits and
    /// live in the same `u8`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferTargets: u8 {
        /// Vertex positions
        const VERTEX = 1 << 0;
        /// Per-vertex colors
        const COLOR = 1 << 1;
        /// Texture coordinates
        const TEX_COORDS = 1 << 2;

        const VERTEX_COLOR = Self::VERTEX.bits() | Self::COLOR.bits();
        const VERTEX_TEX_COORDS = Self::VERTEX.bits() | Self::TEX_COORDS.bits();
        const COLOR_TEX_COORDS = Self::COLOR.bits() | Self::TEX_COORDS.bits();
        const ALL = Self::VERTEX.bits() | Self::COLOR.bits() | Self::TEX_COORDS.bits();
    }
}

impl BufferTargets {
    /// No target
    pub const NONE: Self = Self::empty();

    /// Single targets in slot order
    pub const ORDER: [BufferTargets; MAX_TARGETS] = [
        BufferTargets::VERTEX,
        BufferTargets::COLOR,
        BufferTargets::TEX_COORDS,
    ];

    /// Union of two masks
    pub const fn combine(a: BufferTargets, b: BufferTargets) -> BufferTargets {
        a.union(b)
    }

    /// True when exactly one target bit is set
    pub const fn is_single(&self) -> bool {
        self.bits().count_ones() == 1
    }

    /// Number of targets in the mask
    pub const fn count(&self) -> usize {
        self.bits().count_ones() as usize
    }

    /// Single targets contained in this mask, in slot order
    pub fn targets(self) -> impl Iterator<Item = BufferTargets> {
        Self::ORDER.into_iter().filter(move |t| self.contains(*t))
    }
}

impl Default for BufferTargets {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
#[path = "buffer_targets_tests.rs"]
mod tests;
