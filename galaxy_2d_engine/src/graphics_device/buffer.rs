/// Buffer handle and the value types the device needs to move buffer data

use std::num::NonZeroU32;

/// Opaque GPU buffer object name
///
/// Zero is reserved by graphics APIs for "no buffer", so a handle can
/// never hold it. Unbinding is expressed as `None` at the device boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(NonZeroU32);

impl BufferHandle {
    /// Wrap a raw buffer name, rejecting the null name
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// Raw buffer name as the driver knows it
    pub fn raw(&self) -> u32 {
        self.0.get()
    }
}

/// What kind of data a buffer stores
///
/// Selects the binding point on the device and is fixed for the lifetime
/// of a MultiBuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Vertex attribute data (array buffer)
    Vertex,
    /// Index data (element array buffer)
    Index,
}

/// How often the data store will be modified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageFrequency {
    /// Modified once, used at most a few times
    Stream,
    /// Modified once, used many times
    Static,
    /// Modified repeatedly, used many times
    Dynamic,
}

/// Who writes the data store and who reads it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageNature {
    /// Written by the application, read by the GPU for drawing
    Draw,
    /// Written by the GPU, read back by the application
    Read,
    /// Written by the GPU, read by the GPU
    Copy,
}

/// Driver hint describing the expected access pattern of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageHint {
    StreamDraw,
    StreamRead,
    StreamCopy,
    StaticDraw,
    StaticRead,
    StaticCopy,
    DynamicDraw,
    DynamicRead,
    DynamicCopy,
}

impl UsageHint {
    /// Build a hint from its two components
    pub fn new(frequency: UsageFrequency, nature: UsageNature) -> Self {
        match (frequency, nature) {
            (UsageFrequency::Stream, UsageNature::Draw) => UsageHint::StreamDraw,
            (UsageFrequency::Stream, UsageNature::Read) => UsageHint::StreamRead,
            (UsageFrequency::Stream, UsageNature::Copy) => UsageHint::StreamCopy,
            (UsageFrequency::Static, UsageNature::Draw) => UsageHint::StaticDraw,
            (UsageFrequency::Static, UsageNature::Read) => UsageHint::StaticRead,
            (UsageFrequency::Static, UsageNature::Copy) => UsageHint::StaticCopy,
            (UsageFrequency::Dynamic, UsageNature::Draw) => UsageHint::DynamicDraw,
            (UsageFrequency::Dynamic, UsageNature::Read) => UsageHint::DynamicRead,
            (UsageFrequency::Dynamic, UsageNature::Copy) => UsageHint::DynamicCopy,
        }
    }

    /// Modification frequency part of the hint
    pub fn frequency(&self) -> UsageFrequency {
        match self {
            UsageHint::StreamDraw | UsageHint::StreamRead | UsageHint::StreamCopy => UsageFrequency::Stream,
            UsageHint::StaticDraw | UsageHint::StaticRead | UsageHint::StaticCopy => UsageFrequency::Static,
            UsageHint::DynamicDraw | UsageHint::DynamicRead | UsageHint::DynamicCopy => UsageFrequency::Dynamic,
        }
    }

    /// Access nature part of the hint
    pub fn nature(&self) -> UsageNature {
        match self {
            UsageHint::StreamDraw | UsageHint::StaticDraw | UsageHint::DynamicDraw => UsageNature::Draw,
            UsageHint::StreamRead | UsageHint::StaticRead | UsageHint::DynamicRead => UsageNature::Read,
            UsageHint::StreamCopy | UsageHint::StaticCopy | UsageHint::DynamicCopy => UsageNature::Copy,
        }
    }
}

impl Default for UsageHint {
    fn default() -> Self {
        UsageHint::StaticDraw
    }
}

/// Access requested when mapping a buffer into client memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapAccess {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl MapAccess {
    /// Whether the client may read through the mapping
    pub fn can_read(&self) -> bool {
        matches!(self, MapAccess::ReadOnly | MapAccess::ReadWrite)
    }

    /// Whether the client may write through the mapping
    pub fn can_write(&self) -> bool {
        matches!(self, MapAccess::WriteOnly | MapAccess::ReadWrite)
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
