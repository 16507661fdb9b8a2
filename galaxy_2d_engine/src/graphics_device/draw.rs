/// Primitive topology and index description for draw calls

/// How vertices are assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    PointList,
    LineList,
    LineStrip,
    LineLoop,
    TriangleList,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveTopology {
    /// Minimum vertex count that produces at least one primitive
    pub fn min_vertex_count(&self) -> u32 {
        match self {
            PrimitiveTopology::PointList => 1,
            PrimitiveTopology::LineList
            | PrimitiveTopology::LineStrip
            | PrimitiveTopology::LineLoop => 2,
            PrimitiveTopology::TriangleList
            | PrimitiveTopology::TriangleStrip
            | PrimitiveTopology::TriangleFan => 3,
        }
    }
}

/// Index element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    U8,
    U16,
    U32,
}

impl IndexType {
    /// Size of one index in bytes
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U8 => 1,
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// Where an indexed draw reads its indices from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indices<'a> {
    /// Client-side 8-bit indices
    U8(&'a [u8]),
    /// Client-side 16-bit indices
    U16(&'a [u16]),
    /// Client-side 32-bit indices
    U32(&'a [u32]),
    /// Indices stored in the bound index buffer, starting at `byte_offset`
    Buffer {
        index_type: IndexType,
        byte_offset: u64,
    },
}

impl Indices<'_> {
    /// Element type of the indices
    pub fn index_type(&self) -> IndexType {
        match self {
            Indices::U8(_) => IndexType::U8,
            Indices::U16(_) => IndexType::U16,
            Indices::U32(_) => IndexType::U32,
            Indices::Buffer { index_type, .. } => *index_type,
        }
    }

    /// Number of client-side indices, None when they live in a buffer
    pub fn client_len(&self) -> Option<usize> {
        match self {
            Indices::U8(data) => Some(data.len()),
            Indices::U16(data) => Some(data.len()),
            Indices::U32(data) => Some(data.len()),
            Indices::Buffer { .. } => None,
        }
    }
}

#[cfg(test)]
#[path = "draw_tests.rs"]
mod tests;
