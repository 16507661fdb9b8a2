//! Resource module
//!
//! Buffer resources built on top of the graphics device: the capability
//! mask describing attribute streams and the MultiBuffer that backs them.

mod buffer_targets;
mod multi_buffer;

pub use buffer_targets::{BufferTargets, MAX_TARGETS};
pub use multi_buffer::{MultiBuffer, MultiBufferDesc, MappedBuffer};
