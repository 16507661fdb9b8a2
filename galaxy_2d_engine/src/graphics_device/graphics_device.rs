/// GraphicsDevice trait - primitive rendering facade
///
/// The device is a thin pass-through to the graphics context: it binds
/// buffer objects, moves bytes into them and issues draw calls. It keeps
/// whatever state the underlying API keeps (current binding per kind,
/// mapped buffers) and reports invalid call sequences as
/// `Error::DriverStateError`.

use std::ptr::NonNull;

use crate::error::Result;
use crate::graphics_device::{
    BufferHandle, BufferKind, UsageHint, MapAccess,
    PrimitiveTopology, Indices,
};
use crate::resource::BufferTargets;

/// Primitive rendering facade
///
/// Implemented by backends (GL-style contexts) and by the mock device used
/// in tests. A device is bound to one rendering context; callers share it
/// as `Arc<Mutex<dyn GraphicsDevice>>` and the mutex serializes access.
pub trait GraphicsDevice: Send {
    /// Allocate buffer object names
    ///
    /// # Arguments
    ///
    /// * `count` - Number of handles to allocate
    ///
    /// # Returns
    ///
    /// Exactly `count` fresh handles
    fn create_buffers(&mut self, count: usize) -> Result<Vec<BufferHandle>>;

    /// Release buffer object names allocated by `create_buffers`
    fn destroy_buffers(&mut self, handles: &[BufferHandle]) -> Result<()>;

    /// Bind a buffer to the binding point of `kind`, or unbind with `None`
    fn bind_buffer(&mut self, kind: BufferKind, handle: Option<BufferHandle>) -> Result<()>;

    /// Allocate the data store of the bound buffer and fill it with `data`
    ///
    /// # Arguments
    ///
    /// * `kind` - Binding point whose buffer receives the data
    /// * `data` - Bytes to upload (the store is resized to `data.len()`)
    /// * `usage` - Expected access pattern
    fn buffer_data(&mut self, kind: BufferKind, data: &[u8], usage: UsageHint) -> Result<()>;

    /// Overwrite part of the bound buffer's data store
    ///
    /// # Arguments
    ///
    /// * `kind` - Binding point whose buffer is written
    /// * `offset` - Byte offset into the data store
    /// * `data` - Bytes to write
    fn buffer_sub_data(&mut self, kind: BufferKind, offset: u64, data: &[u8]) -> Result<()>;

    /// Map the bound buffer's data store into client memory
    ///
    /// The pointer stays valid until `unmap_buffer` is called for `kind`.
    fn map_buffer(&mut self, kind: BufferKind, access: MapAccess) -> Result<NonNull<u8>>;

    /// Release a mapping obtained with `map_buffer`
    fn unmap_buffer(&mut self, kind: BufferKind) -> Result<()>;

    /// Enable the client attribute array for one stream
    fn enable_attribute_state(&mut self, target: BufferTargets) -> Result<()>;

    /// Disable the client attribute array for one stream
    fn disable_attribute_state(&mut self, target: BufferTargets) -> Result<()>;

    /// Enable every attribute array the device knows about
    fn enable_all_attribute_states(&mut self) -> Result<()>;

    /// Disable every attribute array the device knows about
    fn disable_all_attribute_states(&mut self) -> Result<()>;

    /// Draw `count` vertices starting at vertex `first`
    fn draw_arrays(&mut self, topology: PrimitiveTopology, count: u32, first: u32) -> Result<()>;

    /// Draw `count` indexed vertices
    fn draw_indexed(
        &mut self,
        topology: PrimitiveTopology,
        count: u32,
        indices: Indices<'_>,
    ) -> Result<()>;

    /// Draw `count` indexed vertices whose index values lie in `start..=end`
    fn draw_range_indexed(
        &mut self,
        topology: PrimitiveTopology,
        count: u32,
        indices: Indices<'_>,
        start: u32,
        end: u32,
    ) -> Result<()>;
}
