/// Multi-target vertex buffer.
///
/// A MultiBuffer multiplexes up to three attribute streams (positions,
/// colors, texture coordinates) over one buffer binding point. Each stream
/// in the capability mask owns one physical buffer object; binding a
/// stream makes its buffer the current one for uploads, updates, mapping
/// and draws.
///
/// Architecture:
/// - Capability mask: fixed at construction, at most MAX_TARGETS streams
/// - Slot table: stream -> dense slot index, built once
/// - Per slot: physical handle, data flag, size of the last upload
/// - Bound target: the stream whose buffer is current, or none
///
/// The device binding point may be shared with other MultiBuffers of the
/// same kind, so every operation on the bound stream re-binds its handle
/// before talking to the device.

use std::ptr::NonNull;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::{engine_bail, engine_err, engine_debug, engine_trace, engine_warn};
use crate::graphics_device::{
    GraphicsDevice, BufferHandle, BufferKind, UsageHint, MapAccess,
    PrimitiveTopology, Indices,
};
use crate::resource::{BufferTargets, MAX_TARGETS};
use crate::utils::TargetSlotTable;

const SOURCE: &str = "galaxy2d::MultiBuffer";

// ===== MULTI BUFFER DESC =====

/// Descriptor for creating a MultiBuffer
pub struct MultiBufferDesc {
    /// Device that owns the physical buffers
    pub graphics_device: Arc<Mutex<dyn GraphicsDevice>>,
    /// Streams the buffer supports (must not be empty)
    pub targets: BufferTargets,
    /// Binding point used for every stream
    pub kind: BufferKind,
}

// ===== TARGET SLOT =====

/// State of one stream
#[derive(Debug, Clone, Copy)]
struct TargetSlot {
    handle: BufferHandle,
    has_data: bool,
    data_size: u64,
}

// ===== MULTI BUFFER =====

/// Buffer manager multiplexing several attribute streams
///
/// Not synchronized: one MultiBuffer belongs to one rendering context.
/// The device mutex only serializes access to the shared device.
pub struct MultiBuffer {
    graphics_device: Arc<Mutex<dyn GraphicsDevice>>,
    targets: BufferTargets,
    kind: BufferKind,
    slot_table: TargetSlotTable,
    slots: Vec<TargetSlot>,
    bound: Option<BufferTargets>,
}

impl MultiBuffer {
    /// Create the buffer and one physical handle per stream
    ///
    /// Every fresh handle is bound once so the driver creates its object,
    /// then the binding point is released: the new buffer starts unbound
    /// with every stream empty.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError` if `desc.targets` is empty
    /// - `BackendError` if the device returns the wrong number of handles
    /// - any device error; handles allocated so far are released first
    pub fn from_desc(desc: MultiBufferDesc) -> Result<Self> {
        if desc.targets.is_empty() {
            engine_bail!(SOURCE, Error::ConfigurationError(
                "MultiBuffer requires a non-empty capability mask".to_string()
            ));
        }

        let slot_table = TargetSlotTable::new(desc.targets);
        let count = slot_table.len();

        let handles = {
            let mut device = lock_device(&desc.graphics_device)?;
            let handles = device.create_buffers(count)?;
            if handles.len() != count {
                if let Err(err) = device.destroy_buffers(&handles) {
                    engine_warn!(SOURCE, "Failed to release mismatched handles: {}", err);
                }
                engine_bail!(SOURCE, Error::BackendError(format!(
                    "Device returned {} buffer handles, expected {}", handles.len(), count
                )));
            }
            if let Err(err) = activate_handles(&mut *device, desc.kind, &handles) {
                if let Err(release_err) = device.destroy_buffers(&handles) {
                    engine_warn!(SOURCE, "Failed to release handles after error: {}", release_err);
                }
                return Err(engine_err!(SOURCE, err));
            }
            handles
        };

        let slots = handles.into_iter()
            .map(|handle| TargetSlot { handle, has_data: false, data_size: 0 })
            .collect::<Vec<_>>();
        debug_assert!(slots.len() <= MAX_TARGETS);

        engine_debug!(SOURCE, "Created {:?} buffer for {:?} ({} handles)",
            desc.kind, desc.targets, slots.len());

        Ok(Self {
            graphics_device: desc.graphics_device,
            targets: desc.targets,
            kind: desc.kind,
            slot_table,
            slots,
            bound: None,
        })
    }

    // ===== ACCESSORS =====

    /// Capability mask
    pub fn targets(&self) -> BufferTargets { self.targets }

    /// Binding point used by every stream
    pub fn kind(&self) -> BufferKind { self.kind }

    /// Number of physical buffers (popcount of the capability mask)
    pub fn handle_count(&self) -> usize { self.slots.len() }

    /// Physical handle behind a single stream
    pub fn handle(&self, target: BufferTargets) -> Result<BufferHandle> {
        Ok(self.slots[self.single_slot(target)?].handle)
    }

    /// Whether a stream is bound
    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// Bound stream, if any
    pub fn bound_target(&self) -> Option<BufferTargets> {
        self.bound
    }

    /// Byte size of the last upload to a single stream (0 when empty)
    pub fn data_size(&self, target: BufferTargets) -> Result<u64> {
        Ok(self.slots[self.single_slot(target)?].data_size)
    }

    // ===== BINDING =====

    /// Make `target` the current stream
    ///
    /// Binding an already bound stream re-issues the bind.
    ///
    /// # Errors
    ///
    /// `InvalidTarget` if `target` is not exactly one stream of the mask.
    /// The bound stream is left unchanged on error.
    pub fn bind(&mut self, target: BufferTargets) -> Result<()> {
        let slot = self.single_slot(target)?;
        let handle = self.slots[slot].handle;
        self.device()?.bind_buffer(self.kind, Some(handle))?;
        self.bound = Some(target);
        engine_trace!(SOURCE, "Bound {:?} (handle {})", target, handle.raw());
        Ok(())
    }

    /// Release the binding point
    pub fn unbind(&mut self) -> Result<()> {
        self.device()?.bind_buffer(self.kind, None)?;
        self.bound = None;
        engine_trace!(SOURCE, "Unbound {:?} buffer", self.kind);
        Ok(())
    }

    // ===== DATA STATE =====

    /// Whether a stream (or any stream of a subset) has no data
    ///
    /// Accepts any non-empty subset of the capability mask, bound or not.
    /// For a subset, returns true as soon as one member is empty.
    pub fn is_empty(&self, target: BufferTargets) -> Result<bool> {
        if target.is_empty() || !self.targets.contains(target) {
            engine_bail!(SOURCE, Error::InvalidTarget {
                requested: target,
                supported: self.targets,
            });
        }
        Ok(target.targets().any(|t| {
            self.slot_table.slot(t)
                .map(|slot| !self.slots[slot].has_data)
                .unwrap_or(true)
        }))
    }

    /// Whether the bound stream has no data
    ///
    /// Returns false when nothing is bound; check `is_bound` to tell
    /// "nothing bound" from "bound and populated".
    pub fn is_current_empty(&self) -> bool {
        match self.bound {
            Some(target) => self.is_empty(target).unwrap_or(false),
            None => false,
        }
    }

    // ===== DATA TRANSFER =====

    /// Replace the bound stream's data store with `data`
    ///
    /// Marks the stream as populated once the device accepted the data.
    pub fn upload(&mut self, data: &[u8], usage: UsageHint) -> Result<()> {
        let (target, slot) = self.bound_slot("upload")?;
        self.activate(slot)?.buffer_data(self.kind, data, usage)?;
        let state = &mut self.slots[slot];
        state.has_data = true;
        state.data_size = data.len() as u64;
        engine_trace!(SOURCE, "Uploaded {} bytes to {:?} ({:?})", data.len(), target, usage);
        Ok(())
    }

    /// Upload a slice of plain-old-data values (vertices, colors, UVs)
    pub fn upload_slice<T: bytemuck::Pod>(&mut self, data: &[T], usage: UsageHint) -> Result<()> {
        self.upload(bytemuck::cast_slice(data), usage)
    }

    /// Overwrite `data.len()` bytes of the bound stream at `offset`
    ///
    /// # Errors
    ///
    /// - `NoTargetBound` if nothing is bound
    /// - `EmptyTarget` if the bound stream has no data yet
    /// - `OutOfBounds` if the range runs past the last upload
    pub fn update(&mut self, data: &[u8], offset: u64) -> Result<()> {
        let (target, slot) = self.bound_slot("update")?;
        let state = self.slots[slot];
        if !state.has_data {
            engine_bail!(SOURCE, Error::EmptyTarget(target));
        }
        let end = offset.checked_add(data.len() as u64);
        if end.map_or(true, |end| end > state.data_size) {
            engine_bail!(SOURCE, Error::OutOfBounds(format!(
                "update of {} bytes at offset {} exceeds {} bytes of {:?}",
                data.len(), offset, state.data_size, target
            )));
        }
        self.activate(slot)?.buffer_sub_data(self.kind, offset, data)?;
        engine_trace!(SOURCE, "Updated {} bytes of {:?} at offset {}", data.len(), target, offset);
        Ok(())
    }

    /// Update with a slice of plain-old-data values, `offset` in bytes
    pub fn update_slice<T: bytemuck::Pod>(&mut self, data: &[T], offset: u64) -> Result<()> {
        self.update(bytemuck::cast_slice(data), offset)
    }

    /// Map the bound stream into client memory
    ///
    /// The returned guard borrows the buffer mutably: the buffer cannot be
    /// rebound, drawn or dropped until the mapping is released with
    /// `MappedBuffer::unmap` or by dropping the guard.
    pub fn map_for_client_access(&mut self, access: MapAccess) -> Result<MappedBuffer<'_>> {
        let (target, slot) = self.bound_slot("map_for_client_access")?;
        let len = self.slots[slot].data_size;
        let ptr = self.activate(slot)?.map_buffer(self.kind, access)?;
        engine_trace!(SOURCE, "Mapped {:?} ({:?}, {} bytes)", target, access, len);
        Ok(MappedBuffer {
            buffer: self,
            ptr,
            len,
            access,
            released: false,
        })
    }

    fn unmap_client_access(&mut self) -> Result<()> {
        let (_, slot) = self.bound_slot("unmap_client_access")?;
        self.activate(slot)?.unmap_buffer(self.kind)?;
        engine_trace!(SOURCE, "Unmapped {:?}", self.bound);
        Ok(())
    }

    // ===== DEPLETION =====

    /// Mark the bound stream as empty
    pub fn deplete(&mut self) -> Result<()> {
        let (target, slot) = self.bound_slot("deplete")?;
        let state = &mut self.slots[slot];
        state.has_data = false;
        state.data_size = 0;
        engine_debug!(SOURCE, "Depleted {:?}", target);
        Ok(())
    }

    /// Bind every stream in slot order and mark it empty
    ///
    /// Leaves the last stream of the mask bound. All binds are issued before
    /// any flag changes, so a device failure leaves flags, sizes and the
    /// bound stream as they were.
    pub fn deplete_all(&mut self) -> Result<()> {
        let mut last = None;
        {
            let mut device = self.device()?;
            for (target, slot) in self.targets.targets().zip(self.slots.iter()) {
                device.bind_buffer(self.kind, Some(slot.handle))?;
                last = Some(target);
            }
        }
        for slot in &mut self.slots {
            slot.has_data = false;
            slot.data_size = 0;
        }
        self.bound = last;
        engine_debug!(SOURCE, "Depleted all of {:?}", self.targets);
        Ok(())
    }

    // ===== ATTRIBUTE STATE =====

    /// Enable the attribute array of every stream in the mask
    pub fn enable_attributes(&self) -> Result<()> {
        let mut device = self.device()?;
        for target in self.targets.targets() {
            device.enable_attribute_state(target)?;
        }
        Ok(())
    }

    /// Disable the attribute array of every stream in the mask
    pub fn disable_attributes(&self) -> Result<()> {
        let mut device = self.device()?;
        for target in self.targets.targets() {
            device.disable_attribute_state(target)?;
        }
        Ok(())
    }

    // ===== DRAW DELEGATION =====

    /// Draw `count` vertices starting at `first` against the bound stream
    ///
    /// Only requires a bound stream; whether it is populated is up to the caller.
    pub fn draw_arrays(&self, topology: PrimitiveTopology, count: u32, first: u32) -> Result<()> {
        let (_, slot) = self.bound_slot("draw_arrays")?;
        self.activate(slot)?.draw_arrays(topology, count, first)
    }

    /// Draw `count` indexed vertices against the bound stream
    pub fn draw_indexed(
        &self,
        topology: PrimitiveTopology,
        count: u32,
        indices: Indices<'_>,
    ) -> Result<()> {
        let (_, slot) = self.bound_slot("draw_indexed")?;
        self.activate(slot)?.draw_indexed(topology, count, indices)
    }

    /// Draw `count` indexed vertices whose values lie in `start..=end`
    pub fn draw_range_indexed(
        &self,
        topology: PrimitiveTopology,
        count: u32,
        indices: Indices<'_>,
        start: u32,
        end: u32,
    ) -> Result<()> {
        let (_, slot) = self.bound_slot("draw_range_indexed")?;
        self.activate(slot)?.draw_range_indexed(topology, count, indices, start, end)
    }

    // ===== INTERNAL HELPERS =====

    fn device(&self) -> Result<MutexGuard<'_, dyn GraphicsDevice + 'static>> {
        lock_device(&self.graphics_device)
    }

    /// Lock the device with the handle of `slot` bound to `self.kind`
    fn activate(&self, slot: usize) -> Result<MutexGuard<'_, dyn GraphicsDevice + 'static>> {
        let mut device = self.device()?;
        device.bind_buffer(self.kind, Some(self.slots[slot].handle))?;
        Ok(device)
    }

    /// Slot of a single stream of the mask
    fn single_slot(&self, target: BufferTargets) -> Result<usize> {
        match self.slot_table.slot(target) {
            Some(slot) => Ok(slot),
            None => Err(engine_err!(SOURCE, Error::InvalidTarget {
                requested: target,
                supported: self.targets,
            })),
        }
    }

    /// Bound stream and its slot
    fn bound_slot(&self, op: &'static str) -> Result<(BufferTargets, usize)> {
        let target = self.require_bound(op)?;
        Ok((target, self.single_slot(target)?))
    }

    fn require_bound(&self, op: &'static str) -> Result<BufferTargets> {
        self.bound.ok_or_else(|| engine_err!(SOURCE, Error::NoTargetBound(op)))
    }
}

impl Drop for MultiBuffer {
    fn drop(&mut self) {
        let handles: Vec<BufferHandle> = self.slots.iter().map(|slot| slot.handle).collect();
        // Don't panic if the lock is poisoned - the handles just leak
        match self.graphics_device.lock() {
            Ok(mut device) => {
                if let Err(err) = device.destroy_buffers(&handles) {
                    engine_warn!(SOURCE, "Failed to release {} buffer handles: {}", handles.len(), err);
                } else {
                    engine_debug!(SOURCE, "Released {} buffer handles", handles.len());
                }
            }
            Err(_) => {
                engine_warn!(SOURCE, "Graphics device lock poisoned, leaking {} buffer handles", handles.len());
            }
        }
    }
}

// ===== MAPPED BUFFER =====

/// Client mapping of the bound stream
///
/// Holds the MultiBuffer mutably for as long as the mapping lives.
pub struct MappedBuffer<'a> {
    buffer: &'a mut MultiBuffer,
    ptr: NonNull<u8>,
    len: u64,
    access: MapAccess,
    released: bool,
}

impl MappedBuffer<'_> {
    /// Start of the mapped memory
    ///
    /// Valid for `len()` bytes until the mapping is released. Reading
    /// through a write-only mapping (or writing through a read-only one)
    /// is undefined at the driver level.
    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Mapped length in bytes (size of the last upload)
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the mapping covers no bytes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Access mode requested at map time
    pub fn access(&self) -> MapAccess {
        self.access
    }

    /// Release the mapping, reporting device errors
    pub fn unmap(mut self) -> Result<()> {
        self.released = true;
        self.buffer.unmap_client_access()
    }
}

impl Drop for MappedBuffer<'_> {
    fn drop(&mut self) {
        if !self.released {
            if let Err(err) = self.buffer.unmap_client_access() {
                engine_warn!(SOURCE, "Implicit unmap failed: {}", err);
            }
        }
    }
}

// ===== DEVICE HELPERS =====

fn lock_device(
    device: &Arc<Mutex<dyn GraphicsDevice>>,
) -> Result<MutexGuard<'_, dyn GraphicsDevice + 'static>> {
    device.lock().map_err(|_| engine_err!(SOURCE, Error::BackendError(
        "Graphics device lock poisoned".to_string()
    )))
}

/// Bind each fresh handle once, then release the binding point
fn activate_handles(
    device: &mut dyn GraphicsDevice,
    kind: BufferKind,
    handles: &[BufferHandle],
) -> Result<()> {
    for handle in handles {
        device.bind_buffer(kind, Some(*handle))?;
    }
    device.bind_buffer(kind, None)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "multi_buffer_tests.rs"]
mod tests;
