/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Behaves like a GL-style context: one binding per buffer kind, one data
/// store per buffer object, at most one mapped buffer. Every accepted call
/// is recorded so tests can assert on the exact traffic a MultiBuffer
/// generates. Invalid sequences fail with `Error::DriverStateError`.

use std::ptr::NonNull;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphics_device::{
    GraphicsDevice, BufferHandle, BufferKind, UsageHint, MapAccess,
    PrimitiveTopology, IndexType, Indices,
};
use crate::resource::BufferTargets;

// ============================================================================
// Recorded calls
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    CreateBuffers(usize),
    DestroyBuffers(Vec<BufferHandle>),
    BindBuffer(BufferKind, Option<BufferHandle>),
    BufferData { kind: BufferKind, handle: BufferHandle, len: usize, usage: UsageHint },
    BufferSubData { kind: BufferKind, handle: BufferHandle, offset: u64, len: usize },
    MapBuffer(BufferKind, MapAccess),
    UnmapBuffer(BufferKind),
    EnableAttributeState(BufferTargets),
    DisableAttributeState(BufferTargets),
    EnableAllAttributeStates,
    DisableAllAttributeStates,
    DrawArrays { topology: PrimitiveTopology, count: u32, first: u32 },
    DrawIndexed { topology: PrimitiveTopology, count: u32, index_type: IndexType },
    DrawRangeIndexed {
        topology: PrimitiveTopology,
        count: u32,
        index_type: IndexType,
        start: u32,
        end: u32,
    },
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

#[derive(Debug, Default)]
pub struct MockGraphicsDevice {
    calls: Vec<DeviceCall>,
    next_handle: u32,
    stores: FxHashMap<BufferHandle, Vec<u8>>,
    bindings: FxHashMap<BufferKind, BufferHandle>,
    mapped: Option<(BufferKind, BufferHandle)>,
    enabled: BufferTargets,
    fail_at: Option<(usize, Error)>,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            ..Default::default()
        }
    }

    /// Make the next device call fail with `error`
    pub fn fail_next(&mut self, error: Error) {
        self.fail_after(0, error);
    }

    /// Let `accepted` more calls through, then fail the following one with `error`
    pub fn fail_after(&mut self, accepted: usize, error: Error) {
        self.fail_at = Some((accepted, error));
    }

    /// Accepted calls, in order
    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Buffer currently bound to `kind`
    pub fn bound(&self, kind: BufferKind) -> Option<BufferHandle> {
        self.bindings.get(&kind).copied()
    }

    /// Data store of a live buffer
    pub fn data(&self, handle: BufferHandle) -> Option<&[u8]> {
        self.stores.get(&handle).map(|store| store.as_slice())
    }

    /// Number of allocated, not yet destroyed buffers
    pub fn live_buffers(&self) -> usize {
        self.stores.len()
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped.is_some()
    }

    /// Attribute arrays currently enabled
    pub fn enabled_attributes(&self) -> BufferTargets {
        self.enabled
    }

    // ===== INTERNAL HELPERS =====

    fn check_injected_failure(&mut self) -> Result<()> {
        match self.fail_at.take() {
            Some((0, error)) => Err(error),
            Some((remaining, error)) => {
                self.fail_at = Some((remaining - 1, error));
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn bound_handle(&self, kind: BufferKind) -> Result<BufferHandle> {
        self.bound(kind).ok_or_else(|| {
            Error::DriverStateError(format!("no buffer bound to {:?}", kind))
        })
    }

    fn check_not_mapped(&self, handle: BufferHandle, op: &str) -> Result<()> {
        match self.mapped {
            Some((_, mapped)) if mapped == handle => Err(Error::DriverStateError(
                format!("{} on mapped buffer {}", op, handle.raw()),
            )),
            _ => Ok(()),
        }
    }

    fn check_can_draw(&self) -> Result<()> {
        if self.mapped.is_some() {
            return Err(Error::DriverStateError("draw while a buffer is mapped".to_string()));
        }
        Ok(())
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_buffers(&mut self, count: usize) -> Result<Vec<BufferHandle>> {
        self.check_injected_failure()?;
        let mut handles = Vec::with_capacity(count);
        for _ in 0..count {
            let handle = BufferHandle::new(self.next_handle)
                .ok_or_else(|| Error::BackendError("buffer names exhausted".to_string()))?;
            self.next_handle += 1;
            self.stores.insert(handle, Vec::new());
            handles.push(handle);
        }
        self.calls.push(DeviceCall::CreateBuffers(count));
        Ok(handles)
    }

    fn destroy_buffers(&mut self, handles: &[BufferHandle]) -> Result<()> {
        self.check_injected_failure()?;
        for handle in handles {
            self.check_not_mapped(*handle, "destroy")?;
        }
        for handle in handles {
            self.stores.remove(handle);
            self.bindings.retain(|_, bound| bound != handle);
        }
        self.calls.push(DeviceCall::DestroyBuffers(handles.to_vec()));
        Ok(())
    }

    fn bind_buffer(&mut self, kind: BufferKind, handle: Option<BufferHandle>) -> Result<()> {
        self.check_injected_failure()?;
        match handle {
            Some(handle) => {
                if !self.stores.contains_key(&handle) {
                    return Err(Error::DriverStateError(
                        format!("bind of unknown buffer {}", handle.raw()),
                    ));
                }
                self.bindings.insert(kind, handle);
            }
            None => {
                self.bindings.remove(&kind);
            }
        }
        self.calls.push(DeviceCall::BindBuffer(kind, handle));
        Ok(())
    }

    fn buffer_data(&mut self, kind: BufferKind, data: &[u8], usage: UsageHint) -> Result<()> {
        self.check_injected_failure()?;
        let handle = self.bound_handle(kind)?;
        self.check_not_mapped(handle, "buffer_data")?;
        self.stores.insert(handle, data.to_vec());
        self.calls.push(DeviceCall::BufferData { kind, handle, len: data.len(), usage });
        Ok(())
    }

    fn buffer_sub_data(&mut self, kind: BufferKind, offset: u64, data: &[u8]) -> Result<()> {
        self.check_injected_failure()?;
        let handle = self.bound_handle(kind)?;
        self.check_not_mapped(handle, "buffer_sub_data")?;
        let store = self.stores.get_mut(&handle)
            .ok_or_else(|| Error::DriverStateError(format!("unknown buffer {}", handle.raw())))?;
        let start = offset as usize;
        let end = start + data.len();
        if end > store.len() {
            return Err(Error::DriverStateError(
                format!("sub data {}..{} exceeds store of {} bytes", start, end, store.len()),
            ));
        }
        store[start..end].copy_from_slice(data);
        self.calls.push(DeviceCall::BufferSubData { kind, handle, offset, len: data.len() });
        Ok(())
    }

    fn map_buffer(&mut self, kind: BufferKind, access: MapAccess) -> Result<NonNull<u8>> {
        self.check_injected_failure()?;
        if self.mapped.is_some() {
            return Err(Error::DriverStateError("buffer already mapped".to_string()));
        }
        let handle = self.bound_handle(kind)?;
        let store = self.stores.get_mut(&handle)
            .ok_or_else(|| Error::DriverStateError(format!("unknown buffer {}", handle.raw())))?;
        let ptr = NonNull::new(store.as_mut_ptr())
            .ok_or_else(|| Error::BackendError("null data store".to_string()))?;
        self.mapped = Some((kind, handle));
        self.calls.push(DeviceCall::MapBuffer(kind, access));
        Ok(ptr)
    }

    fn unmap_buffer(&mut self, kind: BufferKind) -> Result<()> {
        self.check_injected_failure()?;
        match self.mapped {
            Some((mapped_kind, _)) if mapped_kind == kind => {
                self.mapped = None;
                self.calls.push(DeviceCall::UnmapBuffer(kind));
                Ok(())
            }
            _ => Err(Error::DriverStateError(format!("no buffer mapped on {:?}", kind))),
        }
    }

    fn enable_attribute_state(&mut self, target: BufferTargets) -> Result<()> {
        self.check_injected_failure()?;
        self.enabled |= target;
        self.calls.push(DeviceCall::EnableAttributeState(target));
        Ok(())
    }

    fn disable_attribute_state(&mut self, target: BufferTargets) -> Result<()> {
        self.check_injected_failure()?;
        self.enabled.remove(target);
        self.calls.push(DeviceCall::DisableAttributeState(target));
        Ok(())
    }

    fn enable_all_attribute_states(&mut self) -> Result<()> {
        self.check_injected_failure()?;
        self.enabled = BufferTargets::ALL;
        self.calls.push(DeviceCall::EnableAllAttributeStates);
        Ok(())
    }

    fn disable_all_attribute_states(&mut self) -> Result<()> {
        self.check_injected_failure()?;
        self.enabled = BufferTargets::NONE;
        self.calls.push(DeviceCall::DisableAllAttributeStates);
        Ok(())
    }

    fn draw_arrays(&mut self, topology: PrimitiveTopology, count: u32, first: u32) -> Result<()> {
        self.check_injected_failure()?;
        self.check_can_draw()?;
        self.calls.push(DeviceCall::DrawArrays { topology, count, first });
        Ok(())
    }

    fn draw_indexed(
        &mut self,
        topology: PrimitiveTopology,
        count: u32,
        indices: Indices<'_>,
    ) -> Result<()> {
        self.check_injected_failure()?;
        self.check_can_draw()?;
        self.calls.push(DeviceCall::DrawIndexed {
            topology,
            count,
            index_type: indices.index_type(),
        });
        Ok(())
    }

    fn draw_range_indexed(
        &mut self,
        topology: PrimitiveTopology,
        count: u32,
        indices: Indices<'_>,
        start: u32,
        end: u32,
    ) -> Result<()> {
        self.check_injected_failure()?;
        self.check_can_draw()?;
        if start > end {
            return Err(Error::DriverStateError(format!("range start {} > end {}", start, end)));
        }
        self.calls.push(DeviceCall::DrawRangeIndexed {
            topology,
            count,
            index_type: indices.index_type(),
            start,
            end,
        });
        Ok(())
    }
}
