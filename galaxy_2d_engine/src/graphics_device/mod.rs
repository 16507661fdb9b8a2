/// Graphics device module - the primitive rendering facade and its value types

// Module declarations
pub mod graphics_device;
pub mod buffer;
pub mod draw;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use buffer::*;
pub use draw::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
