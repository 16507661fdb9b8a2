/*!
# Galaxy 2D Engine

Buffer management for a 2D rendering layer.

The centerpiece is the `MultiBuffer`: a single logical vertex buffer that
multiplexes up to three attribute streams (positions, colors, texture
coordinates) over one binding point, with one physical buffer object per
stream. All GPU work goes through the `GraphicsDevice` trait, so backends
(GL-style contexts) and test doubles plug in the same way.

## Architecture

- **GraphicsDevice**: Primitive rendering facade (bind, upload, map, draw)
- **BufferTargets**: Capability mask of attribute streams
- **MultiBuffer**: Per-stream handles, binding and data-state tracking
- **SpriteSheet**: Frame grid and animations producing texture coordinates
*/

// Internal modules
mod error;
mod engine;
mod utils;
pub mod log;
pub mod graphics_device;
pub mod resource;
pub mod sprite;

// Main galaxy2d namespace module
pub mod galaxy2d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Primitive rendering facade
    pub use crate::graphics_device::GraphicsDevice;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render sub-module with the device value types
    pub mod render {
        pub use crate::graphics_device::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Sprite sub-module
    pub mod sprite {
        pub use crate::sprite::*;
    }
}

// Re-export math library at crate root
pub use glam;
