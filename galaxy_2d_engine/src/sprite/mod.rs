//! Sprite helpers
//!
//! Frame selection for sprite sheets. Produces texture coordinates for
//! the TEX_COORDS stream of a MultiBuffer.

mod sprite_sheet;

pub use sprite_sheet::{SpriteSheet, SpriteSheetDesc, PixelRect, Animation};
