/// Sprite sheet - frame grid inside a texture, with named animations.
///
/// The sheet only computes which frame is current and where it lives in
/// the texture. The caller feeds `uv_rect()` into its texture-coordinate
/// stream (typically a MultiBuffer TEX_COORDS target) each frame.
///
/// Frames are laid out row-major: `rows x columns` cells of `frame_size`
/// pixels starting at pixel `origin`.

use glam::{UVec2, Vec4};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::{engine_bail, engine_debug};

const SOURCE: &str = "galaxy2d::SpriteSheet";

// ===== SPRITE SHEET DESC =====

/// Descriptor for creating a SpriteSheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSheetDesc {
    /// Full texture size in pixels
    pub texture_size: UVec2,
    /// Top-left pixel of the first frame
    pub origin: UVec2,
    /// Size of one frame in pixels
    pub frame_size: UVec2,
    pub rows: u32,
    pub columns: u32,
}

impl Default for SpriteSheetDesc {
    /// A single frame covering a 1x1 texture
    fn default() -> Self {
        Self {
            texture_size: UVec2::ONE,
            origin: UVec2::ZERO,
            frame_size: UVec2::ONE,
            rows: 1,
            columns: 1,
        }
    }
}

// ===== PIXEL RECT =====

/// Frame rectangle in texture pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

// ===== ANIMATION =====

/// Run of consecutive frames on one row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub row: u32,
    pub first_column: u32,
    pub frame_count: u32,
    /// Seconds each frame stays on screen
    pub frame_duration: f32,
    pub looping: bool,
}

#[derive(Debug, Clone)]
struct Playback {
    name: String,
    animation: Animation,
    frame: u32,
    elapsed: f32,
}

impl Playback {
    fn is_finished(&self) -> bool {
        !self.animation.looping && self.frame + 1 >= self.animation.frame_count
    }
}

// ===== SPRITE SHEET =====

#[derive(Debug, Clone)]
pub struct SpriteSheet {
    texture_size: UVec2,
    origin: UVec2,
    frame_size: UVec2,
    rows: u32,
    columns: u32,
    row: u32,
    column: u32,
    animations: FxHashMap<String, Animation>,
    playback: Option<Playback>,
}

impl SpriteSheet {
    /// Create a sheet positioned on frame (0, 0)
    ///
    /// # Errors
    ///
    /// `ConfigurationError` if a size or the grid dimensions are zero, or
    /// if the grid does not fit inside the texture.
    pub fn from_desc(desc: SpriteSheetDesc) -> Result<Self> {
        if desc.texture_size.cmpeq(UVec2::ZERO).any() || desc.frame_size.cmpeq(UVec2::ZERO).any() {
            engine_bail!(SOURCE, Error::ConfigurationError(format!(
                "Texture size {} and frame size {} must be non-zero",
                desc.texture_size, desc.frame_size
            )));
        }
        if desc.rows == 0 || desc.columns == 0 {
            engine_bail!(SOURCE, Error::ConfigurationError(format!(
                "Sprite grid {}x{} must have at least one row and one column",
                desc.rows, desc.columns
            )));
        }

        let fits = |origin: u32, frame: u32, count: u32, texture: u32| {
            origin as u64 + frame as u64 * count as u64 <= texture as u64
        };
        if !fits(desc.origin.x, desc.frame_size.x, desc.columns, desc.texture_size.x)
            || !fits(desc.origin.y, desc.frame_size.y, desc.rows, desc.texture_size.y)
        {
            engine_bail!(SOURCE, Error::ConfigurationError(format!(
                "Sprite grid {}x{} of {} frames at {} exceeds texture {}",
                desc.rows, desc.columns, desc.frame_size, desc.origin, desc.texture_size
            )));
        }

        Ok(Self {
            texture_size: desc.texture_size,
            origin: desc.origin,
            frame_size: desc.frame_size,
            rows: desc.rows,
            columns: desc.columns,
            row: 0,
            column: 0,
            animations: FxHashMap::default(),
            playback: None,
        })
    }

    // ===== GETTERS =====

    pub fn rows(&self) -> u32 { self.rows }

    pub fn columns(&self) -> u32 { self.columns }

    /// Total number of frames in the grid
    pub fn frame_count(&self) -> u32 { self.rows * self.columns }

    /// Current row
    pub fn row(&self) -> u32 { self.row }

    /// Current column
    pub fn column(&self) -> u32 { self.column }

    /// Row-major index of the current frame
    pub fn frame_index(&self) -> u32 {
        self.row * self.columns + self.column
    }

    /// Current frame in texture pixels
    pub fn frame_rect(&self) -> PixelRect {
        PixelRect {
            x: self.origin.x + self.column * self.frame_size.x,
            y: self.origin.y + self.row * self.frame_size.y,
            width: self.frame_size.x,
            height: self.frame_size.y,
        }
    }

    /// Current frame as normalized texture coordinates (u0, v0, u1, v1)
    pub fn uv_rect(&self) -> Vec4 {
        let rect = self.frame_rect();
        let size = self.texture_size.as_vec2();
        Vec4::new(
            rect.x as f32 / size.x,
            rect.y as f32 / size.y,
            (rect.x + rect.width) as f32 / size.x,
            (rect.y + rect.height) as f32 / size.y,
        )
    }

    // ===== MANUAL NAVIGATION =====
    //
    // Moving by hand stops any playing animation.

    /// Jump to `row`, keeping the column
    pub fn set_row(&mut self, row: u32) -> Result<()> {
        if row >= self.rows {
            engine_bail!(SOURCE, Error::OutOfBounds(format!(
                "row {} of a {}-row sheet", row, self.rows
            )));
        }
        self.playback = None;
        self.row = row;
        Ok(())
    }

    /// Jump to `column`, keeping the row
    pub fn set_column(&mut self, column: u32) -> Result<()> {
        if column >= self.columns {
            engine_bail!(SOURCE, Error::OutOfBounds(format!(
                "column {} of a {}-column sheet", column, self.columns
            )));
        }
        self.playback = None;
        self.column = column;
        Ok(())
    }

    /// Jump to a row-major frame index
    pub fn set_frame(&mut self, index: u32) -> Result<()> {
        if index >= self.frame_count() {
            engine_bail!(SOURCE, Error::OutOfBounds(format!(
                "frame {} of a {}-frame sheet", index, self.frame_count()
            )));
        }
        self.playback = None;
        self.row = index / self.columns;
        self.column = index % self.columns;
        Ok(())
    }

    pub fn next_column(&mut self) {
        self.slide(1, 0);
    }

    pub fn previous_column(&mut self) {
        self.slide(-1, 0);
    }

    pub fn next_row(&mut self) {
        self.slide(0, 1);
    }

    pub fn previous_row(&mut self) {
        self.slide(0, -1);
    }

    /// Move by `dx` columns and `dy` rows, wrapping on both axes
    pub fn slide(&mut self, dx: i32, dy: i32) {
        self.playback = None;
        self.column = wrap(self.column, dx, self.columns);
        self.row = wrap(self.row, dy, self.rows);
    }

    // ===== ANIMATIONS =====

    /// Register (or replace) a named animation
    ///
    /// Replacing the playing animation stops it.
    ///
    /// # Errors
    ///
    /// `ConfigurationError` if the animation is empty, has a non-positive
    /// frame duration or runs outside the grid.
    pub fn add_animation(&mut self, name: &str, animation: Animation) -> Result<()> {
        if animation.frame_count == 0 {
            engine_bail!(SOURCE, Error::ConfigurationError(format!(
                "Animation '{}' has no frames", name
            )));
        }
        if !(animation.frame_duration.is_finite() && animation.frame_duration > 0.0) {
            engine_bail!(SOURCE, Error::ConfigurationError(format!(
                "Animation '{}' frame duration must be positive, got {}",
                name, animation.frame_duration
            )));
        }
        let last_column = animation.first_column as u64 + animation.frame_count as u64;
        if animation.row >= self.rows || last_column > self.columns as u64 {
            engine_bail!(SOURCE, Error::ConfigurationError(format!(
                "Animation '{}' (row {}, columns {}..{}) exceeds the {}x{} grid",
                name, animation.row, animation.first_column, last_column, self.rows, self.columns
            )));
        }

        if self.current_animation() == Some(name) {
            self.playback = None;
        }
        self.animations.insert(name.to_string(), animation);
        engine_debug!(SOURCE, "Registered animation '{}' ({} frames)", name, animation.frame_count);
        Ok(())
    }

    /// Registered animation by name
    pub fn animation(&self, name: &str) -> Option<&Animation> {
        self.animations.get(name)
    }

    /// Start `name` from its first frame, restarting it if already playing
    pub fn play(&mut self, name: &str) -> Result<()> {
        let Some(animation) = self.animations.get(name).copied() else {
            engine_bail!(SOURCE, Error::AnimationNotFound(name.to_string()));
        };
        self.row = animation.row;
        self.column = animation.first_column;
        self.playback = Some(Playback {
            name: name.to_string(),
            animation,
            frame: 0,
            elapsed: 0.0,
        });
        engine_debug!(SOURCE, "Playing animation '{}'", name);
        Ok(())
    }

    /// Stop playback, keeping the current frame
    pub fn stop(&mut self) {
        if let Some(playback) = self.playback.take() {
            engine_debug!(SOURCE, "Stopped animation '{}'", playback.name);
        }
    }

    /// Advance the playing animation by `dt` seconds
    ///
    /// Negative or non-finite `dt` is ignored. A non-looping animation holds
    /// its last frame.
    pub fn update(&mut self, dt: f32) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        if playback.is_finished() || !(dt.is_finite() && dt > 0.0) {
            return;
        }

        let animation = playback.animation;
        playback.elapsed += dt;
        let steps = (playback.elapsed / animation.frame_duration).floor();
        playback.elapsed -= steps * animation.frame_duration;
        let steps = steps as u64;

        let frame = (playback.frame as u64).saturating_add(steps);
        playback.frame = if animation.looping {
            (frame % animation.frame_count as u64) as u32
        } else {
            frame.min(animation.frame_count as u64 - 1) as u32
        };
        self.column = animation.first_column + playback.frame;
    }

    /// Whether an animation is playing and has frames left to show
    pub fn is_playing(&self) -> bool {
        self.playback.as_ref().is_some_and(|playback| !playback.is_finished())
    }

    /// Whether the current non-looping animation reached its last frame
    pub fn is_finished(&self) -> bool {
        self.playback.as_ref().is_some_and(Playback::is_finished)
    }

    /// Name of the current animation, until `stop` or manual navigation
    pub fn current_animation(&self) -> Option<&str> {
        self.playback.as_ref().map(|playback| playback.name.as_str())
    }
}

fn wrap(value: u32, delta: i32, len: u32) -> u32 {
    (value as i64 + delta as i64).rem_euclid(len as i64) as u32
}

#[cfg(test)]
#[path = "sprite_sheet_tests.rs"]
mod tests;
