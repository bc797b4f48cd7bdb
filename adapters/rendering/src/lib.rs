#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Pharcobial adapters.
//!
//! Everything here is backend agnostic: views describe what to draw through
//! [`SpritePresentation`] snapshots, a [`Camera`] turns world pixels into
//! screen pixels, the [`RenderGroup`] decides draw order, and a backend only
//! has to provide a [`Canvas`] and implement [`RenderingBackend`].

mod cache;
mod camera;
mod governor;
mod group;

use anyhow::Result as AnyResult;
use glam::Vec2;
use pharcobial_core::{GraphicCatalog, GraphicKey, InputEvent, Layer, Rect, SpriteId};
use std::{error::Error, fmt};

pub use self::{
    cache::{GraphicSource, GraphicsCache},
    camera::Camera,
    governor::FrameGovernor,
    group::{DrawCommand, RenderGroup},
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque black used to clear the screen.
    pub const BLACK: Self = Self::from_rgb_u8(0, 0, 0);
    /// Opaque white used for idle menu items and the HUD.
    pub const WHITE: Self = Self::from_rgb_u8(255, 255, 255);
    /// Opaque green used for the selected menu item.
    pub const GREEN: Self = Self::from_rgb_u8(0, 255, 0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Snapshot of an entity handed to the render group each frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpritePresentation {
    /// Identifier of the entity.
    pub id: SpriteId,
    /// Collision rectangle in world pixels.
    pub rect: Rect,
    /// Graphic currently shown.
    pub graphic: GraphicKey,
    /// Draw pass the entity belongs to.
    pub layer: Layer,
    /// Whether the entity is drawn at all.
    pub visible: bool,
}

/// Font size and color used when drawing text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in logical pixels.
    pub size: f32,
    /// Fill color.
    pub color: Color,
}

impl TextStyle {
    /// Creates a text style.
    #[must_use]
    pub const fn new(size: f32, color: Color) -> Self {
        Self { size, color }
    }
}

/// Where a line of text is anchored on the logical screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextPosition {
    /// Top-left corner of the text at the given logical position.
    At(Vec2),
}

/// Drawing surface provided by a rendering backend for a single frame.
///
/// Coordinates are logical screen pixels; the backend applies its own
/// presentation scale.
pub trait Canvas: GraphicCatalog {
    /// Fills the whole surface with `color`.
    fn clear(&mut self, color: Color);

    /// Draws a graphic with its top-left corner at `position`.
    fn draw_graphic(&mut self, key: &GraphicKey, position: Vec2) -> Result<(), GraphicError>;

    /// Draws a line of text.
    fn draw_text(&mut self, text: &str, style: TextStyle, position: TextPosition);
}

/// Window parameters requested from the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    /// Title used by the created window.
    pub title: String,
    /// Physical window width in pixels.
    pub width: u32,
    /// Physical window height in pixels.
    pub height: u32,
    /// Whether the window covers the whole screen.
    pub full_screen: bool,
    /// Target frames per second.
    pub fps: u32,
    /// Factor applied to logical coordinates when presenting.
    pub scale: f32,
}

impl WindowConfig {
    /// Creates a windowed configuration with a presentation scale of one.
    #[must_use]
    pub fn new(title: impl Into<String>, width: u32, height: u32, fps: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            full_screen: false,
            fps,
            scale: 1.0,
        }
    }

    /// Overrides whether the window covers the whole screen.
    #[must_use]
    pub fn with_full_screen(mut self, full_screen: bool) -> Self {
        self.full_screen = full_screen;
        self
    }

    /// Overrides the presentation scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

/// Input gathered by the backend before a frame is simulated.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Raw input events in the order they were observed.
    pub events: Vec<InputEvent>,
}

/// Whether the backend should keep running after the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    /// Present the frame and continue.
    Continue,
    /// Leave the loop and release platform resources.
    Exit,
}

/// Rendering backend capable of driving the Pharcobial frame loop.
pub trait RenderingBackend {
    /// Opens the window and runs until the frame closure requests an exit.
    ///
    /// The closure receives the input observed this frame together with the
    /// canvas to draw on. An error returned from the closure stops the loop
    /// and is propagated to the caller.
    fn run<F>(self, config: WindowConfig, frame: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut dyn Canvas) -> AnyResult<LoopControl> + 'static;
}

/// Errors reported when a graphic cannot be drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphicError {
    /// No asset exists under the requested identifier.
    NotFound {
        /// Requested graphic identifier.
        id: String,
    },
    /// The asset exists but could not be decoded.
    Invalid {
        /// Requested graphic identifier.
        id: String,
        /// Decoder failure description.
        reason: String,
    },
}

impl fmt::Display for GraphicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "graphic `{id}` not found"),
            Self::Invalid { id, reason } => {
                write!(f, "graphic `{id}` could not be decoded: {reason}")
            }
        }
    }
}

impl Error for GraphicError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_colors_are_normalised() {
        let color = Color::from_rgb_u8(255, 0, 51);

        assert_eq!(color, Color::new(1.0, 0.0, 0.2, 1.0));
        assert_eq!(Color::GREEN.green, 1.0);
    }

    #[test]
    fn graphic_errors_name_the_missing_asset() {
        let error = GraphicError::NotFound {
            id: "bush-monster".to_owned(),
        };

        assert_eq!(error.to_string(), "graphic `bush-monster` not found");
    }

    #[test]
    fn window_config_builders_override_defaults() {
        let config = WindowConfig::new("Pharcobial", 1280, 960, 60)
            .with_full_screen(true)
            .with_scale(2.0);

        assert!(config.full_screen);
        assert_eq!(config.scale, 2.0);
        assert_eq!(config.fps, 60);
    }
}
