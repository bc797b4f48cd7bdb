//! Logical screen derived from the window size.

use glam::Vec2;
use pharcobial_core::GAME_NAME;
use pharcobial_rendering::WindowConfig;

use crate::{options::GameOptions, SetupError};

/// Factor between the logical screen and the physical window.
pub const PRESENTATION_SCALE: u32 = 2;

/// Logical drawing surface at half the window resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Display {
    width: u32,
    height: u32,
    font_size: u32,
    full_screen: bool,
    fps: u32,
}

impl Display {
    /// Derives the logical screen from the window options.
    #[must_use]
    pub fn new(options: &GameOptions) -> Self {
        Self {
            width: options.window_width / PRESENTATION_SCALE,
            height: options.window_height / PRESENTATION_SCALE,
            font_size: options.font_size,
            full_screen: options.full_screen,
            fps: options.fps,
        }
    }

    /// Confirms the logical screen has an area.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.width == 0 || self.height == 0 {
            return Err(SetupError::EmptyDisplay {
                width: self.width,
                height: self.height,
            });
        }

        log::debug!("Display ready.");
        Ok(())
    }

    /// Logical width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Logical height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Half of the logical width, rounded down.
    #[must_use]
    pub const fn half_width(&self) -> u32 {
        self.width / 2
    }

    /// Half of the logical height, rounded down.
    #[must_use]
    pub const fn half_height(&self) -> u32 {
        self.height / 2
    }

    /// Base font size for HUD text.
    #[must_use]
    pub const fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Logical size as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Window the backend should open to present this display.
    #[must_use]
    pub fn window_config(&self) -> WindowConfig {
        WindowConfig::new(
            GAME_NAME,
            self.width * PRESENTATION_SCALE,
            self.height * PRESENTATION_SCALE,
            self.fps,
        )
        .with_full_screen(self.full_screen)
        .with_scale(PRESENTATION_SCALE as f32)
    }
}
