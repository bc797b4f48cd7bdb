//! User-tunable settings loaded from an optional TOML file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use pharcobial_core::{Key, KeyBindings};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or validating options.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// The options file could not be read.
    #[error("failed to read options file {}", .path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The options document is not valid TOML for [`GameOptions`].
    #[error("malformed options")]
    Parse(#[from] toml::de::Error),
    /// The frame-rate target is zero.
    #[error("fps must be positive")]
    InvalidFps,
    /// A window dimension is too small to produce a logical screen.
    #[error("window {width}x{height} is too small")]
    InvalidWindow {
        /// Requested window width.
        width: u32,
        /// Requested window height.
        height: u32,
    },
    /// No map identifier was given.
    #[error("map id must not be empty")]
    EmptyMapId,
    /// One key drives two controls.
    #[error("key {key:?} is bound to more than one control")]
    DuplicateBinding {
        /// Key bound twice.
        key: Key,
    },
}

/// Settings that shape a game session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// Map loaded at startup.
    pub map_id: String,
    /// Directory holding `maps/` and `gfx/`.
    pub assets_dir: PathBuf,
    /// Physical window width in pixels.
    pub window_width: u32,
    /// Physical window height in pixels.
    pub window_height: u32,
    /// Base font size for HUD text.
    pub font_size: u32,
    /// Whether the window covers the whole screen.
    pub full_screen: bool,
    /// Target frames per second.
    pub fps: u32,
    /// Whether music is muted.
    pub disable_music: bool,
    /// Whether sound effects are muted.
    pub disable_sfx: bool,
    /// Whether the world view draws the heads-up display.
    pub show_hud: bool,
    /// Seed for the ambush trigger; entropy is used when absent.
    pub seed: Option<u64>,
    /// Keys driving each control.
    pub key_bindings: KeyBindings,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            map_id: "default".to_owned(),
            assets_dir: PathBuf::from("assets"),
            window_width: 1280,
            window_height: 960,
            font_size: 24,
            full_screen: false,
            fps: 60,
            disable_music: false,
            disable_sfx: false,
            show_hud: true,
            seed: None,
            key_bindings: KeyBindings::default(),
        }
    }
}

impl GameOptions {
    /// Parses options from a TOML document; missing fields keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads and parses the TOML options file at `path`.
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Rejects settings the game cannot run with.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.fps == 0 {
            return Err(OptionsError::InvalidFps);
        }
        if self.window_width < 2 || self.window_height < 2 {
            return Err(OptionsError::InvalidWindow {
                width: self.window_width,
                height: self.window_height,
            });
        }
        if self.map_id.trim().is_empty() {
            return Err(OptionsError::EmptyMapId);
        }
        if let Some(key) = self.key_bindings.duplicate() {
            return Err(OptionsError::DuplicateBinding { key });
        }

        log::debug!("Options ready.");
        Ok(())
    }

    /// Directory holding map tile and metadata files.
    #[must_use]
    pub fn maps_dir(&self) -> PathBuf {
        self.assets_dir.join("maps")
    }

    /// Directory holding graphic files.
    #[must_use]
    pub fn graphics_dir(&self) -> PathBuf {
        self.assets_dir.join("gfx")
    }
}
