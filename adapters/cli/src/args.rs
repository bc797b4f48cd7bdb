//! Command-line flags layered over the options file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pharcobial_game::GameOptions;

/// Explore a small tile world, chat with its residents and dodge the bushes.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub(crate) struct Args {
    /// TOML options file; defaults apply when omitted
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Map to load from `<assets>/maps`
    #[arg(long)]
    pub(crate) map: Option<String>,
    /// Directory holding `maps/` and `gfx/`
    #[arg(long)]
    pub(crate) assets: Option<PathBuf>,
    /// Cover the whole screen
    #[arg(long)]
    pub(crate) fullscreen: bool,
    /// Target frames per second
    #[arg(long)]
    pub(crate) fps: Option<u32>,
    /// Seed for the bush ambush rolls
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Hide the map and position overlay
    #[arg(long)]
    pub(crate) no_hud: bool,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short)]
    pub(crate) verbose: bool,
}

impl Args {
    /// Default log filter for the chosen verbosity.
    pub(crate) fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Loads the options file, if any, then applies the flags on top.
    pub(crate) fn options(&self) -> Result<GameOptions> {
        let options = match &self.config {
            Some(path) => GameOptions::from_toml_path(path)
                .with_context(|| format!("failed to load options from {}", path.display()))?,
            None => GameOptions::default(),
        };
        Ok(self.apply(options))
    }

    fn apply(&self, mut options: GameOptions) -> GameOptions {
        if let Some(map) = &self.map {
            options.map_id = map.clone();
        }
        if let Some(assets) = &self.assets {
            options.assets_dir = assets.clone();
        }
        if self.fullscreen {
            options.full_screen = true;
        }
        if let Some(fps) = self.fps {
            options.fps = fps;
        }
        if let Some(seed) = self.seed {
            options.seed = Some(seed);
        }
        if self.no_hud {
            options.show_hud = false;
        }
        options
    }
}
