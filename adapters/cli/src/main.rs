#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Pharcobial in a macroquad window.

mod args;

use anyhow::{Context, Result};
use clap::Parser;
use pharcobial_game::Game;
use pharcobial_rendering::RenderingBackend;
use pharcobial_rendering_macroquad::MacroquadBackend;

use crate::args::Args;

/// Entry point for the Pharcobial command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();

    let options = args.options()?;
    let graphics_dir = options.graphics_dir();
    let mut game = Game::setup(options).context("failed to set up the game")?;
    let window = game.window_config();
    log::info!("starting {}x{} window", window.width, window.height);

    MacroquadBackend::new(graphics_dir)
        .with_vsync(false)
        .run(window, move |input, canvas| game.frame(input, canvas))
        .context("game loop failed")?;

    log::info!("Goodbye.");
    Ok(())
}
