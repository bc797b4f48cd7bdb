#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Pharcobial.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! All macroquad calls live in this crate. The game only sees the
//! [`Canvas`] trait and [`InputEvent`]s.

mod canvas;

use std::{
    path::PathBuf,
    sync::mpsc,
    thread,
    time::Instant,
};

use anyhow::{anyhow, Result};
use macroquad::input::{
    is_key_pressed, is_key_released, is_quit_requested, prevent_quit, KeyCode,
};
use pharcobial_core::{InputEvent, Key};
use pharcobial_rendering::{
    Canvas, FrameGovernor, FrameInput, LoopControl, RenderingBackend, WindowConfig,
};

pub use self::canvas::{MacroquadCanvas, TextureGraphic, TextureSource};

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    graphics_dir: PathBuf,
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Returns a backend loading graphics from `graphics_dir`.
    #[must_use]
    pub fn new(graphics_dir: impl Into<PathBuf>) -> Self {
        Self {
            graphics_dir: graphics_dir.into(),
            swap_interval: None,
        }
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or leave pacing entirely to the frame governor.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

/// Macroquad key code polled for `key`.
#[must_use]
pub fn key_code(key: Key) -> KeyCode {
    match key {
        Key::Up => KeyCode::Up,
        Key::Down => KeyCode::Down,
        Key::Left => KeyCode::Left,
        Key::Right => KeyCode::Right,
        Key::W => KeyCode::W,
        Key::A => KeyCode::A,
        Key::S => KeyCode::S,
        Key::D => KeyCode::D,
        Key::Space => KeyCode::Space,
        Key::Enter => KeyCode::Enter,
        Key::Escape => KeyCode::Escape,
    }
}

fn poll_input() -> Vec<InputEvent> {
    let mut events = Vec::new();
    if is_quit_requested() {
        events.push(InputEvent::Quit);
    }

    for key in Key::ALL {
        let code = key_code(key);
        if is_key_pressed(code) {
            log::debug!("key down {key:?}");
            events.push(InputEvent::KeyDown(key));
        }
        if is_key_released(code) {
            events.push(InputEvent::KeyUp(key));
        }
    }
    events
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, config: WindowConfig, mut frame: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut dyn Canvas) -> Result<LoopControl> + 'static,
    {
        let Self {
            graphics_dir,
            swap_interval,
        } = self;

        let WindowConfig {
            title,
            width,
            height,
            full_screen,
            fps,
            scale,
        } = config;

        let mut conf = macroquad::window::Conf {
            window_title: title,
            window_width: i32::try_from(width)?,
            window_height: i32::try_from(height)?,
            fullscreen: full_screen,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            conf.platform.swap_interval = Some(swap_interval);
        }

        let (outcome_sender, outcome_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(conf, async move {
            prevent_quit();
            let governor = FrameGovernor::new(fps);
            let mut canvas = MacroquadCanvas::new(TextureSource::new(graphics_dir), scale);
            log::info!("window opened");

            let outcome = loop {
                let started = Instant::now();
                let input = FrameInput {
                    events: poll_input(),
                };

                match frame(input, &mut canvas) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break Ok(()),
                    Err(error) => break Err(error),
                }

                thread::sleep(governor.remaining(started.elapsed()));
                macroquad::window::next_frame().await;
            };

            let released = canvas.release();
            log::info!("closing window after releasing {released} textures");
            let _ = outcome_sender.send(outcome);
        });

        outcome_receiver
            .recv()
            .unwrap_or_else(|_| Err(anyhow!("window closed before the game loop finished")))
    }
}
