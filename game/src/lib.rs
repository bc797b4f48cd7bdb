#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session orchestration for Pharcobial.
//!
//! [`Game::setup`] builds every subsystem in a fixed order from
//! [`GameOptions`]; a rendering backend then calls [`Game::frame`] once per
//! frame until it returns [`pharcobial_rendering::LoopControl::Exit`].

pub mod display;
pub mod events;
mod game;
pub mod menu;
pub mod options;
pub mod views;
pub mod world_view;

pub use crate::{
    display::Display,
    events::EventDispatcher,
    game::{Game, SetupError},
    menu::{Menu, MenuAction, MenuItem},
    options::{GameOptions, OptionsError},
    views::{SimulationClock, Transition, View, ViewId, ViewStack, ViewStackError},
    world_view::WorldView,
};
