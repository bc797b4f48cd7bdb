//! Stack of screens where only the top one is live.

use pharcobial_core::ControlEvent;
use pharcobial_rendering::Canvas;
use thiserror::Error;

use crate::options::GameOptions;

/// Identifies each screen the game can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewId {
    /// The explorable level.
    World,
    /// Continue, Options and Quit.
    MainMenu,
    /// Back plus audio toggles.
    OptionsMenu,
}

/// Whether the level simulation advances this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationClock {
    /// The world view is on top and simulates.
    Running,
    /// A menu covers the world.
    Paused,
}

/// Invalid operations on the view stack.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewStackError {
    /// Only the permanent world view was left to pop.
    #[error("cannot pop the base view")]
    BaseView,
}

/// What the active view asks the loop to do after handling input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Stay on the current view.
    None,
    /// Show another view on top.
    Push(ViewId),
    /// Return to the view underneath.
    Pop,
    /// Stop the game.
    Quit,
}

/// A screen driven by the game loop.
///
/// Only the view on top of the stack receives input and draws.
pub trait View {
    /// Identifier of the view.
    fn id(&self) -> ViewId;

    /// Reacts to a control edge, possibly changing options.
    fn handle_control(&mut self, event: ControlEvent, options: &mut GameOptions) -> Transition;

    /// Advances the view by one frame.
    fn update(&mut self, clock: SimulationClock, canvas: &mut dyn Canvas);

    /// Draws the view.
    fn draw(&mut self, canvas: &mut dyn Canvas);
}

/// Ordered views with the world as the permanent base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewStack {
    views: Vec<ViewId>,
}

impl Default for ViewStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewStack {
    /// Creates a stack holding only the world view.
    #[must_use]
    pub fn new() -> Self {
        Self {
            views: vec![ViewId::World],
        }
    }

    /// Shows `view` on top.
    pub fn push(&mut self, view: ViewId) {
        log::debug!("pushing {view:?}");
        self.views.push(view);
    }

    /// Removes the top view, returning it.
    pub fn pop(&mut self) -> Result<ViewId, ViewStackError> {
        if self.views.len() <= 1 {
            return Err(ViewStackError::BaseView);
        }
        let popped = self.views.pop().ok_or(ViewStackError::BaseView)?;
        log::debug!("popped {popped:?}");
        Ok(popped)
    }

    /// View receiving input, updates and draws.
    #[must_use]
    pub fn active(&self) -> ViewId {
        self.views.last().copied().unwrap_or(ViewId::World)
    }

    /// Running only while the world is on top.
    #[must_use]
    pub fn clock(&self) -> SimulationClock {
        if self.active() == ViewId::World {
            SimulationClock::Running
        } else {
            SimulationClock::Paused
        }
    }

    /// Number of views on the stack.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.views.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushing_a_menu_pauses_and_popping_resumes() {
        let mut stack = ViewStack::new();
        assert_eq!(stack.active(), ViewId::World);
        assert_eq!(stack.clock(), SimulationClock::Running);

        stack.push(ViewId::MainMenu);
        assert_eq!(stack.active(), ViewId::MainMenu);
        assert_eq!(stack.clock(), SimulationClock::Paused);

        stack.push(ViewId::OptionsMenu);
        assert_eq!(stack.pop(), Ok(ViewId::OptionsMenu));
        assert_eq!(stack.clock(), SimulationClock::Paused);

        assert_eq!(stack.pop(), Ok(ViewId::MainMenu));
        assert_eq!(stack.active(), ViewId::World);
        assert_eq!(stack.clock(), SimulationClock::Running);
    }

    #[test]
    fn base_view_cannot_be_popped() {
        let mut stack = ViewStack::new();

        assert_eq!(stack.pop(), Err(ViewStackError::BaseView));
        assert_eq!(stack.depth(), 1);
    }
}
