//! Translation of raw input into game-level actions.

use pharcobial_core::{Control, ControlEvent, GameAction, InputEvent, KeyBindings};

use crate::views::ViewId;

/// Resolves raw input through the key bindings and decides what the loop does with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventDispatcher {
    bindings: KeyBindings,
}

impl EventDispatcher {
    /// Creates a dispatcher using `bindings`.
    #[must_use]
    pub const fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    /// Maps a raw event to an action given the currently active view.
    ///
    /// Window close always quits. Escape pressed while the world is active
    /// opens the main menu; everywhere else it is forwarded so menus can close
    /// themselves. Keys without a binding produce no action.
    #[must_use]
    pub fn dispatch(&self, event: InputEvent, active: ViewId) -> Option<GameAction> {
        if event == InputEvent::Quit {
            return Some(GameAction::Quit);
        }

        let control = self.bindings.resolve(event)?;
        match (control, active) {
            (ControlEvent::Pressed(Control::Escape), ViewId::World) => Some(GameAction::OpenMenu),
            _ => Some(GameAction::Continue(control)),
        }
    }
}
