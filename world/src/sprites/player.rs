use pharcobial_core::{Control, ControlEvent, GraphicKey, Position, SpriteId, BLOCK_SIZE};

use super::{Sprite, SpriteBase, SpriteKind, UpdateContext};

/// Fraction of a block the player covers per frame along each held axis.
pub const PLAYER_SPEED: f32 = 0.24;

/// The input-driven main character.
#[derive(Clone, Debug)]
pub struct Player {
    base: SpriteBase,
    character: String,
    held: HeldDirections,
    walk_frame: i32,
    flipped: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct HeldDirections {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl HeldDirections {
    fn vector(self) -> (i32, i32) {
        (
            i32::from(self.right) - i32::from(self.left),
            i32::from(self.down) - i32::from(self.up),
        )
    }

    fn set(&mut self, control: Control, held: bool) -> bool {
        let slot = match control {
            Control::Up => &mut self.up,
            Control::Down => &mut self.down,
            Control::Left => &mut self.left,
            Control::Right => &mut self.right,
            Control::Activate | Control::Enter | Control::Escape => return false,
        };
        *slot = held;
        true
    }
}

impl Player {
    /// Creates the player at `position`, drawn with the `character` graphics.
    #[must_use]
    pub fn new(id: SpriteId, position: Position, character: impl Into<String>) -> Self {
        let character = character.into();
        Self {
            base: SpriteBase::new(id, position, GraphicKey::new(character.clone())),
            character,
            held: HeldDirections::default(),
            walk_frame: -1,
            flipped: false,
        }
    }

    /// Current direction as `(x, y)` components in `-1..=1`.
    #[must_use]
    pub fn direction(&self) -> (i32, i32) {
        self.held.vector()
    }

    /// Whether any held direction produces movement.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.direction() != (0, 0)
    }

    /// Whether standing frames are drawn mirrored.
    #[must_use]
    pub const fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Applies a directional key press or release.
    ///
    /// Pressing a direction adds one to its axis and releasing it takes the
    /// contribution away again, so opposite directions held together cancel.
    pub fn handle_control(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::Pressed(control) => {
                if self.held.set(control, true) {
                    log::debug!("{control:?} pressed.");
                    let (x, y) = self.direction();
                    self.flipped = x > 0 || (y < 0 && x >= 0);
                }
            }
            ControlEvent::Released(control) => {
                let _ = self.held.set(control, false);
            }
        }
    }

    /// Forgets every held direction.
    pub fn halt(&mut self) {
        self.held = HeldDirections::default();
    }

    /// Pixels covered per frame along a held axis.
    #[must_use]
    pub fn step_length() -> f32 {
        BLOCK_SIZE as f32 * PLAYER_SPEED
    }

    fn walk_cycle() -> i32 {
        Self::step_length().round() as i32
    }

    fn next_graphic(&mut self) -> GraphicKey {
        if !self.is_moving() {
            return GraphicKey::with_orientation(self.character.clone(), self.flipped);
        }

        self.walk_frame += 1;
        let cycle = Self::walk_cycle();
        let id = if (0..cycle).contains(&self.walk_frame) {
            format!("{}-walk-1", self.character)
        } else if (cycle..=cycle * 2).contains(&self.walk_frame) {
            format!("{}-walk-2", self.character)
        } else {
            self.walk_frame = -1;
            self.character.clone()
        };

        GraphicKey::with_orientation(id, self.flipped)
    }
}

impl Sprite for Player {
    fn base(&self) -> &SpriteBase {
        &self.base
    }

    fn kind(&self) -> SpriteKind {
        SpriteKind::Player
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let graphic = self.next_graphic();
        if ctx.graphics.contains(&graphic) {
            self.base.set_graphic(graphic);
        }

        if !self.is_moving() {
            return;
        }

        let (dx, dy) = self.direction();
        let length = Self::step_length();
        let position = self.base.position();
        let destination = Position::new(
            (position.x() as f32 + dx as f32 * length).round() as i32,
            (position.y() as f32 + dy as f32 * length).round() as i32,
        );
        let _ = self.base.move_to(destination, &ctx.collision);
    }
}
