//! Entities that live on the map.
//!
//! Every entity shares a [`SpriteBase`] holding its identifier, top-left
//! position, current graphic and visibility. Behaviour is layered on top via
//! the [`Sprite`] trait, which the world drives once per simulated frame.

mod adversary;
mod npc;
mod player;
mod tile;

use std::fmt;

use pharcobial_core::{GraphicCatalog, GraphicKey, Layer, Position, Rect, SpriteId};
use pharcobial_system_pursuit::Trigger;

use crate::collision::CollisionView;

pub use self::{
    adversary::{Bush, BushMonster, BUSH_SPEED, MONSTER_SPEED},
    npc::{Bubble, Npc, BUBBLE_LIFETIME},
    player::{Player, PLAYER_SPEED},
    tile::Tile,
};

/// Broad category an entity belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    /// The input-driven main character.
    Player,
    /// A static, talkative character.
    Npc,
    /// An AI-driven enemy.
    Adversary,
    /// A ground tile decoration.
    Tile,
    /// A short-lived visual effect.
    Effect,
}

/// State shared by every entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteBase {
    id: SpriteId,
    position: Position,
    graphic: GraphicKey,
    visible: bool,
}

impl SpriteBase {
    /// Creates a visible entity at `position` showing `graphic`.
    #[must_use]
    pub fn new(id: SpriteId, position: Position, graphic: GraphicKey) -> Self {
        Self {
            id,
            position,
            graphic,
            visible: true,
        }
    }

    /// Identifier of the entity.
    #[must_use]
    pub fn id(&self) -> &SpriteId {
        &self.id
    }

    /// Top-left corner in world pixels.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Block-sized collision rectangle anchored at the position.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::block(self.position)
    }

    /// Center of the collision rectangle.
    #[must_use]
    pub const fn center(&self) -> Position {
        self.rect().center()
    }

    /// Graphic currently shown.
    #[must_use]
    pub fn graphic(&self) -> &GraphicKey {
        &self.graphic
    }

    /// Replaces the graphic shown.
    pub fn set_graphic(&mut self, graphic: GraphicKey) {
        self.graphic = graphic;
    }

    /// Whether the entity is drawn and collided with.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the entity.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Moves toward `destination`, rejecting each axis that would collide.
    ///
    /// The horizontal displacement is attempted first at the current height,
    /// then the vertical displacement from wherever the first step left the
    /// entity. Returns `true` when the position changed.
    pub fn move_to(&mut self, destination: Position, collision: &CollisionView<'_>) -> bool {
        let start = self.position;

        if destination.x() != self.position.x() {
            let candidate = self.position.with_x(destination.x());
            if !collision.blocked(Rect::block(candidate)) {
                self.position = candidate;
            }
        }

        if destination.y() != self.position.y() {
            let candidate = self.position.with_y(destination.y());
            if !collision.blocked(Rect::block(candidate)) {
                self.position = candidate;
            }
        }

        self.position != start
    }
}

/// Per-frame services handed to an entity while it updates.
pub struct UpdateContext<'a> {
    /// Collision rectangle of the player after its own update this frame.
    pub player: Rect,
    /// Map and sprite obstacles, excluding the entity being updated.
    pub collision: CollisionView<'a>,
    /// Graphic availability lookup.
    pub graphics: &'a mut dyn GraphicCatalog,
    /// Source of probabilistic decisions.
    pub trigger: &'a mut dyn Trigger,
}

impl fmt::Debug for UpdateContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateContext")
            .field("player", &self.player)
            .field("collision", &self.collision)
            .finish_non_exhaustive()
    }
}

/// Behaviour shared by every entity the world simulates.
pub trait Sprite: fmt::Debug {
    /// Shared entity state.
    fn base(&self) -> &SpriteBase;

    /// Category of the entity.
    fn kind(&self) -> SpriteKind;

    /// Draw pass the entity belongs to.
    fn layer(&self) -> Layer {
        match self.kind() {
            SpriteKind::Player | SpriteKind::Adversary | SpriteKind::Effect => Layer::Top,
            SpriteKind::Npc | SpriteKind::Tile => Layer::Ground,
        }
    }

    /// Whether other entities are blocked by this one.
    fn solid(&self) -> bool {
        matches!(
            self.kind(),
            SpriteKind::Player | SpriteKind::Npc | SpriteKind::Adversary
        )
    }

    /// Advances the entity by one frame.
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    /// Effect produced when the player activates next to the entity.
    fn interact(&self) -> Option<Bubble> {
        None
    }

    /// Whether the entity should be removed from the world.
    fn expired(&self) -> bool {
        false
    }

    /// Identifier of the entity.
    fn id(&self) -> &SpriteId {
        self.base().id()
    }

    /// Collision rectangle of the entity.
    fn rect(&self) -> Rect {
        self.base().rect()
    }

    /// Whether the entity takes part in collisions this frame.
    fn blocks_others(&self) -> bool {
        self.solid() && self.base().is_visible()
    }
}
