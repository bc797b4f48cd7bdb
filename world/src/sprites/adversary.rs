use pharcobial_core::{GraphicKey, Position, SpriteId, BLOCK_SIZE};
use pharcobial_system_pursuit::{chase_step, sees};

use super::{Sprite, SpriteBase, SpriteKind, UpdateContext};

/// Pixels an awakened bush covers per frame along each axis.
pub const BUSH_SPEED: i32 = 1;

/// Pixels a bush monster covers per frame along each axis.
pub const MONSTER_SPEED: i32 = (BLOCK_SIZE * 2 + 5) / 10;

const BUSH_GRAPHIC: &str = "bush";
const MONSTER_GRAPHIC: &str = "bush-monster";

/// Bush that may spring to life when the player wanders close.
#[derive(Clone, Debug)]
pub struct Bush {
    base: SpriteBase,
    player_is_near: bool,
    alive: bool,
}

impl Bush {
    /// Creates a dormant bush with the `adversary-bush-<index>` identifier.
    #[must_use]
    pub fn new(index: usize, position: Position) -> Self {
        Self {
            base: SpriteBase::new(
                SpriteId::new(format!("adversary-bush-{index}")),
                position,
                GraphicKey::new(BUSH_GRAPHIC),
            ),
            player_is_near: false,
            alive: false,
        }
    }

    /// Whether the bush is currently chasing the player.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether the player was inside the vision box on the last update.
    #[must_use]
    pub const fn player_is_near(&self) -> bool {
        self.player_is_near
    }

    fn chase(&mut self, ctx: &UpdateContext<'_>) {
        let destination = chase_step(self.base.position(), ctx.player.origin(), BUSH_SPEED);
        let _ = self.base.move_to(destination, &ctx.collision);
    }
}

impl Sprite for Bush {
    fn base(&self) -> &SpriteBase {
        &self.base
    }

    fn kind(&self) -> SpriteKind {
        SpriteKind::Adversary
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let was_near = self.player_is_near;
        self.player_is_near = sees(self.base.rect(), ctx.player);

        if was_near {
            if !self.player_is_near {
                if self.alive {
                    log::debug!("{} went dormant.", self.base.id());
                }
                self.alive = false;
                self.base.set_graphic(GraphicKey::new(BUSH_GRAPHIC));
            } else if self.alive {
                self.chase(ctx);
            }
        } else if self.player_is_near {
            self.alive = ctx.trigger.fire();
            if self.alive {
                log::debug!("{} came alive.", self.base.id());
                self.base.set_graphic(GraphicKey::new(MONSTER_GRAPHIC));
                self.chase(ctx);
            }
        }
    }
}

/// Monster that chases the player from the moment the level starts.
#[derive(Clone, Debug)]
pub struct BushMonster {
    base: SpriteBase,
}

impl BushMonster {
    /// Creates a monster at `position`.
    #[must_use]
    pub fn new(id: SpriteId, position: Position, gfx: Option<&str>) -> Self {
        Self {
            base: SpriteBase::new(
                id,
                position,
                GraphicKey::new(gfx.unwrap_or(MONSTER_GRAPHIC)),
            ),
        }
    }
}

impl Sprite for BushMonster {
    fn base(&self) -> &SpriteBase {
        &self.base
    }

    fn kind(&self) -> SpriteKind {
        SpriteKind::Adversary
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let destination = chase_step(self.base.position(), ctx.player.origin(), MONSTER_SPEED);
        let _ = self.base.move_to(destination, &ctx.collision);
    }
}
