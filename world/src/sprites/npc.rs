use pharcobial_core::{GraphicKey, Position, SpriteId, BLOCK_SIZE};

use super::{Sprite, SpriteBase, SpriteKind, UpdateContext};

/// Number of frames a chat bubble stays on screen.
pub const BUBBLE_LIFETIME: u32 = 90;

const BUBBLE_GRAPHIC: &str = "bubble";

/// A static character the player can talk to.
#[derive(Clone, Debug)]
pub struct Npc {
    base: SpriteBase,
}

impl Npc {
    /// Creates an NPC showing `gfx`, or a graphic derived from its identifier.
    ///
    /// Without an explicit graphic, a trailing `-<index>` suffix produced by
    /// multiple-spawn expansion is stripped so every instance shares art.
    #[must_use]
    pub fn new(id: SpriteId, position: Position, gfx: Option<&str>) -> Self {
        let graphic = gfx.map_or_else(|| default_graphic(id.as_str()), str::to_owned);
        Self {
            base: SpriteBase::new(id, position, GraphicKey::new(graphic)),
        }
    }

    /// Creates the chat bubble shown above this NPC.
    #[must_use]
    pub fn speak(&self) -> Bubble {
        let position = self.base.position();
        Bubble::new(
            SpriteId::new(format!("{}-bubble", self.base.id())),
            Position::new(position.x(), position.y() - BLOCK_SIZE),
        )
    }
}

fn default_graphic(id: &str) -> String {
    match id.rsplit_once('-') {
        Some((stem, index))
            if !stem.is_empty()
                && !index.is_empty()
                && index.chars().all(|c| c.is_ascii_digit()) =>
        {
            stem.to_owned()
        }
        _ => id.to_owned(),
    }
}

impl Sprite for Npc {
    fn base(&self) -> &SpriteBase {
        &self.base
    }

    fn kind(&self) -> SpriteKind {
        SpriteKind::Npc
    }

    fn interact(&self) -> Option<Bubble> {
        Some(self.speak())
    }
}

/// Transient speech effect drawn above an NPC.
#[derive(Clone, Debug)]
pub struct Bubble {
    base: SpriteBase,
    remaining: u32,
}

impl Bubble {
    /// Creates a bubble that lasts [`BUBBLE_LIFETIME`] frames.
    #[must_use]
    pub fn new(id: SpriteId, position: Position) -> Self {
        Self {
            base: SpriteBase::new(id, position, GraphicKey::new(BUBBLE_GRAPHIC)),
            remaining: BUBBLE_LIFETIME,
        }
    }

    /// Frames left before the bubble disappears.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl Sprite for Bubble {
    fn base(&self) -> &SpriteBase {
        &self.base
    }

    fn kind(&self) -> SpriteKind {
        SpriteKind::Effect
    }

    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.base.set_visible(false);
        }
    }

    fn expired(&self) -> bool {
        !self.base.is_visible()
    }
}
