use pharcobial_core::{GraphicKey, Position, SpriteId};

use super::{Sprite, SpriteBase, SpriteKind};

/// Ground decoration drawn for a single map cell.
#[derive(Clone, Debug)]
pub struct Tile {
    base: SpriteBase,
}

impl Tile {
    /// Creates the tile covering `column`, `row` with the `gfx` graphic.
    #[must_use]
    pub fn new(column: i32, row: i32, gfx: &str) -> Self {
        Self {
            base: SpriteBase::new(
                SpriteId::new(format!("tile-{column}-{row}")),
                Position::from_tile(column, row),
                GraphicKey::new(gfx),
            ),
        }
    }
}

impl Sprite for Tile {
    fn base(&self) -> &SpriteBase {
        &self.base
    }

    fn kind(&self) -> SpriteKind {
        SpriteKind::Tile
    }
}
