#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for Pharcobial.
//!
//! The [`World`] owns the loaded [`map::Map`], its [`collision::Collision`]
//! grid and every sprite spawned from them. Adapters and views only read it
//! through the [`query`] module and drive it through [`World::handle_control`]
//! and [`World::update`].

pub mod collision;
pub mod map;
pub mod sprites;

use std::{collections::HashSet, fmt};

use pharcobial_core::{
    Control, ControlEvent, GraphicCatalog, Position, Rect, SpriteId, TileKey, BLOCK_SIZE,
};
use pharcobial_system_pursuit::Trigger;
use thiserror::Error;

use crate::{
    collision::{Collision, CollisionError, CollisionView},
    map::{Map, MapLoadError, SpawnKind, TileInfo},
    sprites::{Bush, BushMonster, Npc, Player, Sprite, Tile, UpdateContext},
};

/// Character graphic used when the player spawn does not name one.
pub const DEFAULT_CHARACTER: &str = "pharma";

/// Errors raised while populating or resetting a level.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The map could not be loaded or validated.
    #[error(transparent)]
    Map(#[from] MapLoadError),
    /// The collision grid does not fit the map.
    #[error(transparent)]
    Collision(#[from] CollisionError),
    /// Two sprites ended up with the same identifier.
    #[error("sprite id `{sprite_id}` is used more than once")]
    DuplicateSprite {
        /// Repeated identifier.
        sprite_id: SpriteId,
    },
    /// The map has no player spawn to place the player at.
    #[error("map `{map_id}` defines no player spawn")]
    MissingPlayerSpawn {
        /// Map lacking the spawn.
        map_id: String,
    },
}

/// Represents the authoritative state of the current level.
pub struct World {
    map: Map,
    collision: Collision,
    tiles: Vec<Tile>,
    player: Player,
    sprites: Vec<Box<dyn Sprite>>,
    trigger: Box<dyn Trigger>,
    obstacles: Vec<Rect>,
    tick_index: u64,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("map", &self.map.id())
            .field("tiles", &self.tiles.len())
            .field("player", &self.player)
            .field("sprites", &self.sprites)
            .field("tick_index", &self.tick_index)
            .finish_non_exhaustive()
    }
}

struct Population {
    tiles: Vec<Tile>,
    player: Player,
    sprites: Vec<Box<dyn Sprite>>,
}

impl World {
    /// Populates a level from a validated map and its collision grid.
    ///
    /// Every legend entry with a graphic becomes a ground tile, every bush
    /// cell a dormant [`Bush`] and every metadata spawn an [`Npc`] or a
    /// [`BushMonster`] depending on its kind.
    pub fn new(
        map: Map,
        collision: Collision,
        trigger: Box<dyn Trigger>,
    ) -> Result<Self, LevelError> {
        let Population {
            tiles,
            player,
            sprites,
        } = populate(&map)?;

        let world = Self {
            map,
            collision,
            tiles,
            player,
            sprites,
            trigger,
            obstacles: Vec::new(),
            tick_index: 0,
        };
        world.validate()?;
        Ok(world)
    }

    /// Confirms every sprite identifier is unique.
    pub fn validate(&self) -> Result<(), LevelError> {
        let mut seen = HashSet::new();
        for id in std::iter::once(self.player.id()).chain(self.sprites.iter().map(|s| s.id())) {
            if !seen.insert(id) {
                return Err(LevelError::DuplicateSprite {
                    sprite_id: id.clone(),
                });
            }
        }

        log::debug!("Sprites ready.");
        Ok(())
    }

    /// Routes a control edge to the player or triggers an interaction.
    pub fn handle_control(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::Pressed(Control::Activate) => self.interact(),
            _ => self.player.handle_control(event),
        }
    }

    /// Stops the player, forgetting every held direction.
    pub fn halt_player(&mut self) {
        self.player.halt();
    }

    fn interact(&mut self) {
        let reach = self.player.rect().inflate(BLOCK_SIZE, BLOCK_SIZE);
        let bubbles: Vec<_> = self
            .sprites
            .iter()
            .filter(|sprite| sprite.base().is_visible() && sprite.rect().intersects(&reach))
            .filter_map(|sprite| sprite.interact())
            .collect();

        for bubble in bubbles {
            log::debug!("{} appeared.", bubble.id());
            match self.sprites.iter_mut().find(|sprite| sprite.id() == bubble.id()) {
                Some(existing) => *existing = Box::new(bubble),
                None => self.sprites.push(Box::new(bubble)),
            }
        }
    }

    /// Advances every sprite by one frame.
    ///
    /// The player moves first against the other solid sprites; each remaining
    /// sprite then updates against the player's new rectangle and every other
    /// solid sprite. Expired effects are dropped afterwards.
    pub fn update(&mut self, graphics: &mut dyn GraphicCatalog) {
        self.tick_index = self.tick_index.saturating_add(1);

        self.obstacles.clear();
        self.obstacles.extend(
            self.sprites
                .iter()
                .filter(|sprite| sprite.blocks_others())
                .map(|sprite| sprite.rect()),
        );
        let mut ctx = UpdateContext {
            player: self.player.rect(),
            collision: CollisionView::new(&self.collision, &self.obstacles),
            graphics: &mut *graphics,
            trigger: self.trigger.as_mut(),
        };
        self.player.update(&mut ctx);

        let player = self.player.rect();
        let player_blocks = self.player.blocks_others();
        for index in 0..self.sprites.len() {
            self.obstacles.clear();
            if player_blocks {
                self.obstacles.push(player);
            }
            self.obstacles.extend(
                self.sprites
                    .iter()
                    .enumerate()
                    .filter(|(other, sprite)| *other != index && sprite.blocks_others())
                    .map(|(_, sprite)| sprite.rect()),
            );

            let mut ctx = UpdateContext {
                player,
                collision: CollisionView::new(&self.collision, &self.obstacles),
                graphics: &mut *graphics,
                trigger: self.trigger.as_mut(),
            };
            self.sprites[index].update(&mut ctx);
        }

        self.sprites.retain(|sprite| !sprite.expired());
    }

    /// Reloads the map from its source and respawns every sprite.
    pub fn reset(&mut self) -> Result<(), LevelError> {
        self.map.reset()?;
        self.map.validate()?;
        let collision = Collision::from_map(&self.map);
        collision.validate(&self.map)?;

        let Population {
            tiles,
            player,
            sprites,
        } = populate(&self.map)?;
        self.collision = collision;
        self.tiles = tiles;
        self.player = player;
        self.sprites = sprites;
        self.tick_index = 0;
        self.validate()?;

        log::info!("Level `{}` reset.", self.map.id());
        Ok(())
    }
}

fn populate(map: &Map) -> Result<Population, LevelError> {
    let spawn = map
        .player_spawn()
        .ok_or_else(|| LevelError::MissingPlayerSpawn {
            map_id: map.id().to_owned(),
        })?;
    let player = Player::new(
        spawn.sprite_id().clone(),
        spawn.position(),
        spawn.gfx().unwrap_or(DEFAULT_CHARACTER),
    );

    let mut tiles = Vec::new();
    let mut sprites: Vec<Box<dyn Sprite>> = Vec::new();
    for (column, row, key) in map.cells() {
        if let Some(gfx) = map.legend(key).and_then(TileInfo::gfx) {
            tiles.push(Tile::new(column, row, gfx));
        }
        if key == TileKey::BUSH {
            let index = sprites.len();
            sprites.push(Box::new(Bush::new(index, Position::from_tile(column, row))));
        }
    }

    for spawn in map.npc_spawns() {
        let id = spawn.sprite_id().clone();
        let sprite: Box<dyn Sprite> = match spawn.kind() {
            SpawnKind::Npc => Box::new(Npc::new(id, spawn.position(), spawn.gfx())),
            SpawnKind::Monster => Box::new(BushMonster::new(id, spawn.position(), spawn.gfx())),
        };
        sprites.push(sprite);
    }

    log::debug!(
        "spawned {} tiles and {} sprites for map `{}`",
        tiles.len(),
        sprites.len(),
        map.id()
    );
    Ok(Population {
        tiles,
        player,
        sprites,
    })
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use pharcobial_core::SpriteId;

    use super::World;
    use crate::{
        collision::Collision,
        map::Map,
        sprites::{Player, Sprite},
    };

    /// Provides read-only access to the loaded map.
    #[must_use]
    pub fn map(world: &World) -> &Map {
        &world.map
    }

    /// Provides read-only access to the collision grid.
    #[must_use]
    pub fn collision(world: &World) -> &Collision {
        &world.collision
    }

    /// Provides read-only access to the player.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Every sprite in the level: ground tiles, then the player, then the rest.
    pub fn sprites(world: &World) -> impl Iterator<Item = &dyn Sprite> + '_ {
        world
            .tiles
            .iter()
            .map(|tile| tile as &dyn Sprite)
            .chain(std::iter::once(&world.player as &dyn Sprite))
            .chain(world.sprites.iter().map(|sprite| &**sprite as &dyn Sprite))
    }

    /// Looks up a sprite by identifier.
    #[must_use]
    pub fn find<'a>(world: &'a World, id: &SpriteId) -> Option<&'a dyn Sprite> {
        sprites(world).find(|sprite| sprite.id() == id)
    }

    /// Number of frames simulated since the level was populated.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
