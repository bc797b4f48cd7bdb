//! Tile grid and spawn metadata for a single level.

use std::{
    collections::{BTreeMap, HashSet},
    fs, io,
    path::{Path, PathBuf},
};

use pharcobial_core::{Position, SpriteId, TileKey};
use serde::Deserialize;
use thiserror::Error;

/// Placeholder substituted with the zero-based index in multiple-spawn templates.
pub const INDEX_PLACEHOLDER: &str = "{x}";

/// Errors raised while loading or validating a map.
#[derive(Debug, Error)]
pub enum MapLoadError {
    /// A map file could not be read.
    #[error("failed to read map file {}", .path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The metadata document is not valid.
    #[error("malformed metadata for map `{map_id}`")]
    Metadata {
        /// Map whose metadata failed to parse.
        map_id: String,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// A tile legend key is not exactly one character long.
    #[error("tile legend key `{key}` must be a single character")]
    InvalidLegendKey {
        /// Offending legend key.
        key: String,
    },
    /// A grid cell is not exactly one character long.
    #[error("cell `{cell}` in row {row} must be a single character")]
    InvalidCell {
        /// Zero-based row containing the cell.
        row: usize,
        /// Offending cell text.
        cell: String,
    },
    /// A grid row differs in length from the first row.
    #[error("row {row} has {found} columns but row 0 has {expected}")]
    NotRectangular {
        /// Zero-based row that broke the rectangle.
        row: usize,
        /// Width of row 0.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A grid cell uses a key that the legend does not define.
    #[error("tile `{key}` at column {column}, row {row} is missing from the tile legend")]
    UnknownTile {
        /// Undefined key.
        key: TileKey,
        /// Zero-based column of the cell.
        column: usize,
        /// Zero-based row of the cell.
        row: usize,
    },
    /// A single NPC entry has no location.
    #[error("npc `{sprite_id}` has no location")]
    MissingLocation {
        /// Identifier of the entry.
        sprite_id: String,
    },
    /// A multiple-spawn entry has a template without the index placeholder.
    #[error("multiple-spawn template `{template}` lacks the `{{x}}` placeholder")]
    InvalidTemplate {
        /// Offending template.
        template: String,
    },
    /// Two spawns share the same identifier.
    #[error("sprite id `{sprite_id}` is spawned more than once")]
    DuplicateSpawn {
        /// Repeated identifier.
        sprite_id: SpriteId,
    },
    /// The metadata does not name a player spawn.
    #[error("map `{map_id}` defines no player spawn")]
    MissingPlayerSpawn {
        /// Map lacking the spawn.
        map_id: String,
    },
    /// The tile grid has no cells.
    #[error("map `{map_id}` has an empty tile grid")]
    EmptyGrid {
        /// Map with the empty grid.
        map_id: String,
    },
    /// A spawn lies outside the grid.
    #[error("spawn `{sprite_id}` at ({column}, {row}) lies outside the map")]
    SpawnOutOfBounds {
        /// Identifier of the spawn.
        sprite_id: SpriteId,
        /// Tile column of the spawn.
        column: i32,
        /// Tile row of the spawn.
        row: i32,
    },
    /// The map was built from memory and cannot be reloaded.
    #[error("map `{map_id}` has no source files to reload from")]
    NoSource {
        /// Map lacking a source.
        map_id: String,
    },
}

/// Legend entry describing how a tile looks and whether it blocks movement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileInfo {
    gfx: Option<String>,
    collision: bool,
}

impl TileInfo {
    /// Creates a legend entry.
    #[must_use]
    pub fn new(gfx: Option<String>, collision: bool) -> Self {
        Self { gfx, collision }
    }

    /// Entry injected for the void key when a legend omits it.
    #[must_use]
    pub fn void() -> Self {
        Self::new(None, true)
    }

    /// Graphic drawn for the tile, if any.
    #[must_use]
    pub fn gfx(&self) -> Option<&str> {
        self.gfx.as_deref()
    }

    /// Whether the tile blocks movement.
    #[must_use]
    pub const fn collision(&self) -> bool {
        self.collision
    }
}

/// What a spawn entry turns into when the level is populated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnKind {
    /// Static, talkative character.
    #[default]
    Npc,
    /// Adversary that relentlessly chases the player.
    Monster,
}

/// Starting location and identity of a character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spawn {
    sprite_id: SpriteId,
    column: i32,
    row: i32,
    gfx: Option<String>,
    kind: SpawnKind,
}

impl Spawn {
    /// Creates a spawn at the given tile coordinate.
    #[must_use]
    pub fn new(sprite_id: SpriteId, column: i32, row: i32) -> Self {
        Self {
            sprite_id,
            column,
            row,
            gfx: None,
            kind: SpawnKind::Npc,
        }
    }

    /// Identifier given to the spawned sprite.
    #[must_use]
    pub fn sprite_id(&self) -> &SpriteId {
        &self.sprite_id
    }

    /// Tile column and row.
    #[must_use]
    pub const fn tile(&self) -> (i32, i32) {
        (self.column, self.row)
    }

    /// Pixel position of the spawn's top-left corner.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::from_tile(self.column, self.row)
    }

    /// Explicit graphic requested by the metadata.
    #[must_use]
    pub fn gfx(&self) -> Option<&str> {
        self.gfx.as_deref()
    }

    /// What the spawn becomes.
    #[must_use]
    pub const fn kind(&self) -> SpawnKind {
        self.kind
    }
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    tile_set: BTreeMap<String, RawTile>,
    #[serde(default)]
    player: Option<RawSpawn>,
    #[serde(default)]
    npcs: Vec<RawNpc>,
}

#[derive(Debug, Deserialize)]
struct RawTile {
    #[serde(default)]
    gfx: Option<String>,
    #[serde(default)]
    collision: bool,
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct RawLocation {
    x: i32,
    y: i32,
}

#[derive(Debug, Deserialize)]
struct RawSpawn {
    sprite_id: String,
    location: RawLocation,
    #[serde(default)]
    gfx: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawNpc {
    sprite_id: String,
    #[serde(default)]
    multiple: bool,
    #[serde(default)]
    location: Option<RawLocation>,
    #[serde(default)]
    locations: Vec<RawLocation>,
    #[serde(default)]
    gfx: Option<String>,
    #[serde(default)]
    kind: SpawnKind,
}

/// Expands an index-templated identifier over a coordinate list.
///
/// The `n`-th generated identifier substitutes `n` for every `{x}` in the
/// template, so the output follows the order of `locations`.
pub fn expand_multiple(
    template: &str,
    locations: &[(i32, i32)],
) -> Result<Vec<(SpriteId, i32, i32)>, MapLoadError> {
    if !template.contains(INDEX_PLACEHOLDER) {
        return Err(MapLoadError::InvalidTemplate {
            template: template.to_owned(),
        });
    }

    Ok(locations
        .iter()
        .enumerate()
        .map(|(index, &(column, row))| {
            let id = template.replace(INDEX_PLACEHOLDER, &index.to_string());
            (SpriteId::new(id), column, row)
        })
        .collect())
}

/// Directory a map was read from.
#[derive(Clone, Debug, PartialEq, Eq)]
struct MapSource {
    directory: PathBuf,
}

/// Immutable tile grid plus the metadata needed to populate a level.
#[derive(Clone, Debug)]
pub struct Map {
    id: String,
    source: Option<MapSource>,
    tile_set: BTreeMap<TileKey, TileInfo>,
    tiles: Vec<TileKey>,
    width: usize,
    height: usize,
    player: Option<Spawn>,
    npcs: Vec<Spawn>,
}

impl Map {
    /// Loads `<directory>/<map_id>.csv` and its `<map_id>.json` metadata.
    pub fn load(directory: impl AsRef<Path>, map_id: &str) -> Result<Self, MapLoadError> {
        let directory = directory.as_ref();
        let tiles = read(&directory.join(format!("{map_id}.csv")))?;
        let metadata = read(&directory.join(format!("{map_id}.json")))?;

        let mut map = Self::parse(map_id, &tiles, &metadata)?;
        map.source = Some(MapSource {
            directory: directory.to_path_buf(),
        });
        log::debug!(
            "loaded map `{map_id}` ({}x{}) from {}",
            map.width,
            map.height,
            directory.display()
        );
        Ok(map)
    }

    /// Builds a map from in-memory tile and metadata documents.
    pub fn parse(map_id: &str, tiles: &str, metadata: &str) -> Result<Self, MapLoadError> {
        let raw: RawMetadata =
            serde_json::from_str(metadata).map_err(|source| MapLoadError::Metadata {
                map_id: map_id.to_owned(),
                source,
            })?;

        let tile_set = parse_tile_set(raw.tile_set)?;
        let (tiles, width, height) = parse_grid(tiles, &tile_set)?;

        let player = raw.player.map(|spawn| Spawn {
            sprite_id: SpriteId::new(spawn.sprite_id),
            column: spawn.location.x,
            row: spawn.location.y,
            gfx: spawn.gfx,
            kind: SpawnKind::Npc,
        });
        let npcs = parse_npcs(raw.npcs)?;

        let mut seen = HashSet::new();
        for spawn in player.iter().chain(npcs.iter()) {
            if !seen.insert(spawn.sprite_id.clone()) {
                return Err(MapLoadError::DuplicateSpawn {
                    sprite_id: spawn.sprite_id.clone(),
                });
            }
        }

        Ok(Self {
            id: map_id.to_owned(),
            source: None,
            tile_set,
            tiles,
            width,
            height,
            player,
            npcs,
        })
    }

    /// Confirms the map can host a level.
    pub fn validate(&self) -> Result<(), MapLoadError> {
        if self.tiles.is_empty() {
            return Err(MapLoadError::EmptyGrid {
                map_id: self.id.clone(),
            });
        }

        let Some(player) = &self.player else {
            return Err(MapLoadError::MissingPlayerSpawn {
                map_id: self.id.clone(),
            });
        };

        for spawn in std::iter::once(player).chain(self.npcs.iter()) {
            let (column, row) = spawn.tile();
            if !self.contains_tile(column, row) {
                return Err(MapLoadError::SpawnOutOfBounds {
                    sprite_id: spawn.sprite_id.clone(),
                    column,
                    row,
                });
            }
        }

        log::debug!("Map ready.");
        Ok(())
    }

    /// Reloads the map from the files it was originally read from.
    pub fn reset(&mut self) -> Result<(), MapLoadError> {
        let Some(source) = self.source.clone() else {
            return Err(MapLoadError::NoSource {
                map_id: self.id.clone(),
            });
        };

        *self = Self::load(&source.directory, &self.id)?;
        Ok(())
    }

    /// Identifier the map was loaded under.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Reports whether the tile coordinate lies inside the grid.
    #[must_use]
    pub fn contains_tile(&self, column: i32, row: i32) -> bool {
        self.index(column, row).is_some()
    }

    /// Key stored at the tile coordinate.
    #[must_use]
    pub fn tile_key(&self, column: i32, row: i32) -> Option<TileKey> {
        self.index(column, row).map(|index| self.tiles[index])
    }

    /// Legend entry for the tile at the coordinate.
    #[must_use]
    pub fn tile(&self, column: i32, row: i32) -> Option<&TileInfo> {
        self.tile_key(column, row).and_then(|key| self.tile_set.get(&key))
    }

    /// Legend entry for a key.
    #[must_use]
    pub fn legend(&self, key: TileKey) -> Option<&TileInfo> {
        self.tile_set.get(&key)
    }

    /// Every cell as `(column, row, key)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, TileKey)> + '_ {
        let width = self.width.max(1);
        self.tiles.iter().enumerate().map(move |(index, key)| {
            let column = i32::try_from(index % width).unwrap_or(i32::MAX);
            let row = i32::try_from(index / width).unwrap_or(i32::MAX);
            (column, row, *key)
        })
    }

    /// Where the player starts.
    #[must_use]
    pub fn player_spawn(&self) -> Option<&Spawn> {
        self.player.as_ref()
    }

    /// Where NPCs and monsters start, with multiple spawns already expanded.
    #[must_use]
    pub fn npc_spawns(&self) -> &[Spawn] {
        &self.npcs
    }

    fn index(&self, column: i32, row: i32) -> Option<usize> {
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        (column < self.width && row < self.height).then(|| row * self.width + column)
    }
}

fn read(path: &Path) -> Result<String, MapLoadError> {
    fs::read_to_string(path).map_err(|source| MapLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_tile_set(
    raw: BTreeMap<String, RawTile>,
) -> Result<BTreeMap<TileKey, TileInfo>, MapLoadError> {
    let mut tile_set = BTreeMap::new();
    for (key, tile) in raw {
        let tile_key = single_char(&key)
            .map(TileKey::new)
            .ok_or_else(|| MapLoadError::InvalidLegendKey { key: key.clone() })?;
        let _ = tile_set.insert(tile_key, TileInfo::new(tile.gfx, tile.collision));
    }

    let _ = tile_set.entry(TileKey::VOID).or_insert_with(TileInfo::void);
    Ok(tile_set)
}

fn parse_grid(
    source: &str,
    tile_set: &BTreeMap<TileKey, TileInfo>,
) -> Result<(Vec<TileKey>, usize, usize), MapLoadError> {
    let mut tiles = Vec::new();
    let mut width = 0;
    let mut height = 0;

    for line in source.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let row = height;
        let cells: Vec<TileKey> = if line.contains(',') {
            line.split(',')
                .map(|cell| {
                    let cell = cell.trim();
                    single_char(cell)
                        .map(TileKey::new)
                        .ok_or_else(|| MapLoadError::InvalidCell {
                            row,
                            cell: cell.to_owned(),
                        })
                })
                .collect::<Result<_, _>>()?
        } else {
            line.chars().map(TileKey::new).collect()
        };

        if row == 0 {
            width = cells.len();
        } else if cells.len() != width {
            return Err(MapLoadError::NotRectangular {
                row,
                expected: width,
                found: cells.len(),
            });
        }

        if let Some((column, key)) = cells
            .iter()
            .enumerate()
            .find(|(_, key)| !tile_set.contains_key(*key))
        {
            return Err(MapLoadError::UnknownTile {
                key: *key,
                column,
                row,
            });
        }

        tiles.extend(cells);
        height += 1;
    }

    Ok((tiles, width, height))
}

fn parse_npcs(raw: Vec<RawNpc>) -> Result<Vec<Spawn>, MapLoadError> {
    let mut spawns = Vec::new();
    for npc in raw {
        if npc.multiple {
            let locations: Vec<(i32, i32)> = npc
                .locations
                .iter()
                .map(|location| (location.x, location.y))
                .collect();
            for (sprite_id, column, row) in expand_multiple(&npc.sprite_id, &locations)? {
                spawns.push(Spawn {
                    sprite_id,
                    column,
                    row,
                    gfx: npc.gfx.clone(),
                    kind: npc.kind,
                });
            }
        } else {
            let location = npc.location.ok_or_else(|| MapLoadError::MissingLocation {
                sprite_id: npc.sprite_id.clone(),
            })?;
            spawns.push(Spawn {
                sprite_id: SpriteId::new(npc.sprite_id),
                column: location.x,
                row: location.y,
                gfx: npc.gfx,
                kind: npc.kind,
            });
        }
    }
    Ok(spawns)
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(first), None) => Some(first),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METADATA: &str = r#"{
        "tile_set": {
            "0": { "gfx": "grass", "collision": false },
            "1": { "gfx": "wall", "collision": true }
        },
        "player": { "sprite_id": "player", "location": { "x": 0, "y": 0 } }
    }"#;

    #[test]
    fn parses_two_by_two_grid() {
        let map = Map::parse("tiny", "00\n01\n", METADATA).expect("map should parse");

        assert_eq!(map.width(), 2);
        assert_eq!(map.height(), 2);
        assert!(map.tile(1, 1).expect("tile (1, 1)").collision());
        assert!(!map.tile(0, 0).expect("tile (0, 0)").collision());
        assert_eq!(map.tile(0, 0).and_then(TileInfo::gfx), Some("grass"));
        map.validate().expect("map should validate");
    }

    #[test]
    fn comma_separated_rows_are_accepted() {
        let map = Map::parse("csv", "0, 1, 0\n1,0,1", METADATA).expect("map should parse");

        assert_eq!(map.width(), 3);
        assert_eq!(map.tile_key(1, 0), Some(TileKey::new('1')));
        assert_eq!(map.tile_key(3, 0), None);
    }

    #[test]
    fn void_entry_is_injected() {
        let map = Map::parse("void", "0X", METADATA).expect("map should parse");

        assert_eq!(map.legend(TileKey::VOID), Some(&TileInfo::void()));
        assert!(map.tile(1, 0).expect("void tile").collision());
    }

    #[test]
    fn explicit_void_entry_is_preserved() {
        let metadata = r#"{
            "tile_set": { "X": { "gfx": "water", "collision": true } },
            "player": { "sprite_id": "player", "location": { "x": 0, "y": 0 } }
        }"#;
        let map = Map::parse("water", "X", metadata).expect("map should parse");

        assert_eq!(map.tile(0, 0).and_then(TileInfo::gfx), Some("water"));
    }

    #[test]
    fn ragged_grid_is_rejected() {
        let error = Map::parse("ragged", "00\n0\n", METADATA).expect_err("ragged grid");

        assert!(matches!(
            error,
            MapLoadError::NotRectangular {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn unknown_tile_is_rejected() {
        let error = Map::parse("unknown", "00\n0Q\n", METADATA).expect_err("unknown tile");

        assert!(matches!(
            error,
            MapLoadError::UnknownTile {
                column: 1,
                row: 1,
                ..
            }
        ));
    }

    #[test]
    fn malformed_metadata_is_rejected() {
        let error = Map::parse("broken", "00", "{ not json").expect_err("bad json");

        assert!(matches!(error, MapLoadError::Metadata { .. }));
    }

    #[test]
    fn multi_character_legend_key_is_rejected() {
        let metadata = r#"{ "tile_set": { "00": { "gfx": "grass" } } }"#;
        let error = Map::parse("legend", "00", metadata).expect_err("bad legend");

        assert!(matches!(error, MapLoadError::InvalidLegendKey { .. }));
    }

    #[test]
    fn validate_requires_player_and_cells() {
        let no_player = r#"{ "tile_set": { "0": { "gfx": "grass" } } }"#;
        let map = Map::parse("lonely", "00", no_player).expect("map should parse");
        assert!(matches!(
            map.validate(),
            Err(MapLoadError::MissingPlayerSpawn { .. })
        ));

        let empty = Map::parse("empty", "\n\n", METADATA).expect("empty grid parses");
        assert!(matches!(empty.validate(), Err(MapLoadError::EmptyGrid { .. })));
    }

    #[test]
    fn validate_rejects_spawn_outside_grid() {
        let metadata = r#"{
            "tile_set": { "0": { "gfx": "grass" } },
            "player": { "sprite_id": "player", "location": { "x": 5, "y": 0 } }
        }"#;
        let map = Map::parse("outside", "00", metadata).expect("map should parse");

        assert!(matches!(
            map.validate(),
            Err(MapLoadError::SpawnOutOfBounds { column: 5, .. })
        ));
    }

    #[test]
    fn multiple_spawns_expand_in_location_order() {
        let metadata = r#"{
            "tile_set": { "0": { "gfx": "grass" } },
            "player": { "sprite_id": "player", "location": { "x": 0, "y": 0 } },
            "npcs": [
                { "sprite_id": "wizard", "location": { "x": 1, "y": 1 } },
                {
                    "sprite_id": "guard-{x}",
                    "multiple": true,
                    "locations": [ { "x": 3, "y": 0 }, { "x": 1, "y": 2 }, { "x": 2, "y": 2 } ]
                }
            ]
        }"#;
        let map = Map::parse("guards", "0000\n0000\n0000", metadata).expect("map should parse");

        let ids: Vec<&str> = map
            .npc_spawns()
            .iter()
            .map(|spawn| spawn.sprite_id().as_str())
            .collect();
        assert_eq!(ids, ["wizard", "guard-0", "guard-1", "guard-2"]);
        let tiles: Vec<(i32, i32)> = map.npc_spawns()[1..].iter().map(Spawn::tile).collect();
        assert_eq!(tiles, [(3, 0), (1, 2), (2, 2)]);
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let error = expand_multiple("guard", &[(0, 0), (1, 0)]).expect_err("no placeholder");

        assert!(matches!(error, MapLoadError::InvalidTemplate { .. }));
    }

    #[test]
    fn duplicate_spawn_ids_are_rejected() {
        let metadata = r#"{
            "tile_set": { "0": { "gfx": "grass" } },
            "player": { "sprite_id": "player", "location": { "x": 0, "y": 0 } },
            "npcs": [ { "sprite_id": "player", "location": { "x": 1, "y": 0 } } ]
        }"#;
        let error = Map::parse("dupes", "00", metadata).expect_err("duplicate ids");

        assert!(matches!(error, MapLoadError::DuplicateSpawn { .. }));
    }

    #[test]
    fn parsed_map_cannot_reset() {
        let mut map = Map::parse("tiny", "00", METADATA).expect("map should parse");

        assert!(matches!(map.reset(), Err(MapLoadError::NoSource { .. })));
    }

    #[test]
    fn missing_files_report_path() {
        let error = Map::load("/definitely/not/here", "nowhere").expect_err("missing file");

        match error {
            MapLoadError::Io { path, .. } => assert!(path.ends_with("nowhere.csv")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
