//! Blocking queries against the map and other sprites.

use pharcobial_core::{Rect, BLOCK_SIZE};
use thiserror::Error;

use crate::map::Map;

/// Reasons the collision grid is not ready for use.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollisionError {
    /// The grid does not cover any tiles.
    #[error("collision grid is empty")]
    Empty,
    /// The grid was built from a map of different dimensions.
    #[error("collision grid is {columns}x{rows} but the map is {map_columns}x{map_rows}")]
    DimensionMismatch {
        /// Columns covered by the grid.
        columns: usize,
        /// Rows covered by the grid.
        rows: usize,
        /// Columns in the map.
        map_columns: usize,
        /// Rows in the map.
        map_rows: usize,
    },
}

/// Dense record of which map tiles block movement.
#[derive(Clone, Debug)]
pub struct Collision {
    columns: usize,
    rows: usize,
    solid: Vec<bool>,
}

impl Collision {
    /// Builds the grid from the map's tile legend.
    #[must_use]
    pub fn from_map(map: &Map) -> Self {
        let solid = map
            .cells()
            .map(|(column, row, _)| map.tile(column, row).map_or(true, |tile| tile.collision()))
            .collect();

        Self {
            columns: map.width(),
            rows: map.height(),
            solid,
        }
    }

    /// Confirms the grid matches the map it will be queried against.
    pub fn validate(&self, map: &Map) -> Result<(), CollisionError> {
        if self.solid.is_empty() {
            return Err(CollisionError::Empty);
        }

        if self.columns != map.width() || self.rows != map.height() {
            return Err(CollisionError::DimensionMismatch {
                columns: self.columns,
                rows: self.rows,
                map_columns: map.width(),
                map_rows: map.height(),
            });
        }

        log::debug!("Collision ready.");
        Ok(())
    }

    /// Reports whether `rect` leaves the map or overlaps a solid tile.
    #[must_use]
    pub fn blocks(&self, rect: Rect) -> bool {
        let width = i32::try_from(self.columns).unwrap_or(i32::MAX);
        let height = i32::try_from(self.rows).unwrap_or(i32::MAX);
        if rect.left() < 0
            || rect.top() < 0
            || rect.right() > width.saturating_mul(BLOCK_SIZE)
            || rect.bottom() > height.saturating_mul(BLOCK_SIZE)
        {
            return true;
        }

        let first_column = rect.left().div_euclid(BLOCK_SIZE);
        let last_column = (rect.right() - 1).div_euclid(BLOCK_SIZE);
        let first_row = rect.top().div_euclid(BLOCK_SIZE);
        let last_row = (rect.bottom() - 1).div_euclid(BLOCK_SIZE);

        (first_row..=last_row).any(|row| {
            (first_column..=last_column).any(|column| self.is_solid(column, row))
        })
    }

    fn is_solid(&self, column: i32, row: i32) -> bool {
        let (Ok(column), Ok(row)) = (usize::try_from(column), usize::try_from(row)) else {
            return true;
        };
        if column >= self.columns || row >= self.rows {
            return true;
        }
        self.solid
            .get(row * self.columns + column)
            .copied()
            .unwrap_or(true)
    }
}

/// Collision grid plus the rectangles of every other solid sprite.
#[derive(Clone, Copy, Debug)]
pub struct CollisionView<'a> {
    grid: &'a Collision,
    obstacles: &'a [Rect],
}

impl<'a> CollisionView<'a> {
    /// Captures a view over the grid and the provided obstacles.
    #[must_use]
    pub fn new(grid: &'a Collision, obstacles: &'a [Rect]) -> Self {
        Self { grid, obstacles }
    }

    /// Reports whether a sprite occupying `rect` would be blocked.
    #[must_use]
    pub fn blocked(&self, rect: Rect) -> bool {
        self.grid.blocks(rect) || self.obstacles.iter().any(|other| other.intersects(&rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharcobial_core::Position;

    fn walled_map() -> Map {
        let metadata = r#"{
            "tile_set": {
                "0": { "gfx": "grass", "collision": false },
                "1": { "gfx": "wall", "collision": true }
            },
            "player": { "sprite_id": "player", "location": { "x": 0, "y": 0 } }
        }"#;
        Map::parse("walled", "000\n010\n000", metadata).expect("map should parse")
    }

    #[test]
    fn solid_tiles_block_overlapping_rects() {
        let map = walled_map();
        let collision = Collision::from_map(&map);

        assert!(collision.blocks(Rect::block(Position::from_tile(1, 1))));
        assert!(collision.blocks(Rect::block(Position::new(1, 1))));
        assert!(!collision.blocks(Rect::block(Position::from_tile(0, 0))));
        assert!(!collision.blocks(Rect::block(Position::from_tile(2, 2))));
    }

    #[test]
    fn leaving_the_map_is_blocked() {
        let collision = Collision::from_map(&walled_map());

        assert!(collision.blocks(Rect::block(Position::new(-1, 0))));
        assert!(collision.blocks(Rect::block(Position::new(0, 3 * BLOCK_SIZE - 31))));
    }

    #[test]
    fn obstacles_block_in_addition_to_tiles() {
        let collision = Collision::from_map(&walled_map());
        let obstacles = [Rect::block(Position::from_tile(2, 0))];
        let view = CollisionView::new(&collision, &obstacles);

        assert!(view.blocked(Rect::block(Position::new(BLOCK_SIZE + 4, 0))));
        assert!(!view.blocked(Rect::block(Position::from_tile(0, 0))));
    }

    #[test]
    fn validate_detects_mismatched_map() {
        let collision = Collision::from_map(&walled_map());
        let metadata = r#"{ "tile_set": { "0": { "gfx": "grass" } } }"#;
        let other = Map::parse("other", "00", metadata).expect("map should parse");

        assert!(collision.validate(&walled_map()).is_ok());
        assert!(matches!(
            collision.validate(&other),
            Err(CollisionError::DimensionMismatch { .. })
        ));
    }
}
