//! Floor, corridor and wall tile sets
//!
//! The three sets are disjoint. Corridor wins over floor when a corridor is
//! rasterized across a room, and walls are only ever derived from the other two.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::geom::TilePos;

/// The tile layers of one generation attempt
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileSets {
    width: i32,
    height: i32,
    floor: BTreeSet<TilePos>,
    corridor: BTreeSet<TilePos>,
    wall: BTreeSet<TilePos>,
}

impl TileSets {
    /// Empty layers for a `width` x `height` map
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Check if a position is on the map
    pub fn in_bounds(&self, pos: TilePos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn floor(&self) -> &BTreeSet<TilePos> {
        &self.floor
    }

    pub fn corridor(&self) -> &BTreeSet<TilePos> {
        &self.corridor
    }

    pub fn wall(&self) -> &BTreeSet<TilePos> {
        &self.wall
    }

    pub fn is_floor(&self, pos: TilePos) -> bool {
        self.floor.contains(&pos)
    }

    pub fn is_corridor(&self, pos: TilePos) -> bool {
        self.corridor.contains(&pos)
    }

    pub fn is_wall(&self, pos: TilePos) -> bool {
        self.wall.contains(&pos)
    }

    /// Floor or corridor
    pub fn is_walkable(&self, pos: TilePos) -> bool {
        self.is_floor(pos) || self.is_corridor(pos)
    }

    /// Union of floor and corridor tiles
    pub fn walkable(&self) -> BTreeSet<TilePos> {
        self.floor.union(&self.corridor).copied().collect()
    }

    /// Add carved floor tiles; positions already claimed by a corridor stay corridor
    pub fn add_floor(&mut self, tiles: impl IntoIterator<Item = TilePos>) {
        for pos in tiles {
            if !self.corridor.contains(&pos) {
                self.floor.insert(pos);
            }
        }
    }

    /// Add rasterized corridor tiles, taking them out of the floor set
    pub fn add_corridor(&mut self, tiles: impl IntoIterator<Item = TilePos>) {
        for pos in tiles {
            self.floor.remove(&pos);
            self.wall.remove(&pos);
            self.corridor.insert(pos);
        }
    }

    /// Replace the wall layer
    pub fn set_walls(&mut self, walls: BTreeSet<TilePos>) {
        self.wall = walls;
    }

    /// Drop every tile, keeping the map size
    pub fn clear(&mut self) {
        self.floor.clear();
        self.corridor.clear();
        self.wall.clear();
    }
}
