//! The finished dungeon handed to consumers

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::geom::TilePos;

use super::corridor::{Connection, Corridor};
use super::door::Door;
use super::metrics::DungeonMetrics;
use super::room::{Room, RoomType};
use super::tiles::TileSets;

/// A completed, validated dungeon layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    pub(crate) rooms: Vec<Room>,
    pub(crate) tiles: TileSets,
    pub(crate) order: Vec<usize>,
    pub(crate) connections: Vec<Connection>,
    pub(crate) corridors: Vec<Corridor>,
    pub(crate) doors: Vec<Door>,
    pub(crate) offset: i32,
    pub(crate) seed: u64,
    pub(crate) attempts: u32,
    pub(crate) metrics: DungeonMetrics,
}

impl Dungeon {
    pub fn width(&self) -> i32 {
        self.tiles.width()
    }

    pub fn height(&self) -> i32 {
        self.tiles.height()
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, index: usize) -> Option<&Room> {
        self.rooms.get(index)
    }

    pub fn tiles(&self) -> &TileSets {
        &self.tiles
    }

    pub fn floor(&self) -> &BTreeSet<TilePos> {
        self.tiles.floor()
    }

    pub fn corridor(&self) -> &BTreeSet<TilePos> {
        self.tiles.corridor()
    }

    pub fn walls(&self) -> &BTreeSet<TilePos> {
        self.tiles.wall()
    }

    /// Room indices in the order they were chained together
    pub fn connection_order(&self) -> &[usize] {
        &self.order
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// Padding between a partition edge and its floor
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Seed of the generator that produced this layout
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Attempts the generator needed, counting the successful one
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn metrics(&self) -> &DungeonMetrics {
        &self.metrics
    }

    pub fn is_walkable(&self, pos: TilePos) -> bool {
        self.tiles.is_walkable(pos)
    }

    /// Floor and corridor tiles together
    pub fn walkable(&self) -> BTreeSet<TilePos> {
        self.tiles.walkable()
    }

    pub fn is_door(&self, pos: TilePos) -> bool {
        self.doors.iter().any(|d| d.pos == pos)
    }

    /// The room whose partition contains `pos`
    pub fn room_at(&self, pos: TilePos) -> Option<&Room> {
        self.rooms.iter().find(|r| r.contains(pos))
    }

    /// Floor tiles inside the padded area of a room
    ///
    /// These are the positions entities may be spawned on.
    pub fn floor_tiles_in_room(&self, index: usize) -> Vec<TilePos> {
        let Some(room) = self.rooms.get(index) else {
            return Vec::new();
        };
        let area = room.padded(self.offset);
        self.tiles
            .floor()
            .iter()
            .copied()
            .filter(|pos| area.contains(*pos))
            .collect()
    }

    /// First room carrying the given role
    pub fn room_of_type(&self, room_type: RoomType) -> Option<&Room> {
        self.rooms.iter().find(|r| r.room_type == room_type)
    }

    pub fn starting_room(&self) -> Option<&Room> {
        self.room_of_type(RoomType::Starting)
    }

    pub fn boss_room(&self) -> Option<&Room> {
        self.room_of_type(RoomType::Boss)
    }

    /// Where the player is placed: the center of the starting room
    pub fn spawn_point(&self) -> Option<TilePos> {
        self.starting_room().map(Room::center)
    }

    /// Rooms with only one corridor
    pub fn dead_ends(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|r| r.is_dead_end())
    }
}
