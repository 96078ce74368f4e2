//! Room types and structures
//!
//! A room is one final partition of the map. Its rectangle never changes after
//! partitioning; carving, routing and role assignment only add to it.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::debug;

use crate::geom::{Rect, TilePos};
use crate::rng::DungeonRng;

/// Role a room plays in the finished dungeon
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum RoomType {
    /// Ordinary room with enemies and chests
    #[default]
    Normal,
    /// Final room, holds the boss
    Boss,
    /// Merchant room, no enemies
    Shop,
    /// Loot-only room
    Treasure,
    /// Player spawn room
    Starting,
}

impl RoomType {
    /// Whether the room is free for a special role
    pub fn is_assignable(self) -> bool {
        self == RoomType::Normal
    }
}

/// One partition of the map and the bookkeeping attached to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Partition rectangle (before padding)
    pub rect: Rect,
    /// Role assigned after a successful attempt
    pub room_type: RoomType,
    /// Position in the room list
    pub index: usize,
    /// Indices of rooms joined to this one by a corridor
    pub connected_rooms: Vec<usize>,
}

impl Room {
    /// An unconnected room with no special role
    pub fn new(rect: Rect, index: usize) -> Self {
        Self {
            rect,
            room_type: RoomType::Normal,
            index,
            connected_rooms: Vec::new(),
        }
    }

    /// Where carving starts and the player spawns
    pub fn center(&self) -> TilePos {
        self.rect.center()
    }

    /// Area the carver may fill
    pub fn padded(&self, offset: i32) -> Rect {
        self.rect.shrink(offset)
    }

    /// Whether `pos` lies in the partition, padding included
    pub fn contains(&self, pos: TilePos) -> bool {
        self.rect.contains(pos)
    }

    /// A room reachable through a single corridor
    pub fn is_dead_end(&self) -> bool {
        self.connected_rooms.len() <= 1
    }

    /// Record a corridor to another room (ignores duplicates)
    pub fn connect(&mut self, other: usize) {
        if other != self.index && !self.connected_rooms.contains(&other) {
            self.connected_rooms.push(other);
        }
    }
}

/// Tag rooms with their roles once the layout is final
///
/// The first room of the connection order is where the player starts and the
/// last one holds the boss. Shops and treasure rooms are drawn from whatever
/// is still normal; requests beyond the number of free rooms are dropped.
pub fn assign_room_types(
    rooms: &mut [Room],
    order: &[usize],
    shop_rooms: usize,
    treasure_rooms: usize,
    rng: &mut DungeonRng,
) {
    let Some(&first) = order.first() else {
        return;
    };
    rooms[first].room_type = RoomType::Starting;

    if let Some(&last) = order.last()
        && last != first
    {
        rooms[last].room_type = RoomType::Boss;
    }

    let mut free: Vec<usize> = order
        .iter()
        .copied()
        .filter(|&idx| rooms[idx].room_type.is_assignable())
        .collect();
    rng.shuffle(&mut free);

    let mut free = free.into_iter();
    for idx in free.by_ref().take(shop_rooms) {
        rooms[idx].room_type = RoomType::Shop;
    }
    for idx in free.take(treasure_rooms) {
        rooms[idx].room_type = RoomType::Treasure;
    }

    debug!(
        rooms = rooms.len(),
        start = first,
        boss = order.last().copied().unwrap_or(first),
        "assigned room types"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn row_of_rooms(n: usize) -> Vec<Room> {
        (0..n)
            .map(|i| Room::new(Rect::new(i as i32 * 20, 0, 20, 20), i))
            .collect()
    }

    #[test]
    fn test_room_center() {
        let room = Room::new(Rect::new(10, 20, 21, 20), 0);
        assert_eq!(room.center(), TilePos::new(20, 30));
    }

    #[test]
    fn test_contains_includes_padding() {
        let room = Room::new(Rect::new(10, 20, 21, 20), 0);
        let corner = TilePos::new(10, 20);
        assert!(room.contains(corner));
        assert!(!room.padded(2).contains(corner));
        assert!(!room.contains(TilePos::new(31, 20)));
        assert_eq!(room.room_type, RoomType::Normal);
        assert!(room.connected_rooms.is_empty());
    }

    #[test]
    fn test_connect_ignores_duplicates_and_self() {
        let mut room = Room::new(Rect::new(0, 0, 20, 20), 3);
        room.connect(1);
        room.connect(1);
        room.connect(3);
        assert_eq!(room.connected_rooms, vec![1]);
        assert!(room.is_dead_end());
        room.connect(4);
        assert!(!room.is_dead_end());
    }

    #[test]
    fn test_assign_start_and_boss() {
        let mut rooms = row_of_rooms(5);
        let order = vec![0, 1, 2, 3, 4];
        let mut rng = DungeonRng::new(42);

        assign_room_types(&mut rooms, &order, 1, 1, &mut rng);

        assert_eq!(rooms[0].room_type, RoomType::Starting);
        assert_eq!(rooms[4].room_type, RoomType::Boss);

        let count = |t: RoomType| rooms.iter().filter(|r| r.room_type == t).count();
        assert_eq!(count(RoomType::Shop), 1);
        assert_eq!(count(RoomType::Treasure), 1);
        assert_eq!(count(RoomType::Normal), 1);
    }

    #[test]
    fn test_assign_caps_at_free_rooms() {
        let mut rooms = row_of_rooms(3);
        let mut rng = DungeonRng::new(42);

        assign_room_types(&mut rooms, &[0, 1, 2], 5, 5, &mut rng);

        assert_eq!(rooms[1].room_type, RoomType::Shop);
        assert_eq!(rooms[0].room_type, RoomType::Starting);
        assert_eq!(rooms[2].room_type, RoomType::Boss);
    }

    #[test]
    fn test_single_room_is_only_starting() {
        let mut rooms = row_of_rooms(1);
        let mut rng = DungeonRng::new(42);

        assign_room_types(&mut rooms, &[0], 0, 0, &mut rng);

        assert_eq!(rooms[0].room_type, RoomType::Starting);
    }

    #[test]
    fn test_room_type_names() {
        let names: Vec<String> = RoomType::iter().map(|t| t.to_string()).collect();
        assert_eq!(names, ["Normal", "Boss", "Shop", "Treasure", "Starting"]);
    }
}
