//! Dungeon layout generation
//!
//! Contains the generation stages, the tile layers they fill in and the
//! generator that drives them.

mod carve;
mod corridor;
mod door;
mod generator;
mod layout;
mod metrics;
mod partition;
mod room;
mod tiles;
mod wall;

pub use carve::{CarveParams, carve_room, coverage, target_tiles, walk_count};
pub use corridor::{
    Connection, ConnectivityTracker, Corridor, Routing, boundary_tiles, closest_to,
    connection_order, connects_all, ensure_connected, line, rasterize, reachable_from, route_corridors,
};
pub use door::{
    Door, DoorOrientation, DoorSearch, find_door_position, is_suitable_for_door,
    is_suitable_for_door_with_next_check, place_doors,
};
pub use generator::{DungeonGenerator, GenerationObserver, GenerationStage};
pub use layout::Dungeon;
pub use metrics::{DungeonMetrics, RoomCoverage, room_coverage};
pub use partition::partition;
pub use room::{Room, RoomType, assign_room_types};
pub use tiles::TileSets;
pub use wall::{derive_walls, perimeter_tiles};
