//! Layout statistics

use serde::{Deserialize, Serialize};

use super::carve::target_tiles;
use super::room::Room;
use super::tiles::TileSets;
use super::wall::perimeter_tiles;

/// Carving result for one room
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomCoverage {
    pub room: usize,
    /// Area of the padded rectangle
    pub area: i64,
    pub target: usize,
    pub carved: usize,
}

impl RoomCoverage {
    /// Carved tiles over padded area
    pub fn ratio(&self) -> f64 {
        if self.area == 0 {
            0.0
        } else {
            self.carved as f64 / self.area as f64
        }
    }

    /// Signed deviation from the target, as a fraction of the target
    pub fn deviation(&self) -> f64 {
        if self.target == 0 {
            0.0
        } else {
            (self.carved as f64 - self.target as f64) / self.target as f64
        }
    }
}

/// Whole-dungeon statistics
///
/// Room areas are measured on the padded rectangles the carver fills. Density
/// and space efficiency compare planned room space against the whole map;
/// `walkable_density` is what the walks actually produced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DungeonMetrics {
    pub room_count: usize,
    pub min_room_area: i64,
    pub max_room_area: i64,
    /// Upper middle value for an even room count
    pub median_room_area: i64,
    pub average_room_area: f64,
    /// Sum of the per-room fill targets
    pub expected_walkable: usize,
    pub floor_tiles: usize,
    pub corridor_tiles: usize,
    pub wall_tiles: usize,
    /// Walkable tiles with a non-walkable neighbor
    pub perimeter_tiles: usize,
    /// Expected walkable tiles over map area
    pub density: f64,
    /// Padded room area over map area
    pub space_efficiency: f64,
    /// Floor and corridor tiles over map area
    pub walkable_density: f64,
    pub coverage: Vec<RoomCoverage>,
}

impl DungeonMetrics {
    pub fn walkable_tiles(&self) -> usize {
        self.floor_tiles + self.corridor_tiles
    }

    /// Compute the metrics of a finished layout
    pub fn compute(
        rooms: &[Room],
        tiles: &TileSets,
        offset: i32,
        fill_ratio: f32,
        coverage: Vec<RoomCoverage>,
    ) -> Self {
        let mut areas: Vec<i64> = rooms.iter().map(|r| r.padded(offset).area()).collect();
        areas.sort_unstable();

        let total_area: i64 = areas.iter().sum();
        let expected: usize = areas.iter().map(|&a| target_tiles(a, fill_ratio)).sum();
        let walkable = tiles.floor().len() + tiles.corridor().len();
        let map_area = i64::from(tiles.width()) * i64::from(tiles.height());

        Self {
            room_count: rooms.len(),
            min_room_area: areas.first().copied().unwrap_or(0),
            max_room_area: areas.last().copied().unwrap_or(0),
            median_room_area: areas.get(areas.len() / 2).copied().unwrap_or(0),
            average_room_area: if areas.is_empty() {
                0.0
            } else {
                total_area as f64 / areas.len() as f64
            },
            expected_walkable: expected,
            floor_tiles: tiles.floor().len(),
            corridor_tiles: tiles.corridor().len(),
            wall_tiles: tiles.wall().len(),
            perimeter_tiles: perimeter_tiles(tiles).len(),
            density: ratio(expected as i64, map_area),
            space_efficiency: ratio(total_area, map_area),
            walkable_density: ratio(walkable as i64, map_area),
            coverage,
        }
    }
}

/// Coverage record for a freshly carved room
pub fn room_coverage(room: &Room, offset: i32, fill_ratio: f32, carved: usize) -> RoomCoverage {
    let padded = room.padded(offset);
    RoomCoverage {
        room: room.index,
        area: padded.area(),
        target: target_tiles(padded.area(), fill_ratio),
        carved,
    }
}

fn ratio(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Rect, TilePos};

    #[test]
    fn test_room_coverage() {
        let room = Room::new(Rect::new(0, 0, 20, 20), 3);
        let cov = room_coverage(&room, 2, 0.9, 200);
        assert_eq!(cov.room, 3);
        assert_eq!(cov.area, 256);
        assert_eq!(cov.target, 230);
        assert!((cov.ratio() - 200.0 / 256.0).abs() < 1e-9);
        assert!(cov.deviation() < 0.0);
    }

    #[test]
    fn test_compute() {
        let rooms = vec![
            Room::new(Rect::new(0, 0, 10, 10), 0),
            Room::new(Rect::new(10, 0, 20, 10), 1),
            Room::new(Rect::new(30, 0, 10, 10), 2),
        ];
        let mut tiles = TileSets::new(40, 10);
        tiles.add_floor(Rect::new(2, 2, 6, 6).tiles());
        tiles.add_corridor((8..12).map(|x| TilePos::new(x, 4)));

        let metrics = DungeonMetrics::compute(&rooms, &tiles, 2, 0.5, Vec::new());
        assert_eq!(metrics.room_count, 3);
        // 6x6, 16x6 and 6x6 padded rects
        assert_eq!(metrics.min_room_area, 36);
        assert_eq!(metrics.max_room_area, 96);
        assert_eq!(metrics.median_room_area, 36);
        assert_eq!(metrics.average_room_area, 56.0);
        assert_eq!(metrics.expected_walkable, 18 + 48 + 18);
        assert_eq!(metrics.floor_tiles, 36);
        assert_eq!(metrics.corridor_tiles, 4);
        assert_eq!(metrics.walkable_tiles(), 40);
        assert!((metrics.density - 84.0 / 400.0).abs() < 1e-9);
        assert!((metrics.space_efficiency - 168.0 / 400.0).abs() < 1e-9);
        assert!((metrics.walkable_density - 40.0 / 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_even_count_uses_upper_median() {
        let rooms = vec![
            Room::new(Rect::new(0, 0, 10, 10), 0),
            Room::new(Rect::new(10, 0, 20, 10), 1),
        ];
        let metrics = DungeonMetrics::compute(&rooms, &TileSets::new(30, 10), 2, 0.9, Vec::new());
        assert_eq!(metrics.median_room_area, 96);
        // round(32.4) + round(86.4)
        assert_eq!(metrics.expected_walkable, 32 + 86);
    }

    #[test]
    fn test_empty_layout() {
        let metrics = DungeonMetrics::compute(&[], &TileSets::new(0, 0), 2, 0.9, Vec::new());
        assert_eq!(metrics.room_count, 0);
        assert_eq!(metrics.density, 0.0);
        assert_eq!(metrics.median_room_area, 0);
        assert_eq!(metrics.space_efficiency, 0.0);
    }
}
