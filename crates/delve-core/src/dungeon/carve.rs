//! Organic room carving by biased random walks
//!
//! Walks start at the center of the padded rectangle and wander inside it.
//! The result deliberately does not cover the whole rectangle.

use std::collections::BTreeSet;

use tracing::warn;

use crate::geom::{Rect, TilePos};
use crate::rng::DungeonRng;

/// Tiles per additional walk
const TILES_PER_WALK: i64 = 200;

/// Upper bound on walks per room
const MAX_WALKS: i64 = 6;

/// Tries per step before a walk gives up
const STEP_RETRIES: usize = 5;

/// Probability that a center-biased step scrambles one axis
const CENTER_JITTER: f64 = 0.3;

/// Parameters of the carving walk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarveParams {
    pub fill_ratio: f32,
    pub center_bias: f32,
}

/// Number of tiles the walks aim for
pub fn target_tiles(area: i64, fill_ratio: f32) -> usize {
    (area as f64 * f64::from(fill_ratio)).round().max(0.0) as usize
}

/// Number of independent walks for a given area
pub fn walk_count(area: i64) -> i64 {
    (area / TILES_PER_WALK).clamp(1, MAX_WALKS)
}

/// Carve floor tiles inside `room`
///
/// Returns an empty set (and warns) when the rectangle has no area.
pub fn carve_room(room: Rect, params: CarveParams, rng: &mut DungeonRng) -> BTreeSet<TilePos> {
    let mut path = BTreeSet::new();
    let area = room.area();
    if area == 0 {
        warn!(rect = %room, "padded room has no area, skipping carve");
        return path;
    }

    let center = room.center();
    let target = target_tiles(area, params.fill_ratio);
    let walks = walk_count(area);
    let steps_per_walk = target / walks as usize;

    for _ in 0..walks {
        let mut current = center;
        path.insert(current);

        let mut step = 0;
        while step < steps_per_walk && path.len() < target {
            let Some(next) = try_step(room, current, center, params.center_bias, rng) else {
                break;
            };
            // A diagonal step also claims the tile beside it so the floor stays 4-connected
            if next.x != current.x && next.y != current.y {
                path.insert(TilePos::new(next.x, current.y));
            }
            current = next;
            path.insert(current);
            step += 1;
        }
    }

    path
}

/// Pick a step that lands inside `room`, or `None` after `STEP_RETRIES` misses
fn try_step(
    room: Rect,
    current: TilePos,
    center: TilePos,
    center_bias: f32,
    rng: &mut DungeonRng,
) -> Option<TilePos> {
    for _ in 0..STEP_RETRIES {
        let (dx, dy) = if rng.chance(f64::from(center_bias)) {
            toward_center(current, center, rng)
        } else {
            random_cardinal(rng)
        };
        let next = current.offset(dx, dy);
        if room.contains(next) {
            return Some(next);
        }
    }
    None
}

/// Unit step toward the center, with one axis occasionally scrambled
fn toward_center(current: TilePos, center: TilePos, rng: &mut DungeonRng) -> (i32, i32) {
    let mut dx = (center.x - current.x).signum();
    let mut dy = (center.y - current.y).signum();

    if rng.chance(CENTER_JITTER) {
        if rng.chance(0.5) {
            dx = rng.unit_offset();
        } else {
            dy = rng.unit_offset();
        }
    }
    (dx, dy)
}

fn random_cardinal(rng: &mut DungeonRng) -> (i32, i32) {
    TilePos::CARDINAL[rng.rn2(4) as usize]
}

/// Fraction of `room` covered by `tiles`
pub fn coverage(tiles: usize, room: Rect) -> f64 {
    let area = room.area();
    if area == 0 {
        0.0
    } else {
        tiles as f64 / area as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    const PARAMS: CarveParams = CarveParams {
        fill_ratio: 0.9,
        center_bias: 0.1,
    };

    fn is_4_connected(tiles: &BTreeSet<TilePos>) -> bool {
        let Some(&start) = tiles.iter().next() else {
            return true;
        };
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(pos) = queue.pop_front() {
            for n in pos.cardinal_neighbors() {
                if tiles.contains(&n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen.len() == tiles.len()
    }

    #[test]
    fn test_walk_count() {
        assert_eq!(walk_count(50), 1);
        assert_eq!(walk_count(256), 1);
        assert_eq!(walk_count(600), 3);
        assert_eq!(walk_count(10_000), 6);
    }

    #[test]
    fn test_target_tiles_rounds() {
        assert_eq!(target_tiles(256, 0.9), 230);
        assert_eq!(target_tiles(100, 0.75), 75);
        assert_eq!(target_tiles(0, 0.9), 0);
    }

    #[test]
    fn test_tiles_stay_inside() {
        let room = Rect::new(12, 7, 16, 26);
        let mut rng = DungeonRng::new(42);
        let tiles = carve_room(room, PARAMS, &mut rng);
        assert!(tiles.contains(&room.center()));
        assert!(tiles.iter().all(|t| room.contains(*t)));
    }

    #[test]
    fn test_never_exceeds_area_or_much_past_target() {
        let room = Rect::new(0, 0, 20, 20);
        for seed in 0..10 {
            let mut rng = DungeonRng::new(seed);
            let tiles = carve_room(room, PARAMS, &mut rng);
            // A diagonal step adds two tiles, overshooting by at most one
            assert!(tiles.len() <= target_tiles(room.area(), PARAMS.fill_ratio) + 1);
            assert!(tiles.len() as i64 <= room.area());
        }
    }

    #[test]
    fn test_floor_is_4_connected() {
        let room = Rect::new(0, 0, 30, 24);
        for seed in 0..10 {
            let mut rng = DungeonRng::new(seed);
            let params = CarveParams {
                fill_ratio: 0.6,
                center_bias: 0.7,
            };
            let tiles = carve_room(room, params, &mut rng);
            assert!(is_4_connected(&tiles), "seed {seed} carved a split room");
        }
    }

    #[test]
    fn test_organic_not_rectangular() {
        let room = Rect::new(0, 0, 36, 36);
        let mut rng = DungeonRng::new(42);
        let tiles = carve_room(room, PARAMS, &mut rng);
        assert!((tiles.len() as i64) < room.area());
        assert!(coverage(tiles.len(), room) > 0.05);
    }

    #[test]
    fn test_empty_rect_yields_nothing() {
        let mut rng = DungeonRng::new(42);
        assert!(carve_room(Rect::new(5, 5, 0, 8), PARAMS, &mut rng).is_empty());
        assert_eq!(coverage(0, Rect::new(5, 5, 0, 8)), 0.0);
    }

    #[test]
    fn test_single_tile_room() {
        let mut rng = DungeonRng::new(42);
        let tiles = carve_room(Rect::new(3, 3, 1, 1), PARAMS, &mut rng);
        assert_eq!(tiles.into_iter().collect::<Vec<_>>(), vec![TilePos::new(3, 3)]);
    }

    #[test]
    fn test_deterministic() {
        let room = Rect::new(2, 2, 36, 16);
        let a = carve_room(room, PARAMS, &mut DungeonRng::new(5));
        let b = carve_room(room, PARAMS, &mut DungeonRng::new(5));
        assert_eq!(a, b);
    }
}
