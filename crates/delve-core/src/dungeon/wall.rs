//! Wall derivation from walkable tiles

use std::collections::BTreeSet;

use crate::geom::TilePos;

use super::tiles::TileSets;

/// Every in-bounds 8-neighbor of a walkable tile that is not walkable itself
pub fn derive_walls(tiles: &TileSets) -> BTreeSet<TilePos> {
    let walkable = tiles.walkable();
    walkable
        .iter()
        .flat_map(|pos| pos.neighbors_8())
        .filter(|n| tiles.in_bounds(*n) && !walkable.contains(n))
        .collect()
}

/// Walkable tiles with at least one non-walkable 8-neighbor (map edge counts)
pub fn perimeter_tiles(tiles: &TileSets) -> BTreeSet<TilePos> {
    let walkable = tiles.walkable();
    walkable
        .iter()
        .copied()
        .filter(|pos| pos.neighbors_8().any(|n| !walkable.contains(&n)))
        .collect()
}
