//! Door placement along corridor ends
//!
//! A door needs solid context on both sides of the corridor. The search starts
//! at the corridor end inside the room and walks outward along the corridor,
//! turning with it at the L-turn point, until it finds such a spot.

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, warn};

use crate::error::{AttemptFailure, CorridorEnd};
use crate::geom::{Direction, TilePos};

use super::corridor::Corridor;
use super::tiles::TileSets;

/// Which door sprite a consumer should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum DoorOrientation {
    /// Door across an up/down corridor
    Vertical,
    LeftFacing,
    RightFacing,
}

impl DoorOrientation {
    pub fn for_direction(dir: Direction) -> Self {
        match dir {
            Direction::Up | Direction::Down => DoorOrientation::Vertical,
            Direction::Left => DoorOrientation::LeftFacing,
            Direction::Right => DoorOrientation::RightFacing,
        }
    }
}

/// A placed door
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Door {
    pub pos: TilePos,
    pub orientation: DoorOrientation,
    /// Corridor direction the position was validated against
    pub direction: Direction,
    /// Index of the connection this door belongs to
    pub connection: usize,
    pub end: CorridorEnd,
}

/// One door search request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorSearch {
    /// Corridor end the search starts from
    pub origin: TilePos,
    pub direction: Direction,
    pub turn: Option<TilePos>,
    /// The opposite corridor end
    pub destination: TilePos,
}

/// Both tiles beside `pos` (relative to `dir`) are off the map or not walkable
pub fn is_suitable_for_door(tiles: &TileSets, pos: TilePos, dir: Direction) -> bool {
    dir.perpendicular().into_iter().all(|side| {
        let n = pos.step(side);
        !tiles.in_bounds(n) || !tiles.is_walkable(n)
    })
}

/// Like [`is_suitable_for_door`], and the next corridor tile ahead must pass too
///
/// Stops a door from opening straight into the exposed side of another corridor.
pub fn is_suitable_for_door_with_next_check(
    tiles: &TileSets,
    pos: TilePos,
    dir: Direction,
) -> bool {
    if !is_suitable_for_door(tiles, pos, dir) {
        return false;
    }

    let next = pos.step(dir);
    if !tiles.in_bounds(next) {
        return false;
    }
    !tiles.is_corridor(next) || is_suitable_for_door(tiles, next, dir)
}

/// Direction after reaching the turn point of an L-shaped corridor
fn direction_after_turn(origin: TilePos, turn: TilePos, destination: TilePos) -> Direction {
    if origin.y == turn.y {
        if destination.y < origin.y {
            Direction::Down
        } else {
            Direction::Up
        }
    } else if destination.x < origin.x {
        Direction::Left
    } else {
        Direction::Right
    }
}

/// Probe up to `probes` tiles for a door position
///
/// Returns the position and the direction it was validated against.
pub fn find_door_position(
    tiles: &TileSets,
    search: DoorSearch,
    probes: u32,
) -> Option<(TilePos, Direction)> {
    let mut pos = search.origin;
    let mut dir = search.direction;

    for attempt in 0..probes {
        if tiles.in_bounds(pos)
            && tiles.is_corridor(pos)
            && is_suitable_for_door_with_next_check(tiles, pos, dir)
        {
            debug!(pos = %pos, attempt = attempt + 1, "door position found");
            return Some((pos, dir));
        }

        if let Some(turn) = search.turn
            && pos == turn
        {
            dir = direction_after_turn(search.origin, turn, search.destination);
        }
        pos = pos.step(dir);
    }

    None
}

/// Place a door on both ends of every corridor
///
/// Fails on the first corridor end without a valid position; the caller
/// discards the whole attempt in that case.
pub fn place_doors(
    tiles: &TileSets,
    corridors: &[Corridor],
    probes: u32,
) -> Result<Vec<Door>, AttemptFailure> {
    let mut doors = Vec::with_capacity(corridors.len() * 2);

    for corridor in corridors {
        let ends = [
            (
                CorridorEnd::Start,
                DoorSearch {
                    origin: corridor.start,
                    direction: corridor.start_direction(),
                    turn: corridor.turn,
                    destination: corridor.end,
                },
            ),
            (
                CorridorEnd::End,
                DoorSearch {
                    origin: corridor.end,
                    direction: corridor.end_direction(),
                    turn: corridor.turn,
                    destination: corridor.start,
                },
            ),
        ];

        for (end, search) in ends {
            let Some((pos, direction)) = find_door_position(tiles, search, probes) else {
                warn!(
                    connection = corridor.connection,
                    ?end,
                    origin = %search.origin,
                    direction = %search.direction,
                    "failed to place door"
                );
                return Err(AttemptFailure::DoorPlacement {
                    connection: corridor.connection,
                    end,
                    origin: search.origin,
                    direction: search.direction,
                    probes,
                });
            };
            doors.push(Door {
                pos,
                orientation: DoorOrientation::for_direction(direction),
                direction,
                connection: corridor.connection,
                end,
            });
        }
    }

    Ok(doors)
}
