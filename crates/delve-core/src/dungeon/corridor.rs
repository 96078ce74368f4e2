//! Corridor routing between rooms
//!
//! Rooms are chained in greedy nearest-neighbor order starting from room 0,
//! and every consecutive pair is joined by a straight or L-shaped corridor
//! between the boundary tiles of the two rooms that face each other.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AttemptFailure;
use crate::geom::{Direction, TilePos};

use super::room::Room;
use super::tiles::TileSets;

/// Union-find over room indices
///
/// Out-of-range indices are never connected to anything.
#[derive(Debug, Clone)]
pub struct ConnectivityTracker {
    parent: Vec<usize>,
    components: usize,
}

impl ConnectivityTracker {
    /// Every room starts in its own component
    pub fn new(num_rooms: usize) -> Self {
        Self {
            parent: (0..num_rooms).collect(),
            components: num_rooms,
        }
    }

    fn root(&mut self, mut room: usize) -> usize {
        while self.parent[room] != room {
            // Path halving
            self.parent[room] = self.parent[self.parent[room]];
            room = self.parent[room];
        }
        room
    }

    pub fn are_connected(&mut self, a: usize, b: usize) -> bool {
        if a >= self.parent.len() || b >= self.parent.len() {
            return false;
        }
        self.root(a) == self.root(b)
    }

    /// Join the components of `a` and `b`; false if they already were one
    pub fn merge(&mut self, a: usize, b: usize) -> bool {
        if a >= self.parent.len() || b >= self.parent.len() {
            return false;
        }
        let (ra, rb) = (self.root(a), self.root(b));
        if ra == rb {
            return false;
        }
        self.parent[rb] = ra;
        self.components -= 1;
        true
    }

    /// Number of separate room groups
    pub fn components(&self) -> usize {
        self.components
    }

    pub fn all_connected(&self) -> bool {
        self.components <= 1
    }
}

/// Two rooms joined by a corridor; `a < b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
}

impl Connection {
    pub fn new(x: usize, y: usize) -> Self {
        Self {
            a: x.min(y),
            b: x.max(y),
        }
    }
}

/// A rasterized corridor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    /// Index into the connection list
    pub connection: usize,
    /// Boundary tile of room `a`
    pub start: TilePos,
    /// Boundary tile of room `b`
    pub end: TilePos,
    /// Where an L-shaped corridor changes axis
    pub turn: Option<TilePos>,
    /// Every tile of the corridor, start to end
    pub tiles: Vec<TilePos>,
}

impl Corridor {
    pub fn is_l_shaped(&self) -> bool {
        self.turn.is_some()
    }

    /// Direction the corridor leaves `start` in
    pub fn start_direction(&self) -> Direction {
        Direction::toward(self.start, self.turn.unwrap_or(self.end))
    }

    /// Direction the corridor leaves `end` in
    pub fn end_direction(&self) -> Direction {
        Direction::toward(self.end, self.turn.unwrap_or(self.start))
    }
}

/// Output of the routing stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Routing {
    /// Rooms in the order they were chained
    pub order: Vec<usize>,
    pub connections: Vec<Connection>,
    pub corridors: Vec<Corridor>,
}

/// Greedy nearest-neighbor chain over room centers, starting at room 0
///
/// Ties go to the lower room index.
pub fn connection_order(rooms: &[Room]) -> Vec<usize> {
    if rooms.is_empty() {
        return Vec::new();
    }

    let mut order = Vec::with_capacity(rooms.len());
    let mut visited = vec![false; rooms.len()];
    let mut current = 0;
    order.push(current);
    visited[current] = true;

    while order.len() < rooms.len() {
        let here = rooms[current].center();
        let next = rooms
            .iter()
            .enumerate()
            .filter(|(i, _)| !visited[*i])
            .min_by_key(|(_, room)| here.distance_sq(room.center()))
            .map(|(i, _)| i);

        let Some(next) = next else {
            break;
        };
        order.push(next);
        visited[next] = true;
        current = next;
    }

    order
}

/// Floor tiles of `room` with at least one non-floor cardinal neighbor
pub fn boundary_tiles(room: &Room, tiles: &TileSets) -> Vec<TilePos> {
    let rect = room.rect;
    let lo = TilePos::new(rect.x, i32::MIN);
    let hi = TilePos::new(rect.x_max(), i32::MIN);
    tiles
        .floor()
        .range(lo..hi)
        .copied()
        .filter(|pos| rect.contains(*pos))
        .filter(|pos| pos.cardinal_neighbors().any(|n| !tiles.is_floor(n)))
        .collect()
}

/// The candidate closest to `target`; the first one wins ties
pub fn closest_to(candidates: &[TilePos], target: TilePos) -> Option<TilePos> {
    candidates
        .iter()
        .copied()
        .min_by_key(|pos| pos.distance_sq(target))
}

/// Bresenham line from `from` to `to`, both ends included
pub fn line(from: TilePos, to: TilePos) -> Vec<TilePos> {
    let dx = (to.x - from.x).abs();
    let dy = (to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };

    let mut err = dx - dy;
    let mut x = from.x;
    let mut y = from.y;
    let mut out = Vec::with_capacity((dx.max(dy) + 1) as usize);

    while x != to.x || y != to.y {
        out.push(TilePos::new(x, y));
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }

    out.push(to);
    out
}

/// Rasterize a corridor from `start` to `end`
///
/// Aligned endpoints give one straight segment; otherwise the corridor runs
/// horizontally to `(end.x, start.y)` and then vertically to `end`.
pub fn rasterize(connection: usize, start: TilePos, end: TilePos) -> Corridor {
    if start.x == end.x || start.y == end.y {
        return Corridor {
            connection,
            start,
            end,
            turn: None,
            tiles: line(start, end),
        };
    }

    let turn = TilePos::new(end.x, start.y);
    let mut tiles = line(start, turn);
    // The vertical leg starts on the turn tile, which the first leg already holds
    tiles.extend(line(turn, end).into_iter().skip(1));

    Corridor {
        connection,
        start,
        end,
        turn: Some(turn),
        tiles,
    }
}

/// Chain the rooms and dig a corridor for every consecutive pair
///
/// Attachment points are chosen against the floor as carved, before any
/// corridor exists. Corridor tiles then replace floor where they overlap.
pub fn route_corridors(rooms: &mut [Room], tiles: &mut TileSets) -> Routing {
    let order = connection_order(rooms);
    let mut connections = Vec::with_capacity(order.len().saturating_sub(1));
    let mut corridors = Vec::with_capacity(order.len().saturating_sub(1));

    for pair in order.windows(2) {
        let connection = Connection::new(pair[0], pair[1]);
        let room_a = &rooms[connection.a];
        let room_b = &rooms[connection.b];

        let start = closest_to(&boundary_tiles(room_a, tiles), room_b.center());
        let end = closest_to(&boundary_tiles(room_b, tiles), room_a.center());
        let (Some(start), Some(end)) = (start, end) else {
            warn!(
                a = connection.a,
                b = connection.b,
                "room without boundary tiles, skipping connection"
            );
            continue;
        };

        let corridor = rasterize(connections.len(), start, end);
        debug!(
            a = connection.a,
            b = connection.b,
            start = %start,
            end = %end,
            l_shaped = corridor.is_l_shaped(),
            length = corridor.tiles.len(),
            "routed corridor"
        );
        connections.push(connection);
        corridors.push(corridor);
    }

    for corridor in &corridors {
        tiles.add_corridor(corridor.tiles.iter().copied());
    }
    for connection in &connections {
        rooms[connection.a].connect(connection.b);
        rooms[connection.b].connect(connection.a);
    }

    Routing {
        order,
        connections,
        corridors,
    }
}

/// Check that the connections join every room into one component
pub fn connects_all(num_rooms: usize, connections: &[Connection]) -> bool {
    component_count(num_rooms, connections) <= 1
}

fn component_count(num_rooms: usize, connections: &[Connection]) -> usize {
    let mut tracker = ConnectivityTracker::new(num_rooms);
    for c in connections {
        tracker.merge(c.a, c.b);
    }
    tracker.components()
}

/// Fail the attempt unless the routed connections reach every room
///
/// Routing skips rooms without boundary tiles, which can leave the chain split.
pub fn ensure_connected(num_rooms: usize, connections: &[Connection]) -> Result<(), AttemptFailure> {
    let components = component_count(num_rooms, connections);
    if components <= 1 {
        return Ok(());
    }
    debug!(
        rooms = num_rooms,
        connections = connections.len(),
        components,
        "routing left rooms unconnected"
    );
    Err(AttemptFailure::Disconnected {
        rooms: num_rooms,
        connections: connections.len(),
        components,
    })
}

/// Tiles reachable from `start` over 4-adjacent walkable tiles
pub fn reachable_from(tiles: &TileSets, start: TilePos) -> BTreeSet<TilePos> {
    let mut seen = BTreeSet::new();
    if !tiles.is_walkable(start) {
        return seen;
    }
    let mut stack = vec![start];
    seen.insert(start);
    while let Some(pos) = stack.pop() {
        for n in pos.cardinal_neighbors() {
            if tiles.is_walkable(n) && seen.insert(n) {
                stack.push(n);
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Rect;

    fn filled_room(tiles: &mut TileSets, rect: Rect, index: usize) -> Room {
        tiles.add_floor(rect.tiles());
        Room::new(rect, index)
    }

    #[test]
    fn test_connectivity_tracker() {
        let mut tracker = ConnectivityTracker::new(5);

        assert!(!tracker.are_connected(0, 1));

        tracker.merge(0, 1);
        assert!(tracker.are_connected(0, 1));
        assert!(!tracker.are_connected(0, 2));

        tracker.merge(1, 2);
        assert!(tracker.are_connected(0, 2));
        assert!(!tracker.all_connected());

        assert!(!tracker.merge(2, 0));
        assert_eq!(tracker.components(), 3);

        assert!(tracker.merge(2, 3));
        assert!(tracker.merge(3, 4));
        assert!(tracker.all_connected());
        assert!(!tracker.are_connected(0, 9));
        assert!(!tracker.merge(0, 9));
    }

    #[test]
    fn test_connection_order_greedy() {
        let rooms: Vec<Room> = [0, 60, 20, 40]
            .iter()
            .enumerate()
            .map(|(i, &x)| Room::new(Rect::new(x, 0, 20, 20), i))
            .collect();
        assert_eq!(connection_order(&rooms), vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_connection_normalizes_pair() {
        assert_eq!(Connection::new(5, 2), Connection { a: 2, b: 5 });
    }

    #[test]
    fn test_line_horizontal_and_diagonal() {
        let h = line(TilePos::new(2, 3), TilePos::new(6, 3));
        assert_eq!(h.len(), 5);
        assert!(h.iter().all(|p| p.y == 3));

        let back = line(TilePos::new(6, 3), TilePos::new(2, 3));
        assert_eq!(back.first(), Some(&TilePos::new(6, 3)));
        assert_eq!(back.last(), Some(&TilePos::new(2, 3)));

        let d = line(TilePos::new(0, 0), TilePos::new(3, 3));
        assert_eq!(
            d,
            vec![
                TilePos::new(0, 0),
                TilePos::new(1, 1),
                TilePos::new(2, 2),
                TilePos::new(3, 3)
            ]
        );
    }

    #[test]
    fn test_line_single_point() {
        assert_eq!(line(TilePos::new(4, 4), TilePos::new(4, 4)), vec![TilePos::new(4, 4)]);
    }

    #[test]
    fn test_rasterize_l_shape() {
        let corridor = rasterize(0, TilePos::new(2, 2), TilePos::new(6, 8));
        assert_eq!(corridor.turn, Some(TilePos::new(6, 2)));
        assert_eq!(corridor.tiles.len(), 5 + 6);
        assert_eq!(corridor.tiles.first(), Some(&TilePos::new(2, 2)));
        assert_eq!(corridor.tiles.last(), Some(&TilePos::new(6, 8)));
        assert_eq!(corridor.start_direction(), Direction::Right);
        assert_eq!(corridor.end_direction(), Direction::Down);

        let unique: BTreeSet<_> = corridor.tiles.iter().collect();
        assert_eq!(unique.len(), corridor.tiles.len());
    }

    #[test]
    fn test_rasterize_straight_directions() {
        let vertical = rasterize(0, TilePos::new(4, 10), TilePos::new(4, 2));
        assert!(!vertical.is_l_shaped());
        assert_eq!(vertical.start_direction(), Direction::Down);
        assert_eq!(vertical.end_direction(), Direction::Up);

        let leftward = rasterize(0, TilePos::new(9, 1), TilePos::new(3, 1));
        assert_eq!(leftward.start_direction(), Direction::Left);
        assert_eq!(leftward.end_direction(), Direction::Right);
    }

    #[test]
    fn test_boundary_tiles_of_block() {
        let mut tiles = TileSets::new(30, 30);
        let room = filled_room(&mut tiles, Rect::new(2, 2, 4, 4), 0);
        let boundary = boundary_tiles(&room, &tiles);
        assert_eq!(boundary.len(), 12);
        assert!(!boundary.contains(&TilePos::new(3, 3)));
    }

    #[test]
    fn test_closest_to() {
        let candidates = [TilePos::new(0, 0), TilePos::new(5, 5), TilePos::new(9, 9)];
        assert_eq!(closest_to(&candidates, TilePos::new(6, 6)), Some(TilePos::new(5, 5)));
        assert_eq!(closest_to(&[], TilePos::new(6, 6)), None);
    }

    #[test]
    fn test_route_two_rooms() {
        let mut tiles = TileSets::new(40, 20);
        let mut rooms = vec![
            filled_room(&mut tiles, Rect::new(2, 2, 6, 6), 0),
            filled_room(&mut tiles, Rect::new(20, 2, 6, 6), 1),
        ];
        // Floor only in the padded area; the room rect is wider
        rooms[0].rect = Rect::new(0, 0, 10, 10);
        rooms[1].rect = Rect::new(18, 0, 10, 10);

        let routing = route_corridors(&mut rooms, &mut tiles);

        assert_eq!(routing.order, vec![0, 1]);
        assert_eq!(routing.connections, vec![Connection { a: 0, b: 1 }]);
        let corridor = &routing.corridors[0];
        assert_eq!(corridor.start, TilePos::new(7, 5));
        assert_eq!(corridor.end, TilePos::new(20, 5));
        assert!(!corridor.is_l_shaped());

        assert!(tiles.is_corridor(TilePos::new(7, 5)));
        assert!(!tiles.is_floor(TilePos::new(7, 5)));
        assert_eq!(rooms[0].connected_rooms, vec![1]);
        assert_eq!(rooms[1].connected_rooms, vec![0]);

        let reach = reachable_from(&tiles, TilePos::new(3, 3));
        assert!(reach.contains(&TilePos::new(24, 6)));
        assert!(connects_all(2, &routing.connections));
    }

    #[test]
    fn test_connects_all_detects_gap() {
        let connections = [Connection::new(0, 1), Connection::new(2, 3)];
        assert!(!connects_all(4, &connections));
        assert!(connects_all(1, &[]));
    }

    #[test]
    fn test_single_room_has_no_corridors() {
        let mut tiles = TileSets::new(30, 30);
        let mut rooms = vec![filled_room(&mut tiles, Rect::new(2, 2, 4, 4), 0)];
        let routing = route_corridors(&mut rooms, &mut tiles);
        assert_eq!(routing.order, vec![0]);
        assert!(routing.corridors.is_empty());
        assert!(tiles.corridor().is_empty());
    }

    #[test]
    fn test_room_without_floor_breaks_chain() {
        let mut tiles = TileSets::new(60, 20);
        let mut rooms = vec![
            filled_room(&mut tiles, Rect::new(2, 2, 6, 6), 0),
            // Nothing was carved here, so it has no boundary tiles
            Room::new(Rect::new(20, 2, 6, 6), 1),
            filled_room(&mut tiles, Rect::new(40, 2, 6, 6), 2),
        ];

        let routing = route_corridors(&mut rooms, &mut tiles);

        assert_eq!(routing.order, vec![0, 1, 2]);
        assert!(routing.connections.is_empty());
        assert!(rooms[1].connected_rooms.is_empty());
        assert!(!connects_all(rooms.len(), &routing.connections));
        assert_eq!(
            ensure_connected(rooms.len(), &routing.connections),
            Err(AttemptFailure::Disconnected {
                rooms: 3,
                connections: 0,
                components: 3,
            })
        );
    }

    #[test]
    fn test_ensure_connected_accepts_chain() {
        let chain = [Connection::new(0, 1), Connection::new(1, 2)];
        assert_eq!(ensure_connected(3, &chain), Ok(()));
        assert_eq!(ensure_connected(1, &[]), Ok(()));
    }
}
