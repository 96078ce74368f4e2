//! Error types for dungeon generation
//!
//! Configuration problems are rejected before any generation work starts.
//! Door placement and connectivity failures only abort the current attempt;
//! the generator surfaces them once its retry budget is spent.

use thiserror::Error;

use crate::geom::{Direction, TilePos};

/// Invalid generator configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Map dimensions must be positive, got {width}x{height}")]
    EmptyMap { width: i32, height: i32 },

    #[error("Minimum room size must be positive, got {0}")]
    ZeroRoomSize(i32),

    #[error("Minimum room size {min_room_size} is at least half of map dimension {dimension}")]
    RoomTooLarge { min_room_size: i32, dimension: i32 },

    #[error("Target room count must be at least 1")]
    NoRooms,

    #[error("Offset {offset} leaves no floor inside a {min_room_size}-wide room")]
    OffsetTooLarge { offset: i32, min_room_size: i32 },

    #[error("Negative room offset {0}")]
    NegativeOffset(i32),

    #[error("Fill ratio {0} outside 0.3..=1.0")]
    FillRatio(f32),

    #[error("Center bias {0} outside 0.1..=0.7")]
    CenterBias(f32),

    #[error("Max attempts must be at least 1")]
    NoAttempts,
}

/// Which end of a connection a door belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CorridorEnd {
    Start,
    End,
}

/// Reason a single generation attempt was abandoned
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    #[error(
        "No door position for connection {connection} ({end:?} side) within {probes} probes from {origin} heading {direction}"
    )]
    DoorPlacement {
        connection: usize,
        end: CorridorEnd,
        origin: TilePos,
        direction: Direction,
        probes: u32,
    },

    #[error("Corridors join {rooms} rooms in {components} separate groups ({connections} connections)")]
    Disconnected {
        rooms: usize,
        connections: usize,
        components: usize,
    },
}

/// Error returned to the caller of a generate request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Dungeon generation failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: AttemptFailure },
}
