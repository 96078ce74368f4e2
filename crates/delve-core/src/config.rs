//! Generator configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geom::Rect;

/// Everything a generation request depends on
///
/// There is no process-wide state: the generator owns one of these and hands
/// the relevant fields to each stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Map width in tiles
    pub map_width: i32,
    /// Map height in tiles
    pub map_height: i32,
    /// Smallest side a partition may have after a split
    pub min_room_size: i32,
    /// Number of rooms the partitioner aims for
    pub target_rooms: usize,
    /// Padding between a partition edge and its carvable area
    pub offset: i32,
    /// Fraction of the padded area the random walks try to cover (0.3..=1.0)
    pub fill_ratio: f32,
    /// Probability that a walk step heads toward the room center (0.1..=0.7)
    pub center_bias: f32,
    /// RNG seed
    pub seed: u64,
    /// How many tiles the door search probes from each corridor end.
    /// Zero disables the search, making every attempt with a corridor fail.
    pub door_probe_limit: u32,
    /// Attempts before the request is reported as failed
    pub max_attempts: u32,
    /// Rooms tagged as shops after a successful attempt
    pub shop_rooms: usize,
    /// Rooms tagged as treasure rooms after a successful attempt
    pub treasure_rooms: usize,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            map_width: 80,
            map_height: 80,
            min_room_size: 20,
            target_rooms: 8,
            offset: 2,
            fill_ratio: 0.9,
            center_bias: 0.1,
            seed: 0,
            door_probe_limit: 5,
            max_attempts: 10,
            shop_rooms: 1,
            treasure_rooms: 1,
        }
    }
}

impl DungeonConfig {
    pub const FILL_RATIO_RANGE: std::ops::RangeInclusive<f32> = 0.3..=1.0;
    pub const CENTER_BIAS_RANGE: std::ops::RangeInclusive<f32> = 0.1..=0.7;

    /// Same configuration with a different seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The whole map as a rectangle
    pub fn map_rect(&self) -> Rect {
        Rect::new(0, 0, self.map_width, self.map_height)
    }

    /// Reject configurations the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_width <= 0 || self.map_height <= 0 {
            return Err(ConfigError::EmptyMap {
                width: self.map_width,
                height: self.map_height,
            });
        }
        if self.min_room_size <= 0 {
            return Err(ConfigError::ZeroRoomSize(self.min_room_size));
        }
        // widened so huge values cannot wrap
        let min_room_size = i64::from(self.min_room_size);
        for dimension in [self.map_width, self.map_height] {
            if min_room_size * 2 >= i64::from(dimension) {
                return Err(ConfigError::RoomTooLarge {
                    min_room_size: self.min_room_size,
                    dimension,
                });
            }
        }
        if self.target_rooms == 0 {
            return Err(ConfigError::NoRooms);
        }
        if self.offset < 0 {
            return Err(ConfigError::NegativeOffset(self.offset));
        }
        if i64::from(self.offset) * 2 >= min_room_size {
            return Err(ConfigError::OffsetTooLarge {
                offset: self.offset,
                min_room_size: self.min_room_size,
            });
        }
        if !Self::FILL_RATIO_RANGE.contains(&self.fill_ratio) {
            return Err(ConfigError::FillRatio(self.fill_ratio));
        }
        if !Self::CENTER_BIAS_RANGE.contains(&self.center_bias) {
            return Err(ConfigError::CenterBias(self.center_bias));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        Ok(())
    }
}
