//! delve-core: procedural 2D dungeon layouts
//!
//! Builds a connected set of organically carved rooms joined by corridors,
//! with derived walls and validated door positions. The crate only produces
//! the layout; rendering and entity spawning are left to the consumer.
//!
//! ```
//! use delve_core::{DungeonConfig, DungeonGenerator};
//!
//! let mut generator = DungeonGenerator::new(DungeonConfig::default().with_seed(7));
//! if let Ok(dungeon) = generator.generate() {
//!     assert!(!dungeon.rooms().is_empty());
//! }
//! ```

pub mod config;
pub mod dungeon;
pub mod error;
pub mod geom;
mod rng;

pub use config::DungeonConfig;
pub use dungeon::{Dungeon, DungeonGenerator, GenerationObserver, GenerationStage};
pub use error::{AttemptFailure, ConfigError, CorridorEnd, GenerationError};
pub use geom::{Direction, Rect, TilePos};
pub use rng::DungeonRng;
