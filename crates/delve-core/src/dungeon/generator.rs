//! Dungeon generation pipeline
//!
//! One attempt runs partitioning, carving, corridor routing, door placement
//! and wall derivation in that order. Routing fails when it leaves rooms
//! unconnected and door placement fails when a corridor end has no valid
//! door spot. A failed attempt is thrown away whole and the next one starts
//! again from partitioning with the RNG where the failed attempt left it.

use std::ops::RangeInclusive;

use strum::{Display, EnumIter};
use tracing::{debug, info, warn};

use crate::config::DungeonConfig;
use crate::error::{AttemptFailure, GenerationError};
use crate::rng::DungeonRng;

use super::carve::{CarveParams, carve_room};
use super::corridor::{Routing, ensure_connected, route_corridors};
use super::door::{Door, place_doors};
use super::layout::Dungeon;
use super::metrics::{DungeonMetrics, RoomCoverage, room_coverage};
use super::partition::partition;
use super::room::{Room, assign_room_types};
use super::tiles::TileSets;
use super::wall::derive_walls;

/// Carved share of a padded room outside this band is reported
///
/// Walks stop well short of the fill target: default rooms land around a
/// quarter of their padded area.
const COVERAGE_BAND: RangeInclusive<f64> = 0.05..=0.6;

/// Stage of the generation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum GenerationStage {
    /// Nothing has been generated yet
    Idle,
    Partitioning,
    Carving,
    Routing,
    DoorPlacing,
    WallDeriving,
    Complete,
    /// The last attempt was discarded
    Failed,
}

/// Callbacks for watching a generator work
///
/// All methods default to doing nothing.
pub trait GenerationObserver {
    /// A stage of attempt `attempt` (1-based) starts
    fn on_stage(&mut self, _attempt: u32, _stage: GenerationStage) {}

    /// Attempt `attempt` was discarded
    fn on_attempt_failed(&mut self, _attempt: u32, _failure: &AttemptFailure) {}

    /// A dungeon is about to be published
    fn on_complete(&mut self, _dungeon: &Dungeon) {}
}

/// Everything one attempt builds; dropped whole when the attempt fails
#[derive(Debug, Default)]
struct AttemptState {
    rooms: Vec<Room>,
    tiles: TileSets,
    routing: Routing,
    doors: Vec<Door>,
    coverage: Vec<RoomCoverage>,
}

/// Generates dungeons from one configuration and one RNG stream
pub struct DungeonGenerator {
    config: DungeonConfig,
    rng: DungeonRng,
    observers: Vec<Box<dyn GenerationObserver>>,
    stage: GenerationStage,
    current: Option<Dungeon>,
}

impl DungeonGenerator {
    /// Create a generator seeded from `config.seed`
    ///
    /// The configuration is checked when generating, not here.
    pub fn new(config: DungeonConfig) -> Self {
        let rng = DungeonRng::new(config.seed);
        Self {
            config,
            rng,
            observers: Vec::new(),
            stage: GenerationStage::Idle,
            current: None,
        }
    }

    /// Register an observer, builder style
    pub fn with_observer(mut self, observer: impl GenerationObserver + 'static) -> Self {
        self.add_observer(observer);
        self
    }

    pub fn add_observer(&mut self, observer: impl GenerationObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    /// Stage the generator is in, or stopped in
    pub fn stage(&self) -> GenerationStage {
        self.stage
    }

    /// The published dungeon, if any
    pub fn dungeon(&self) -> Option<&Dungeon> {
        self.current.as_ref()
    }

    /// Take ownership of the published dungeon
    pub fn take_dungeon(&mut self) -> Option<Dungeon> {
        self.current.take()
    }

    /// Build a new dungeon and publish it
    ///
    /// Runs up to `max_attempts` attempts. On failure the previously published
    /// dungeon, if any, is left in place.
    pub fn generate(&mut self) -> Result<&Dungeon, GenerationError> {
        self.config.validate()?;

        let max_attempts = self.config.max_attempts;
        let mut attempt = 0;
        loop {
            attempt += 1;
            info!(attempt, max_attempts, seed = self.rng.seed(), "starting generation attempt");

            match self.run_attempt(attempt) {
                Ok(state) => {
                    let dungeon = self.finish(state, attempt);
                    self.enter(attempt, GenerationStage::Complete);
                    for observer in &mut self.observers {
                        observer.on_complete(&dungeon);
                    }
                    info!(
                        attempts = attempt,
                        rooms = dungeon.rooms().len(),
                        corridors = dungeon.corridors().len(),
                        doors = dungeon.doors().len(),
                        walls = dungeon.walls().len(),
                        "dungeon generated"
                    );
                    let published: &Dungeon = self.current.insert(dungeon);
                    return Ok(published);
                }
                Err(failure) => {
                    warn!(attempt, %failure, "generation attempt failed");
                    self.enter(attempt, GenerationStage::Failed);
                    for observer in &mut self.observers {
                        observer.on_attempt_failed(attempt, &failure);
                    }
                    if attempt >= max_attempts {
                        warn!(attempts = attempt, "giving up on dungeon generation");
                        return Err(GenerationError::RetriesExhausted {
                            attempts: attempt,
                            last: failure,
                        });
                    }
                }
            }
        }
    }

    /// Drop the published dungeon and build an unrelated one
    ///
    /// The RNG is not reseeded, so the new layout differs from the last.
    pub fn regenerate(&mut self) -> Result<&Dungeon, GenerationError> {
        self.current = None;
        self.generate()
    }

    fn enter(&mut self, attempt: u32, stage: GenerationStage) {
        debug!(attempt, %stage, "entering stage");
        self.stage = stage;
        for observer in &mut self.observers {
            observer.on_stage(attempt, stage);
        }
    }

    /// One pass through the pipeline into fresh scratch state
    fn run_attempt(&mut self, attempt: u32) -> Result<AttemptState, AttemptFailure> {
        let mut state = AttemptState {
            tiles: TileSets::new(self.config.map_width, self.config.map_height),
            ..AttemptState::default()
        };

        self.enter(attempt, GenerationStage::Partitioning);
        let rects = partition(
            self.config.map_rect(),
            self.config.min_room_size,
            self.config.target_rooms,
            &mut self.rng,
        );
        state.rooms = rects
            .into_iter()
            .enumerate()
            .map(|(index, rect)| Room::new(rect, index))
            .collect();
        info!(attempt, rooms = state.rooms.len(), "partitioned map");

        self.enter(attempt, GenerationStage::Carving);
        self.carve(&mut state);

        self.enter(attempt, GenerationStage::Routing);
        state.routing = route_corridors(&mut state.rooms, &mut state.tiles);
        info!(
            attempt,
            connections = state.routing.connections.len(),
            corridor_tiles = state.tiles.corridor().len(),
            "routed corridors"
        );
        ensure_connected(state.rooms.len(), &state.routing.connections)?;

        self.enter(attempt, GenerationStage::DoorPlacing);
        state.doors = place_doors(
            &state.tiles,
            &state.routing.corridors,
            self.config.door_probe_limit,
        )?;

        self.enter(attempt, GenerationStage::WallDeriving);
        let walls = derive_walls(&state.tiles);
        state.tiles.set_walls(walls);

        Ok(state)
    }

    fn carve(&mut self, state: &mut AttemptState) {
        let params = CarveParams {
            fill_ratio: self.config.fill_ratio,
            center_bias: self.config.center_bias,
        };
        let offset = self.config.offset;

        for room in &state.rooms {
            let floor = carve_room(room.padded(offset), params, &mut self.rng);
            let coverage = room_coverage(room, offset, params.fill_ratio, floor.len());
            debug!(
                room = room.index,
                target = coverage.target,
                carved = coverage.carved,
                ratio = coverage.ratio(),
                "carved room"
            );
            if !COVERAGE_BAND.contains(&coverage.ratio()) {
                debug!(
                    room = room.index,
                    ratio = coverage.ratio(),
                    "room coverage outside usual band"
                );
            }
            state.tiles.add_floor(floor);
            state.coverage.push(coverage);
        }
    }

    /// Turn a successful attempt into a published layout
    fn finish(&mut self, mut state: AttemptState, attempts: u32) -> Dungeon {
        assign_room_types(
            &mut state.rooms,
            &state.routing.order,
            self.config.shop_rooms,
            self.config.treasure_rooms,
            &mut self.rng,
        );

        let metrics = DungeonMetrics::compute(
            &state.rooms,
            &state.tiles,
            self.config.offset,
            self.config.fill_ratio,
            state.coverage,
        );

        Dungeon {
            rooms: state.rooms,
            tiles: state.tiles,
            order: state.routing.order,
            connections: state.routing.connections,
            corridors: state.routing.corridors,
            doors: state.doors,
            offset: self.config.offset,
            seed: self.config.seed,
            attempts,
            metrics,
        }
    }
}

impl std::fmt::Debug for DungeonGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DungeonGenerator")
            .field("config", &self.config)
            .field("stage", &self.stage)
            .field("observers", &self.observers.len())
            .field("has_dungeon", &self.current.is_some())
            .finish()
    }
}
