//! Dungeon layout generator
//!
//! Builds one layout and prints it as an ASCII map or as JSON.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;

use delve_core::dungeon::RoomType;
use delve_core::{Dungeon, DungeonConfig, DungeonGenerator, GenerationError, TilePos};

/// Generate a dungeon layout
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(author, version, about = "Generate a procedural dungeon layout", long_about = None)]
struct Args {
    /// JSON configuration file; flags below override its values
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// RNG seed
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Map width in tiles
    #[arg(long = "width")]
    width: Option<i32>,

    /// Map height in tiles
    #[arg(long = "height")]
    height: Option<i32>,

    /// Number of rooms to aim for
    #[arg(short = 'r', long = "rooms")]
    rooms: Option<usize>,

    /// Smallest partition side
    #[arg(long = "min-room-size")]
    min_room_size: Option<i32>,

    /// Tiles between a partition edge and its floor
    #[arg(long = "offset")]
    offset: Option<i32>,

    /// Fraction of each room to carve (0.3 - 1.0)
    #[arg(long = "fill")]
    fill_ratio: Option<f32>,

    /// Pull of the carving walk toward the room center (0.1 - 0.7)
    #[arg(long = "bias")]
    center_bias: Option<f32>,

    /// Generation attempts before giving up
    #[arg(short = 'a', long = "attempts")]
    max_attempts: Option<u32>,

    /// Print the layout as JSON instead of a map
    #[arg(long = "json")]
    json: bool,

    /// Print layout statistics after the map
    #[arg(short = 'm', long = "metrics")]
    metrics: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Bad configuration file: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl Args {
    /// Start from the config file (or defaults) and apply the flags
    fn to_config(&self) -> Result<DungeonConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| CliError::Read {
                    path: path.clone(),
                    source,
                })?;
                serde_json::from_str(&text)?
            }
            None => DungeonConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(width) = self.width {
            config.map_width = width;
        }
        if let Some(height) = self.height {
            config.map_height = height;
        }
        if let Some(rooms) = self.rooms {
            config.target_rooms = rooms;
        }
        if let Some(size) = self.min_room_size {
            config.min_room_size = size;
        }
        if let Some(offset) = self.offset {
            config.offset = offset;
        }
        if let Some(fill) = self.fill_ratio {
            config.fill_ratio = fill;
        }
        if let Some(bias) = self.center_bias {
            config.center_bias = bias;
        }
        if let Some(attempts) = self.max_attempts {
            config.max_attempts = attempts;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("delve: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let config = args.to_config()?;
    let mut generator = DungeonGenerator::new(config);
    let dungeon = generator.generate()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(dungeon)?);
        return Ok(());
    }

    print!("{}", render(dungeon));
    if args.metrics {
        print_metrics(dungeon);
    }
    Ok(())
}

/// ASCII map, highest row first
fn render(dungeon: &Dungeon) -> String {
    let spawn = dungeon.spawn_point();
    let mut out = String::with_capacity(((dungeon.width() + 1) * dungeon.height()) as usize);

    for y in (0..dungeon.height()).rev() {
        for x in 0..dungeon.width() {
            let pos = TilePos::new(x, y);
            let glyph = if spawn == Some(pos) {
                '@'
            } else if dungeon.is_door(pos) {
                '+'
            } else if dungeon.corridor().contains(&pos) {
                '#'
            } else if dungeon.floor().contains(&pos) {
                '.'
            } else if dungeon.walls().contains(&pos) {
                '%'
            } else {
                ' '
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn print_metrics(dungeon: &Dungeon) {
    let m = dungeon.metrics();
    println!();
    println!("seed {}  attempts {}", dungeon.seed(), dungeon.attempts());
    println!(
        "rooms {}  padded area min {} / max {} / median {} / avg {:.1}",
        m.room_count, m.min_room_area, m.max_room_area, m.median_room_area, m.average_room_area
    );
    println!(
        "floor {}  corridor {}  walls {}  perimeter {}",
        m.floor_tiles, m.corridor_tiles, m.wall_tiles, m.perimeter_tiles
    );
    println!(
        "walkable {} ({:.3} of map)  expected {} ({:.3})  efficiency {:.3}",
        m.walkable_tiles(),
        m.walkable_density,
        m.expected_walkable,
        m.density,
        m.space_efficiency
    );
    for room in dungeon.rooms() {
        let tag = match room.room_type {
            RoomType::Normal => String::new(),
            other => format!(" {other}"),
        };
        println!(
            "  room {} {}{} -> {:?}",
            room.index, room.rect, tag, room.connected_rooms
        );
    }
}
