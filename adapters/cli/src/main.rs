#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates Undercroft dungeons and plans paths
//! through them.

mod ascii;
mod config;

use std::{thread, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec2;
use log::debug;
use undercroft_core::{Phase, Settings, WELCOME_BANNER};
use undercroft_system_navigation::PathMode;
use undercroft_world::{Dungeon, Generator, Status};

use crate::config::ConfigArgs;

#[derive(Debug, Parser)]
#[command(name = "undercroft", version, about = "Generates dungeons and plans paths through them")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generates a dungeon and prints its map.
    Generate,
    /// Generates a dungeon and plans a path between two world positions.
    Path {
        /// Start position as `X,Y` in world units.
        #[arg(long, value_parser = parse_point)]
        from: Vec2,
        /// End position as `X,Y` in world units.
        #[arg(long, value_parser = parse_point)]
        to: Vec2,
        /// Search strategy.
        #[arg(long, value_enum, default_value_t = Mode::Hierarchical)]
        mode: Mode,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// One search over every tile.
    Tile,
    /// Room-level search refined between door tiles.
    Hierarchical,
}

impl From<Mode> for PathMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Tile => Self::TileAStar,
            Mode::Hierarchical => Self::HierarchicalAStar,
        }
    }
}

fn parse_point(value: &str) -> Result<Vec2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got `{value}`"))?;
    let x: f32 = x.trim().parse().map_err(|error| format!("invalid x: {error}"))?;
    let y: f32 = y.trim().parse().map_err(|error| format!("invalid y: {error}"))?;
    Ok(Vec2::new(x, y))
}

/// Entry point for the Undercroft command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    println!("{WELCOME_BANNER}");

    let settings = config::load(&cli.config)?;
    let dungeon = generate(settings)?;

    match cli.command.unwrap_or(Command::Generate) {
        Command::Generate => print_dungeon(&dungeon, &[]),
        Command::Path { from, to, mode } => {
            let path = dungeon
                .find_path(from, to, mode.into())
                .context("path query could not start")?;
            print_dungeon(&dungeon, &path);
            if path.is_empty() {
                println!("no path between {from} and {to}");
            } else {
                println!("{} waypoints:", path.len());
                for point in &path {
                    println!("  {:.2}, {:.2}", point.x, point.y);
                }
            }
        }
    }
    Ok(())
}

/// Drives the generator to completion, sleeping for the configured pacing
/// delay between steps.
fn generate(settings: Settings) -> Result<Dungeon> {
    let pacing = Duration::from_millis(settings.raster.pacing_ms);
    let mut generator = Generator::new(settings).context("configuration rejected")?;
    let mut phase = Phase::Idle;

    loop {
        match generator.advance() {
            Status::Running(progress) => {
                if progress.phase() != phase {
                    phase = progress.phase();
                    debug!("{:>5.1}% {}", progress.overall() * 100.0, progress.label());
                }
                if !pacing.is_zero() {
                    thread::sleep(pacing);
                }
            }
            Status::Ready => break,
            Status::Aborted => bail!("generation aborted"),
        }
    }

    generator
        .into_dungeon()
        .context("generation finished without a dungeon")
}

fn print_dungeon(dungeon: &Dungeon, path: &[Vec2]) {
    let map = dungeon.pathfinding_map();
    println!(
        "{}",
        ascii::render(
            dungeon.tilemap().occupancy(),
            map.cell_scale(),
            dungeon.spawn_point(),
            path,
        )
    );

    let graph = dungeon.graph();
    println!("{} rooms, {} doors", graph.len(), graph.doors().len());
    match dungeon.spawn_point() {
        Some(spawn) => println!("spawn at {:.2}, {:.2}", spawn.x, spawn.y),
        None => println!("no spawn point"),
    }
}
