//! Steps a search over a map file at a fixed pace, printing the overlay after every step.
//!
//! ```text
//! cargo run --example stepwise -- maps/maze.txt --interval-ms 100
//! cargo run --example stepwise -- maps/arena.map --start 1,1 --goal 6,4
//! ```
use clap::Parser;
use grid_util::Point;
use log::{info, warn};
use std::error::Error;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use stepwise_pathfinding::map_format::load_map;
use stepwise_pathfinding::overlay::Overlay;
use stepwise_pathfinding::{Pathfinder, SearchError, StepResult};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Plain or Moving AI map file.
    map: PathBuf,

    /// Start coordinate as `x,y`, overriding the map's `S`.
    #[arg(long, value_parser = parse_point)]
    start: Option<Point>,

    /// Goal coordinate as `x,y`, overriding the map's `G`.
    #[arg(long, value_parser = parse_point)]
    goal: Option<Point>,

    /// Pause between steps.
    #[arg(long, default_value_t = 50)]
    interval_ms: u64,

    /// Give up after this many steps.
    #[arg(long)]
    max_steps: Option<usize>,

    /// Only print the final frame.
    #[arg(long, default_value_t = false)]
    no_frames: bool,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, found {s:?}"))?;
    let parse = |v: &str| v.trim().parse::<i32>().map_err(|e| format!("{v:?}: {e}"));
    Ok(Point::new(parse(x)?, parse(y)?))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let grid = load_map(&cli.map)?;
    let start = cli.start.or(grid.start()).ok_or(SearchError::NoEndpoints)?;
    let goal = cli.goal.or(grid.goal()).ok_or(SearchError::NoEndpoints)?;
    if grid.unreachable(&start, &goal) {
        warn!("{:?} cannot reach {:?}, the search will be exhausted", start, goal);
    }

    let mut pathfinder = Pathfinder::new(&grid, start, goal)?;
    let mut overlay = Overlay::new(&grid, start, goal);
    let interval = Duration::from_millis(cli.interval_ms);
    loop {
        if cli.max_steps.is_some_and(|max| pathfinder.steps() >= max) {
            warn!("Stopping after {} steps", pathfinder.steps());
            break;
        }
        let result = pathfinder.step();
        if let Some(snapshot) = result.snapshot() {
            overlay.apply(snapshot);
        }
        match result {
            StepResult::Expanded(snapshot) => {
                if !cli.no_frames {
                    println!("step {}: closed {}", pathfinder.steps(), snapshot.finalized);
                    println!("{overlay}");
                    thread::sleep(interval);
                }
            }
            StepResult::PathFound(snapshot) => {
                info!(
                    "Path of {} cells found after {} steps",
                    snapshot.path.len(),
                    pathfinder.steps()
                );
                break;
            }
            StepResult::Exhausted => {
                info!("No path after {} steps", pathfinder.steps());
                break;
            }
            StepResult::AlreadyDone => break,
        }
    }
    println!("{overlay}");
    Ok(())
}
