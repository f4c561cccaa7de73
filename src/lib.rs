//! # stepwise_pathfinding
//!
//! Incremental [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) on a uniform-cost
//! 8-connected grid. Rather than running a search to completion, a [Pathfinder] finalizes a
//! single frontier node per call to [Pathfinder::step] and hands back an immutable
//! [StepSnapshot] of the finalized node, its partial path and the open and closed sets, so the
//! search can be rendered while it runs.
//!
//! The heuristic is the squared Euclidean distance to the goal and closed nodes are never
//! reopened. This mirrors the classic "visual A*" demos but means the heuristic is not
//! admissible, so on some obstacle layouts the path found is longer than the shortest one.
//!
//! ```
//! use grid_util::{Point, ValueGrid};
//! use stepwise_pathfinding::{GridModel, Pathfinder, StepResult};
//!
//! let grid = GridModel::new(5, 5, false);
//! let mut pathfinder = Pathfinder::new(&grid, Point::new(0, 0), Point::new(4, 4)).unwrap();
//! loop {
//!     match pathfinder.step() {
//!         StepResult::Expanded(snapshot) => println!("closed {}", snapshot.finalized),
//!         StepResult::PathFound(snapshot) => {
//!             assert_eq!(snapshot.path.len(), 5);
//!             break;
//!         }
//!         StepResult::Exhausted | StepResult::AlreadyDone => unreachable!(),
//!     }
//! }
//! ```
pub mod error;
pub mod grid;
pub mod map_format;
pub mod node;
pub mod overlay;
pub mod pathfinder;
pub mod stepwise;

pub use error::{GridError, MapError, SearchError};
pub use grid::{Cell, GridModel};
pub use node::Node;
pub use pathfinder::{Pathfinder, SearchStatus, StepResult, StepSnapshot};

use grid_util::Point;

/// Neighbour offsets in generation order: clockwise, starting north (negative y).
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Cost of any single move, straight or diagonal.
pub const STEP_COST: i64 = 1;

pub const N_SMALLVEC_SIZE: usize = 8;

/// Squared Euclidean distance, the heuristic used by [Pathfinder]. Computed in `i64`, which
/// holds the value for any two points with non-negative coordinates.
pub fn squared_distance(p1: &Point, p2: &Point) -> i64 {
    let dx = i64::from(p1.x) - i64::from(p2.x);
    let dy = i64::from(p1.y) - i64::from(p2.y);
    dx * dx + dy * dy
}

/// Whether `p2` can be reached from `p1` with one of the [NEIGHBOUR_OFFSETS].
pub fn is_neighbour(p1: &Point, p2: &Point) -> bool {
    NEIGHBOUR_OFFSETS
        .iter()
        .any(|&(dx, dy)| p1.x + dx == p2.x && p1.y + dy == p2.y)
}

/// Checks that every consecutive pair of points in the path are neighbours.
pub fn is_contiguous(path: &[Point]) -> bool {
    path.windows(2).all(|w| is_neighbour(&w[0], &w[1]))
}
