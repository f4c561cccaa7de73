use crate::error::SearchError;
use crate::grid::GridModel;
use crate::node::Node;
use crate::squared_distance;
use crate::stepwise::{Expansion, Finalized, StepwiseAstar};
use grid_util::Point;
use log::{debug, info};

/// Where a [Pathfinder] is in its lifecycle. [PathFound](SearchStatus::PathFound) and
/// [Exhausted](SearchStatus::Exhausted) are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    Idle,
    Searching,
    PathFound,
    Exhausted,
}

/// Read-only view of the search after a step, meant for renderers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepSnapshot {
    /// The node closed by this step.
    pub finalized: Node,
    /// Path from the start to [finalized](Self::finalized), both included.
    pub path: Vec<Point>,
    /// Open coordinates, each listed once, in no particular order.
    pub open: Vec<Point>,
    /// Closed coordinates in the order they were closed.
    pub closed: Vec<Point>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepResult {
    Expanded(StepSnapshot),
    PathFound(StepSnapshot),
    /// The frontier is empty: no path exists. Returned again on every later call.
    Exhausted,
    /// A path was found by an earlier step. Returned again on every later call.
    AlreadyDone,
}

impl StepResult {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StepResult::Expanded(_))
    }

    pub fn snapshot(&self) -> Option<&StepSnapshot> {
        match self {
            StepResult::Expanded(snapshot) | StepResult::PathFound(snapshot) => Some(snapshot),
            StepResult::Exhausted | StepResult::AlreadyDone => None,
        }
    }
}

/// Incremental A* over a [GridModel]. Each [step](Self::step) closes one node. Moves go to any
/// of the eight neighbours at unit cost and the heuristic is [squared_distance] to the goal.
///
/// The grid is borrowed for the lifetime of the search, so terrain cannot change mid-run.
/// Several pathfinders may share one grid.
pub struct Pathfinder<'g> {
    grid: &'g GridModel,
    start: Point,
    goal: Point,
    search: StepwiseAstar<Point, i64>,
    steps: usize,
}

impl<'g> Pathfinder<'g> {
    /// Starts a search from `start` to `goal`. Both must lie within the grid. A blocked goal
    /// is accepted; the search will simply be exhausted.
    pub fn new(grid: &'g GridModel, start: Point, goal: Point) -> Result<Self, SearchError> {
        grid.check_bounds(&start)?;
        grid.check_bounds(&goal)?;
        debug!("Initializing search from {:?} to {:?}", start, goal);
        Ok(Pathfinder {
            grid,
            start,
            goal,
            search: StepwiseAstar::new(start, squared_distance(&start, &goal)),
            steps: 0,
        })
    }

    /// Starts a search between the grid's designated start and goal.
    pub fn from_designated(grid: &'g GridModel) -> Result<Self, SearchError> {
        match (grid.start(), grid.goal()) {
            (Some(start), Some(goal)) => Pathfinder::new(grid, start, goal),
            _ => Err(SearchError::NoEndpoints),
        }
    }

    /// Discards all progress, leaving only the start node on the frontier.
    pub fn reset(&mut self) {
        debug!("Resetting search after {} steps", self.steps);
        self.search.reset();
        self.steps = 0;
    }

    fn advance(&mut self) -> Expansion<Point, i64> {
        let grid = self.grid;
        let goal = self.goal;
        let expansion = self.search.step(
            |node| grid.neighbourhood_points_and_cost(node),
            |point| squared_distance(point, &goal),
            |point| *point == goal,
        );
        if let Expansion::Expanded(finalized) | Expansion::Found(finalized) = &expansion {
            self.steps += 1;
            debug!(
                "Step {}: closed {:?} at cost {}",
                self.steps, finalized.node, finalized.cost
            );
        }
        if let Expansion::Found(_) = expansion {
            info!(
                "Path from {:?} to {:?} found after {} steps",
                self.start, self.goal, self.steps
            );
        }
        expansion
    }

    /// Closes the open node with the lowest `f`, generates its neighbours and reports what
    /// happened. Once terminal, further calls change nothing and keep returning the same
    /// result.
    pub fn step(&mut self) -> StepResult {
        match self.advance() {
            Expansion::Expanded(finalized) => StepResult::Expanded(self.snapshot(finalized)),
            Expansion::Found(finalized) => StepResult::PathFound(self.snapshot(finalized)),
            Expansion::Exhausted => StepResult::Exhausted,
            Expansion::AlreadyDone => StepResult::AlreadyDone,
        }
    }

    /// Steps until the search terminates, skipping the snapshots.
    pub fn run(&mut self) -> Option<Vec<Point>> {
        loop {
            match self.advance() {
                Expansion::Expanded(_) => {}
                Expansion::Found(finalized) => {
                    return Some(self.search.path_to_index(finalized.index))
                }
                Expansion::Exhausted => return None,
                Expansion::AlreadyDone => return self.path(),
            }
        }
    }

    fn snapshot(&self, finalized: Finalized<Point, i64>) -> StepSnapshot {
        let h = squared_distance(&finalized.node, &self.goal);
        StepSnapshot {
            finalized: Node::new(finalized.node, finalized.parent, finalized.cost, h),
            path: self.search.path_to_index(finalized.index),
            open: self.search.open_nodes().copied().collect(),
            closed: self.search.closed_nodes().copied().collect(),
        }
    }

    pub fn status(&self) -> SearchStatus {
        if self.search.is_done() {
            SearchStatus::PathFound
        } else if self.search.is_exhausted() {
            SearchStatus::Exhausted
        } else if self.steps == 0 {
            SearchStatus::Idle
        } else {
            SearchStatus::Searching
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status(),
            SearchStatus::PathFound | SearchStatus::Exhausted
        )
    }

    pub fn grid(&self) -> &'g GridModel {
        self.grid
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    /// Number of steps that closed a node since the last (re)initialization.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn open_nodes(&self) -> impl Iterator<Item = &Point> + '_ {
        self.search.open_nodes()
    }

    pub fn closed_nodes(&self) -> impl Iterator<Item = &Point> + '_ {
        self.search.closed_nodes()
    }

    /// The closed node at `point`, if any.
    pub fn node(&self, point: &Point) -> Option<Node> {
        self.search.closed_entry(point).map(|(parent, g)| {
            Node::new(*point, parent.copied(), g, squared_distance(point, &self.goal))
        })
    }

    /// Path from the start to a closed coordinate.
    pub fn trace(&self, point: &Point) -> Option<Vec<Point>> {
        self.search.path_to(point)
    }

    /// The full path once the goal has been reached.
    pub fn path(&self) -> Option<Vec<Point>> {
        if self.search.is_done() {
            self.search.path_to(&self.goal)
        } else {
            None
        }
    }
}
