use crate::grid::{Cell, GridModel};
use crate::pathfinder::StepSnapshot;
use core::fmt;
use grid_util::{Point, SimpleValueGrid, ValueGrid};

/// Display state of a cell, the grid classification plus search progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Walkable,
    Blocked,
    Start,
    Goal,
    Open,
    Closed,
    Path,
}

impl CellState {
    pub fn symbol(self) -> char {
        match self {
            CellState::Walkable => '.',
            CellState::Blocked => '#',
            CellState::Start => 'S',
            CellState::Goal => 'G',
            CellState::Open => 'o',
            CellState::Closed => 'x',
            CellState::Path => '*',
        }
    }
}

impl From<Cell> for CellState {
    fn from(cell: Cell) -> CellState {
        match cell {
            Cell::Walkable => CellState::Walkable,
            Cell::Blocked => CellState::Blocked,
            Cell::Start => CellState::Start,
            Cell::Goal => CellState::Goal,
        }
    }
}

/// A display grid kept in step with a search through [StepSnapshot]s. The overlay owns its
/// cells; nothing it does reaches back into the search.
#[derive(Clone, Debug)]
pub struct Overlay {
    base: SimpleValueGrid<CellState>,
    cells: SimpleValueGrid<CellState>,
    start: Point,
    goal: Point,
}

impl Overlay {
    /// Builds an overlay showing the grid's classification, with `start` and `goal` marked.
    pub fn new(grid: &GridModel, start: Point, goal: Point) -> Overlay {
        let mut base = SimpleValueGrid::new(grid.width(), grid.height(), CellState::Walkable);
        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                if let Some(cell) = grid.cell(x, y) {
                    base.set(x, y, cell.into());
                }
            }
        }
        let mut overlay = Overlay {
            cells: base.clone(),
            base,
            start,
            goal,
        };
        overlay.mark(&[start], CellState::Start);
        overlay.mark(&[goal], CellState::Goal);
        overlay.base = overlay.cells.clone();
        overlay
    }

    /// Drops all search progress.
    pub fn clear(&mut self) {
        self.cells = self.base.clone();
    }

    /// Replaces the shown progress with that of `snapshot`. The path is drawn over the closed
    /// and open cells; start and goal stay visible.
    pub fn apply(&mut self, snapshot: &StepSnapshot) {
        self.clear();
        self.mark(&snapshot.closed, CellState::Closed);
        self.mark(&snapshot.open, CellState::Open);
        self.mark(&snapshot.path, CellState::Path);
        self.mark(&[self.start], CellState::Start);
        self.mark(&[self.goal], CellState::Goal);
    }

    fn mark(&mut self, points: &[Point], state: CellState) {
        for p in points {
            if self.in_bounds(p) {
                self.cells.set(p.x, p.y, state);
            }
        }
    }

    fn in_bounds(&self, p: &Point) -> bool {
        p.x >= 0
            && p.y >= 0
            && (p.x as usize) < self.cells.width()
            && (p.y as usize) < self.cells.height()
    }

    /// State shown at `p`, [None] when out of bounds.
    pub fn get(&self, p: &Point) -> Option<CellState> {
        self.in_bounds(p).then(|| self.cells.get(p.x, p.y))
    }

    pub fn count(&self, state: CellState) -> usize {
        (0..self.cells.height() as i32)
            .flat_map(|y| (0..self.cells.width() as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| self.cells.get(x, y) == state)
            .count()
    }
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.cells.height() as i32 {
            let row = (0..self.cells.width() as i32)
                .map(|x| self.cells.get(x, y).symbol())
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
