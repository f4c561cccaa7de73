use crate::error::GridError;
use crate::{N_SMALLVEC_SIZE, NEIGHBOUR_OFFSETS, STEP_COST};
use core::fmt;
use grid_util::{BoolGrid, Point, ValueGrid};
use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// Classification of a single grid position. Carries no search state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Walkable,
    Blocked,
    Start,
    Goal,
}

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Cell::Walkable => '.',
            Cell::Blocked => '#',
            Cell::Start => 'S',
            Cell::Goal => 'G',
        }
    }
}

/// [GridModel] keeps the terrain in a [BoolGrid] in which blocked positions are [true], the
/// designated start and goal, and connected components in a [UnionFind] structure so that
/// drivers can tell up front whether a search will be exhausted. Implements [ValueGrid] by
/// building on [BoolGrid].
///
/// Designation overrides terrain: the start and goal are walkable even when the terrain below
/// them is blocked.
#[derive(Clone, Debug)]
pub struct GridModel {
    pub grid: BoolGrid,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
    endpoints: Option<(Point, Point)>,
}

impl Default for GridModel {
    fn default() -> GridModel {
        GridModel {
            grid: BoolGrid::default(),
            components: UnionFind::new(0),
            components_dirty: false,
            endpoints: None,
        }
    }
}

impl GridModel {
    /// Builds a grid from rows of cells. Rows must all have the same length. If the rows
    /// contain a [Cell::Start] and a [Cell::Goal] these become the designated endpoints.
    pub fn from_rows(rows: &[Vec<Cell>]) -> Result<GridModel, GridError> {
        let width = rows.first().map_or(0, |row| row.len());
        if width == 0 {
            return Err(GridError::Empty);
        }
        let mut model = GridModel::new(width, rows.len(), false);
        let mut start = None;
        let mut goal = None;
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GridError::RaggedRow {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, cell) in row.iter().enumerate() {
                let p = Point::new(x as i32, y as i32);
                match cell {
                    Cell::Blocked => model.grid.set(p.x, p.y, true),
                    Cell::Start => {
                        if start.replace(p).is_some() {
                            return Err(GridError::DuplicateEndpoint("start"));
                        }
                    }
                    Cell::Goal => {
                        if goal.replace(p).is_some() {
                            return Err(GridError::DuplicateEndpoint("goal"));
                        }
                    }
                    Cell::Walkable => {}
                }
            }
        }
        match (start, goal) {
            (Some(start), Some(goal)) => model.designate_endpoints(start, goal)?,
            (Some(_), None) => return Err(GridError::MissingEndpoint("goal")),
            (None, Some(_)) => return Err(GridError::MissingEndpoint("start")),
            (None, None) => {}
        }
        model.generate_components();
        Ok(model)
    }

    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.grid.width && (y as usize) < self.grid.height
    }

    pub fn point_is_in_bounds(&self, p: &Point) -> bool {
        self.is_in_bounds(p.x, p.y)
    }

    pub fn check_bounds(&self, p: &Point) -> Result<(), GridError> {
        if self.point_is_in_bounds(p) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                x: p.x,
                y: p.y,
                width: self.grid.width,
                height: self.grid.height,
            })
        }
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.is_in_bounds(x, y)
            && (self.is_endpoint(&Point::new(x, y)) || !self.grid.get(x, y))
    }

    pub fn point_is_walkable(&self, p: &Point) -> bool {
        self.is_walkable(p.x, p.y)
    }

    fn is_endpoint(&self, p: &Point) -> bool {
        self.endpoints
            .is_some_and(|(start, goal)| *p == start || *p == goal)
    }

    /// Classification of a position with designation applied, [None] when out of bounds.
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        if !self.is_in_bounds(x, y) {
            return None;
        }
        let p = Point::new(x, y);
        Some(match self.endpoints {
            Some((start, _)) if start == p => Cell::Start,
            Some((_, goal)) if goal == p => Cell::Goal,
            _ if self.grid.get(x, y) => Cell::Blocked,
            _ => Cell::Walkable,
        })
    }

    /// Designates the start and goal. This happens once per grid; both points must be in
    /// bounds.
    pub fn designate_endpoints(&mut self, start: Point, goal: Point) -> Result<(), GridError> {
        if self.endpoints.is_some() {
            return Err(GridError::AlreadyDesignated);
        }
        self.check_bounds(&start)?;
        self.check_bounds(&goal)?;
        self.endpoints = Some((start, goal));
        // Designation may open up blocked terrain.
        self.components_dirty = true;
        Ok(())
    }

    pub fn start(&self) -> Option<Point> {
        self.endpoints.map(|(start, _)| start)
    }

    pub fn goal(&self) -> Option<Point> {
        self.endpoints.map(|(_, goal)| goal)
    }

    /// In-bounds positions around `point` in [NEIGHBOUR_OFFSETS] order (clockwise from north).
    pub fn neighbourhood_points(&self, point: &Point) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        NEIGHBOUR_OFFSETS
            .iter()
            .map(|(dx, dy)| Point::new(point.x + dx, point.y + dy))
            .filter(|p| self.point_is_in_bounds(p))
            .collect()
    }

    /// Walkable neighbours of `pos` paired with the uniform step cost.
    pub fn neighbourhood_points_and_cost(
        &self,
        pos: &Point,
    ) -> SmallVec<[(Point, i64); N_SMALLVEC_SIZE]> {
        self.neighbourhood_points(pos)
            .into_iter()
            .filter(|p| self.point_is_walkable(p))
            .map(|p| (p, STEP_COST))
            .collect()
    }

    fn ix(&self, point: &Point) -> usize {
        point.y as usize * self.grid.width + point.x as usize
    }

    /// Retrieves the component id a given [Point] belongs to.
    pub fn get_component(&self, point: &Point) -> usize {
        self.components.find(self.ix(point))
    }

    /// Checks if start and goal are walkable and on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if self.point_is_walkable(start) && self.point_is_walkable(goal) {
            let start_ix = self.ix(start);
            let goal_ix = self.ix(goal);
            if self.components.equiv(start_ix, goal_ix) {
                false
            } else {
                info!("{:?} and {:?} are on different components", start, goal);
                true
            }
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up walkable 8-neighbours to the same
    /// components.
    pub fn generate_components(&mut self) {
        let w = self.grid.width;
        let h = self.grid.height;
        self.components = UnionFind::new(w * h);
        self.components_dirty = false;
        for x in 0..w as i32 {
            for y in 0..h as i32 {
                if !self.is_walkable(x, y) {
                    continue;
                }
                let point = Point::new(x, y);
                let parent_ix = self.ix(&point);
                // The remaining four directions are covered from the other side.
                let neighbours = [
                    Point::new(x, y + 1),
                    Point::new(x + 1, y - 1),
                    Point::new(x + 1, y),
                    Point::new(x + 1, y + 1),
                ]
                .into_iter()
                .filter(|p| self.point_is_walkable(p))
                .map(|p| self.ix(&p))
                .collect::<SmallVec<[usize; 4]>>();
                for ix in neighbours {
                    self.components.union(parent_ix, ix);
                }
            }
        }
    }
}

impl fmt::Display for GridModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.grid.height as i32 {
            let row = (0..self.grid.width as i32)
                .filter_map(|x| self.cell(x, y))
                .map(Cell::symbol)
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

impl ValueGrid<bool> for GridModel {
    fn new(width: usize, height: usize, default_value: bool) -> Self {
        GridModel {
            grid: BoolGrid::new(width, height, default_value),
            components: UnionFind::new(width * height),
            components_dirty: true,
            endpoints: None,
        }
    }
    fn get(&self, x: i32, y: i32) -> bool {
        self.grid.get(x, y)
    }
    /// Updates the terrain at a position. Joins newly connected components and flags the
    /// components as dirty if they are (potentially) broken apart. Terrain edits belong before
    /// a search; a running [Pathfinder](crate::pathfinder::Pathfinder) borrows the grid.
    fn set(&mut self, x: i32, y: i32, blocked: bool) {
        let p = Point::new(x, y);
        let was_blocked = self.grid.get(x, y);
        self.grid.set(x, y, blocked);
        if blocked {
            if !was_blocked {
                self.components_dirty = true;
            }
        } else if !self.components_dirty {
            let p_ix = self.ix(&p);
            for n in self.neighbourhood_points(&p) {
                if self.point_is_walkable(&n) {
                    self.components.union(p_ix, self.ix(&n));
                }
            }
        }
    }
    fn width(&self) -> usize {
        self.grid.width()
    }
    fn height(&self) -> usize {
        self.grid.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walled_row() -> GridModel {
        // |S..|
        // |###|
        // |..G|
        let mut grid = GridModel::new(3, 3, false);
        for x in 0..3 {
            grid.set(x, 1, true);
        }
        grid.designate_endpoints(Point::new(0, 0), Point::new(2, 2)).unwrap();
        grid.generate_components();
        grid
    }

    /// Tests whether points are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // | # |
        // | # |
        let mut grid = GridModel::new(3, 2, false);
        grid.set(1, 0, true);
        grid.set(1, 1, true);
        grid.generate_components();
        let p1 = Point::new(0, 0);
        let p2 = Point::new(1, 1);
        let p3 = Point::new(0, 1);
        let p4 = Point::new(2, 0);
        assert!(grid.unreachable(&p1, &p2));
        assert!(grid.reachable(&p1, &p3));
        assert!(grid.unreachable(&p1, &p4));
        assert_ne!(grid.get_component(&p1), grid.get_component(&p4));
    }

    /// Diagonal moves may pass between two blocked cells.
    #[test]
    fn reachable_through_diagonal_gap() {
        // |.#|
        // |#.|
        let mut grid = GridModel::new(2, 2, false);
        grid.set(1, 0, true);
        grid.set(0, 1, true);
        grid.generate_components();
        assert!(grid.reachable(&Point::new(0, 0), &Point::new(1, 1)));
    }

    #[test]
    fn blocked_row_separates_components() {
        let grid = walled_row();
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(2, 2)));
        assert!(grid.reachable(&Point::new(0, 0), &Point::new(2, 0)));
    }

    #[test]
    fn bounds_queries() {
        let grid = GridModel::new(4, 2, false);
        assert!(grid.is_in_bounds(0, 0));
        assert!(grid.is_in_bounds(3, 1));
        assert!(!grid.is_in_bounds(4, 1));
        assert!(!grid.is_in_bounds(0, 2));
        assert!(!grid.is_in_bounds(-1, 0));
        assert!(!grid.is_walkable(0, -1));
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 2);
    }

    #[test]
    fn designation_overrides_terrain() {
        let mut grid = GridModel::new(3, 1, true);
        assert!(!grid.is_walkable(0, 0));
        grid.designate_endpoints(Point::new(0, 0), Point::new(2, 0)).unwrap();
        assert!(grid.is_walkable(0, 0));
        assert!(grid.is_walkable(2, 0));
        assert!(!grid.is_walkable(1, 0));
        assert_eq!(grid.cell(0, 0), Some(Cell::Start));
        assert_eq!(grid.cell(2, 0), Some(Cell::Goal));
        assert_eq!(grid.cell(1, 0), Some(Cell::Blocked));
        assert_eq!(grid.cell(3, 0), None);
        assert!(grid.components_dirty);
    }

    #[test]
    fn update_regenerates_dirty_components() {
        // |#.#|
        let mut grid = GridModel::new(3, 1, false);
        grid.set(0, 0, true);
        grid.set(2, 0, true);
        grid.generate_components();
        grid.update();
        assert!(!grid.components_dirty);

        let start = Point::new(0, 0);
        let goal = Point::new(2, 0);
        grid.designate_endpoints(start, goal).unwrap();
        assert!(grid.components_dirty);
        // Stale until regenerated.
        assert!(grid.unreachable(&start, &goal));
        grid.update();
        assert!(!grid.components_dirty);
        assert!(grid.reachable(&start, &goal));
    }

    #[test]
    fn designation_happens_once() {
        let mut grid = GridModel::new(3, 3, false);
        grid.designate_endpoints(Point::new(0, 0), Point::new(2, 2)).unwrap();
        assert_eq!(
            grid.designate_endpoints(Point::new(1, 1), Point::new(2, 2)),
            Err(GridError::AlreadyDesignated)
        );
        assert_eq!(grid.start(), Some(Point::new(0, 0)));
        assert_eq!(grid.goal(), Some(Point::new(2, 2)));
    }

    #[test]
    fn designation_rejects_out_of_bounds() {
        let mut grid = GridModel::new(3, 3, false);
        assert_eq!(
            grid.designate_endpoints(Point::new(0, 0), Point::new(3, 0)),
            Err(GridError::OutOfBounds {
                x: 3,
                y: 0,
                width: 3,
                height: 3
            })
        );
        assert_eq!(grid.start(), None);
    }

    #[test]
    fn from_rows_designates_endpoints() {
        use Cell::*;
        let rows = vec![
            vec![Start, Walkable, Walkable],
            vec![Blocked, Blocked, Walkable],
            vec![Goal, Walkable, Walkable],
        ];
        let grid = GridModel::from_rows(&rows).unwrap();
        assert_eq!(grid.start(), Some(Point::new(0, 0)));
        assert_eq!(grid.goal(), Some(Point::new(0, 2)));
        assert!(!grid.is_walkable(1, 1));
        assert!(!grid.components_dirty);
        assert!(grid.reachable(&Point::new(0, 0), &Point::new(0, 2)));
    }

    #[test]
    fn from_rows_rejects_malformed_input() {
        use Cell::*;
        assert_eq!(GridModel::from_rows(&[]).unwrap_err(), GridError::Empty);
        assert_eq!(
            GridModel::from_rows(&[vec![Walkable, Walkable], vec![Walkable]]).unwrap_err(),
            GridError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
        assert_eq!(
            GridModel::from_rows(&[vec![Start, Start, Goal]]).unwrap_err(),
            GridError::DuplicateEndpoint("start")
        );
        assert_eq!(
            GridModel::from_rows(&[vec![Start, Walkable]]).unwrap_err(),
            GridError::MissingEndpoint("goal")
        );
    }

    #[test]
    fn neighbourhood_is_clockwise_from_north() {
        let grid = GridModel::new(3, 3, false);
        let around_centre = grid.neighbourhood_points(&Point::new(1, 1));
        assert_eq!(
            around_centre.as_slice(),
            &[
                Point::new(1, 0),
                Point::new(2, 0),
                Point::new(2, 1),
                Point::new(2, 2),
                Point::new(1, 2),
                Point::new(0, 2),
                Point::new(0, 1),
                Point::new(0, 0),
            ]
        );
        let corner = grid.neighbourhood_points(&Point::new(0, 0));
        assert_eq!(
            corner.as_slice(),
            &[Point::new(1, 0), Point::new(1, 1), Point::new(0, 1)]
        );
    }

    #[test]
    fn blocked_neighbours_are_filtered() {
        let grid = walled_row();
        let succ = grid.neighbourhood_points_and_cost(&Point::new(0, 0));
        assert_eq!(succ.as_slice(), &[(Point::new(1, 0), STEP_COST)]);
    }

    #[test]
    fn display_shows_classification() {
        let grid = walled_row();
        assert_eq!(grid.to_string(), "S..\n###\n..G\n");
    }
}
