use grid_util::{Point, ValueGrid};
use stepwise_pathfinding::{GridModel, Pathfinder};

// In this example a path is found on a grid with shape
// #####
// #S  #
// # # #
// #  G#
// #####
// S marks the start
// G marks the goal
fn main() {
    let mut grid = GridModel::new(5, 5, true);
    for x in 1..4 {
        for y in 1..4 {
            grid.set(x, y, false);
        }
    }
    grid.set(2, 2, true);
    grid.generate_components();
    let start = Point::new(1, 1);
    let goal = Point::new(3, 3);
    let mut pathfinder = Pathfinder::new(&grid, start, goal).unwrap();
    if let Some(path) = pathfinder.run() {
        println!("A path has been found in {} steps:", pathfinder.steps());
        for p in path {
            println!("{:?}", p);
        }
    }
}
