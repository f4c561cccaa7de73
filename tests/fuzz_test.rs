/// Fuzzes the stepwise search on many random grids: a path is reported exactly when start and
/// goal share a connected component, every snapshot is consistent and no search outlives the
/// number of cells.
use grid_util::*;
use rand::prelude::*;
use std::collections::HashSet;
use stepwise_pathfinding::{is_contiguous, GridModel, Pathfinder, StepResult};

fn random_grid(w: usize, h: usize, rng: &mut StdRng) -> GridModel {
    let mut grid = GridModel::new(w, h, false);
    for x in 0..grid.width() as i32 {
        for y in 0..grid.height() as i32 {
            grid.set(x, y, rng.gen_bool(0.4))
        }
    }
    grid
}

fn visualize_grid(grid: &GridModel, start: &Point, end: &Point) {
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let p = Point::new(x, y);
            if *start == p {
                print!("S");
            } else if *end == p {
                print!("G");
            } else if grid.get(x, y) {
                print!("#");
            } else {
                print!(".");
            }
        }
        println!();
    }
}

fn check_snapshot(grid: &GridModel, result: &StepResult, steps: usize) {
    let snapshot = result.snapshot().unwrap();
    assert_eq!(snapshot.closed.len(), steps);
    assert_eq!(snapshot.closed.last(), Some(&snapshot.finalized.point()));
    let closed: HashSet<Point> = snapshot.closed.iter().copied().collect();
    assert_eq!(closed.len(), snapshot.closed.len());
    assert!(snapshot.open.iter().all(|p| !closed.contains(p)));
    assert!(is_contiguous(&snapshot.path));
    assert!(snapshot.path.iter().all(|p| grid.point_is_walkable(p)));
    assert_eq!(snapshot.path.len() as i64, snapshot.finalized.g + 1);
}

#[test]
fn fuzz() {
    env_logger::try_init().ok();
    const N: usize = 10;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    let start = Point::new(0, 0);
    let end = Point::new(N as i32 - 1, N as i32 - 1);

    for _ in 0..N_GRIDS {
        let mut grid = random_grid(N, N, &mut rng);
        grid.set_point(start, false);
        grid.set_point(end, false);
        grid.generate_components();
        let reachable = grid.reachable(&start, &end);

        let mut pathfinder = Pathfinder::new(&grid, start, end).unwrap();
        let mut previous_closed = 0;
        let path = loop {
            let result = pathfinder.step();
            assert!(pathfinder.steps() <= N * N);
            match &result {
                StepResult::Expanded(_) => {
                    check_snapshot(&grid, &result, pathfinder.steps());
                    assert_eq!(pathfinder.steps(), previous_closed + 1);
                    previous_closed = pathfinder.steps();
                }
                StepResult::PathFound(snapshot) => {
                    check_snapshot(&grid, &result, pathfinder.steps());
                    break Some(snapshot.path.clone());
                }
                StepResult::Exhausted => break None,
                StepResult::AlreadyDone => panic!("search reported done before finding a path"),
            }
        };
        if path.is_some() != reachable {
            visualize_grid(&grid, &start, &end);
        }
        assert_eq!(path.is_some(), reachable);
        if let Some(path) = path {
            assert_eq!(path.first(), Some(&start));
            assert_eq!(path.last(), Some(&end));
            assert_eq!(pathfinder.path(), Some(path));
            assert_eq!(pathfinder.step(), StepResult::AlreadyDone);
        } else {
            assert_eq!(pathfinder.open_nodes().count(), 0);
            assert_eq!(pathfinder.step(), StepResult::Exhausted);
        }
    }
}

#[test]
fn run_agrees_with_stepping() {
    const N: usize = 8;
    let mut rng = StdRng::seed_from_u64(1);
    let start = Point::new(0, 0);
    let end = Point::new(N as i32 - 1, N as i32 - 1);
    for _ in 0..500 {
        let mut grid = random_grid(N, N, &mut rng);
        grid.set_point(start, false);
        grid.set_point(end, false);
        grid.generate_components();

        let mut stepped = Pathfinder::new(&grid, start, end).unwrap();
        let stepped_path = loop {
            match stepped.step() {
                StepResult::Expanded(_) => {}
                StepResult::PathFound(snapshot) => break Some(snapshot.path),
                _ => break None,
            }
        };
        let mut ran = Pathfinder::new(&grid, start, end).unwrap();
        assert_eq!(ran.run(), stepped_path);
        assert_eq!(ran.steps(), stepped.steps());
    }
}
