use core::fmt;
use grid_util::Point;
use std::hash::{Hash, Hasher};

/// A search position together with its costs. Identity is the coordinate alone: two nodes at
/// the same `(x, y)` compare equal and hash the same whatever their costs or parent.
#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub x: i32,
    pub y: i32,
    /// Coordinate this node was generated from, [None] for the start node.
    pub parent: Option<Point>,
    pub g: i64,
    pub h: i64,
    pub f: i64,
}

impl Node {
    pub fn new(point: Point, parent: Option<Point>, g: i64, h: i64) -> Node {
        Node {
            x: point.x,
            y: point.y,
            parent,
            g,
            h,
            f: g + h,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x.hash(state);
        self.y.hash(state);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "({}, {}) g={} h={} f={}",
            self.x, self.y, self.g, self.h, self.f
        )
    }
}
