use thiserror::Error;

/// Errors raised while building or designating a [GridModel](crate::grid::GridModel).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no cells")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("({x}, {y}) lies outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    #[error("start and goal have already been designated")]
    AlreadyDesignated,

    #[error("more than one {0} cell")]
    DuplicateEndpoint(&'static str),

    #[error("a start needs a goal and vice versa, missing the {0}")]
    MissingEndpoint(&'static str),
}

/// Errors raised when a search cannot be initialized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] GridError),

    #[error("grid has no designated start and goal")]
    NoEndpoints,
}

/// Errors raised while reading a map description.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed header line {line}: {reason}")]
    Header { line: usize, reason: String },

    #[error("unknown tile {tile:?} at line {line}, column {column}")]
    UnknownTile { tile: char, line: usize, column: usize },

    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error(transparent)]
    Grid(#[from] GridError),
}

pub type Result<T, E = MapError> = std::result::Result<T, E>;
