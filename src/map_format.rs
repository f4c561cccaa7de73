//! Reading grids from text.
//!
//! Two formats are understood:
//!
//! * Plain maps, one row per line: `.` or space is walkable, `#` is blocked, `S` marks the
//!   start and `G` the goal. Empty lines are ignored. Start and goal are optional but come as a
//!   pair.
//! * [Moving AI](https://movingai.com/benchmarks/formats.html) `.map` files, recognized by a
//!   leading `type` line. Their `S` and `G` tiles are swamp and ground, so such maps carry no
//!   endpoints.
use crate::error::{MapError, Result};
use crate::grid::{Cell, GridModel};
use grid_util::ValueGrid;
use log::info;
use std::fs;
use std::path::Path;

/// Reads and parses a map file, see [parse_map].
pub fn load_map<P: AsRef<Path>>(path: P) -> Result<GridModel> {
    let text = fs::read_to_string(path.as_ref())?;
    let grid = parse_map(&text)?;
    info!(
        "Loaded {}x{} map from {}",
        grid.width(),
        grid.height(),
        path.as_ref().display()
    );
    Ok(grid)
}

/// Parses either map format into a [GridModel] with components generated.
pub fn parse_map(text: &str) -> Result<GridModel> {
    if text.trim_start().starts_with("type") {
        parse_moving_ai(text)
    } else {
        parse_plain(text)
    }
}

fn plain_tile(tile: char) -> Option<Cell> {
    match tile {
        '.' | ' ' => Some(Cell::Walkable),
        '#' => Some(Cell::Blocked),
        'S' => Some(Cell::Start),
        'G' => Some(Cell::Goal),
        _ => None,
    }
}

fn moving_ai_tile(tile: char) -> Option<Cell> {
    match tile {
        '.' | 'G' | 'S' => Some(Cell::Walkable),
        '@' | 'O' | 'T' | 'W' => Some(Cell::Blocked),
        _ => None,
    }
}

fn parse_rows<'a, I, F>(lines: I, tile: F) -> Result<Vec<Vec<Cell>>>
where
    I: IntoIterator<Item = (usize, &'a str)>,
    F: Fn(char) -> Option<Cell>,
{
    lines
        .into_iter()
        .map(|(number, line)| {
            line.chars()
                .enumerate()
                .map(|(column, c)| {
                    tile(c).ok_or(MapError::UnknownTile {
                        tile: c,
                        line: number + 1,
                        column: column + 1,
                    })
                })
                .collect()
        })
        .collect()
}

fn parse_plain(text: &str) -> Result<GridModel> {
    let lines = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .enumerate()
        .filter(|(_, line)| !line.is_empty());
    let rows = parse_rows(lines, plain_tile)?;
    Ok(GridModel::from_rows(&rows)?)
}

fn parse_moving_ai(text: &str) -> Result<GridModel> {
    let line_count = text.lines().count();
    let mut lines = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .enumerate();
    let mut header = |key: &str| -> Result<String> {
        let (number, line) = lines.next().ok_or_else(|| MapError::Header {
            line: line_count + 1,
            reason: format!("missing {key} line"),
        })?;
        let mut parts = line.splitn(2, ' ');
        if parts.next() != Some(key) {
            return Err(MapError::Header {
                line: number + 1,
                reason: format!("expected {key}, found {line:?}"),
            });
        }
        Ok(parts.next().unwrap_or_default().trim().to_owned())
    };
    header("type")?;
    let height = header("height")?;
    let width = header("width")?;
    header("map")?;
    let parse_dim = |value: String, line: usize| {
        value.parse::<usize>().map_err(|e| MapError::Header {
            line,
            reason: format!("{value:?}: {e}"),
        })
    };
    let height = parse_dim(height, 2)?;
    let width = parse_dim(width, 3)?;

    let rows = parse_rows(lines.take(height), moving_ai_tile)?;
    if rows.len() != height {
        return Err(MapError::RowCount {
            expected: height,
            found: rows.len(),
        });
    }
    if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(crate::error::GridError::RaggedRow {
            row,
            expected: width,
            found: cells.len(),
        }
        .into());
    }
    Ok(GridModel::from_rows(&rows)?)
}
