//! ASCII track maps

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// L-shaped track: run right along the top row, then down the corner.
pub const CORNER_MAP: &str = "\
#########
#S......#
#######.#
      #.#
      #.#
      #G#
      ###
";

/// Cell coordinates on a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Parsed track: open cells, a start and a goal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    open: Vec<Vec<bool>>,
    start: Position,
    goal: Position,
}

impl GridMap {
    /// Parse a map where `.` is track, `S` the start, `G` the goal and
    /// `#` or a space a wall. Short lines are padded with walls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMap`] on unknown characters or when the map
    /// does not contain exactly one `S` and one `G`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut open = Vec::new();
        let mut starts = Vec::new();
        let mut goals = Vec::new();

        for (row, line) in text.lines().enumerate() {
            let mut cells = Vec::with_capacity(line.len());
            for (col, character) in line.chars().enumerate() {
                let is_open = match character {
                    '#' | ' ' => false,
                    '.' => true,
                    'S' => {
                        starts.push(Position::new(row, col));
                        true
                    }
                    'G' => {
                        goals.push(Position::new(row, col));
                        true
                    }
                    other => {
                        return Err(Error::InvalidMap {
                            message: format!("unknown cell '{other}' at {}", Position::new(row, col)),
                        });
                    }
                };
                cells.push(is_open);
            }
            open.push(cells);
        }

        let start = single(&starts, 'S')?;
        let goal = single(&goals, 'G')?;
        Ok(Self { open, start, goal })
    }

    /// The built-in corner track
    pub fn corner() -> Result<Self> {
        Self::parse(CORNER_MAP)
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn rows(&self) -> usize {
        self.open.len()
    }

    pub fn is_open(&self, position: Position) -> bool {
        self.open
            .get(position.row)
            .and_then(|row| row.get(position.col))
            .copied()
            .unwrap_or(false)
    }

    /// Number of open cells, including start and goal
    pub fn open_cells(&self) -> usize {
        self.open.iter().flatten().filter(|&&cell| cell).count()
    }
}

fn single(found: &[Position], marker: char) -> Result<Position> {
    match found {
        [position] => Ok(*position),
        [] => Err(Error::InvalidMap {
            message: format!("no '{marker}' cell"),
        }),
        _ => Err(Error::InvalidMap {
            message: format!("{} '{marker}' cells, expected one", found.len()),
        }),
    }
}
