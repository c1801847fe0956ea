//! Grid track environment for running drivers end to end
//!
//! The agent moves one cell per step on an ASCII map. Every step costs −1;
//! entering the goal yields 0 and ends the episode, matching the zero-reward
//! goal convention of [`Task::is_goal_reward`]. With probability
//! `slip_chance` the chosen move is replaced by [`Move::Stay`].

mod map;

use std::{fmt, path::Path, sync::Arc};

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

pub use map::{CORNER_MAP, GridMap, Position};

use crate::{
    Error, Result,
    ports::{Environment, Task, Transition},
};

/// Reward for every step that does not reach the goal
pub const STEP_REWARD: f64 = -1.0;
/// Reward for the step that reaches the goal
pub const GOAL_REWARD: f64 = 0.0;

/// Unit moves plus the neutral `Stay`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
    Stay,
}

impl Move {
    pub const DIRECTIONS: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Cell reached from `from`, or `None` when it would leave the grid
    pub fn apply(self, from: Position) -> Option<Position> {
        let Position { row, col } = from;
        match self {
            Move::Up => row.checked_sub(1).map(|row| Position::new(row, col)),
            Move::Down => Some(Position::new(row + 1, col)),
            Move::Left => col.checked_sub(1).map(|col| Position::new(row, col)),
            Move::Right => Some(Position::new(row, col + 1)),
            Move::Stay => Some(from),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
            Move::Stay => "stay",
        };
        f.write_str(label)
    }
}

/// What a learner knows about a grid: which moves lead to open cells
#[derive(Debug, Clone)]
pub struct GridTask {
    map: Arc<GridMap>,
}

impl GridTask {
    pub fn map(&self) -> &GridMap {
        &self.map
    }
}

impl Task for GridTask {
    type State = Position;
    type Action = Move;

    /// Moves into open cells; none at the goal
    fn available_actions(&self, state: &Position) -> Vec<Move> {
        if *state == self.map.goal() {
            return Vec::new();
        }
        Move::DIRECTIONS
            .into_iter()
            .filter(|direction| {
                direction
                    .apply(*state)
                    .is_some_and(|target| self.map.is_open(target))
            })
            .collect()
    }

    fn neutral_action(&self) -> Move {
        Move::Stay
    }
}

/// Grid track simulation
#[derive(Debug, Clone)]
pub struct GridWorld {
    map: Arc<GridMap>,
    position: Position,
    slip_chance: f64,
    rng: StdRng,
}

impl GridWorld {
    /// Create an environment on `map`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `slip_chance` is outside [0, 1].
    pub fn new(map: GridMap, slip_chance: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&slip_chance) {
            return Err(Error::invalid_configuration(format!(
                "slip_chance must be in [0, 1], got {slip_chance}"
            )));
        }
        let position = map.start();
        Ok(Self {
            map: Arc::new(map),
            position,
            slip_chance,
            rng: StdRng::from_rng(&mut rand::rng()),
        })
    }

    /// Environment on the built-in corner track
    pub fn corner(slip_chance: f64) -> Result<Self> {
        Self::new(GridMap::corner()?, slip_chance)
    }

    /// Environment on a map read from `path`
    pub fn from_file<P: AsRef<Path>>(path: P, slip_chance: f64) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("read map {}", path.as_ref().display()),
            source,
        })?;
        Self::new(GridMap::parse(&text)?, slip_chance)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }
}

impl Environment for GridWorld {
    type Task = GridTask;

    fn task(&self) -> GridTask {
        GridTask {
            map: Arc::clone(&self.map),
        }
    }

    fn reset(&mut self) -> Position {
        self.position = self.map.start();
        self.position
    }

    fn step(&mut self, action: &Move) -> Result<Transition<Position>> {
        if self.position == self.map.goal() {
            return Ok(Transition::new(self.position, GOAL_REWARD, true));
        }

        let slipped = self.slip_chance > 0.0 && self.rng.random::<f64>() < self.slip_chance;
        let effective = if slipped { Move::Stay } else { *action };
        if let Some(target) = effective
            .apply(self.position)
            .filter(|&target| self.map.is_open(target))
        {
            self.position = target;
        }

        let done = self.position == self.map.goal();
        let reward = if done { GOAL_REWARD } else { STEP_REWARD };
        Ok(Transition::new(self.position, reward, done))
    }
}
