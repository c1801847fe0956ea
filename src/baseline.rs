//! Random baseline driver
//!
//! Picks uniformly among the legal actions and never learns. Useful as the
//! lower bound a learning driver's steps-to-goal should beat.

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    ports::{Driver, Task},
    sarsa::{MAX_LEARNING_STEPS, driver::build_rng},
};

#[derive(Debug, Clone)]
pub struct RandomDriver<T: Task> {
    task: T,
    current_step: usize,
    max_learning_steps: usize,
    reached_goal: bool,
    rng: StdRng,
}

impl<T: Task> RandomDriver<T> {
    pub fn new(task: T) -> Self {
        Self {
            task,
            current_step: 0,
            max_learning_steps: MAX_LEARNING_STEPS,
            reached_goal: false,
            rng: build_rng(None),
        }
    }

    pub fn with_max_learning_steps(mut self, steps: usize) -> Self {
        self.max_learning_steps = steps;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn choose(&mut self, state: &T::State) -> Result<T::Action> {
        let actions = self.task.available_actions(state);
        actions
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| Error::InvalidActionSet {
                state: format!("{state:?}"),
            })
    }
}

impl<T: Task> Driver for RandomDriver<T> {
    type State = T::State;
    type Action = T::Action;

    fn start_attempt(&mut self, state: &T::State) -> Result<T::Action> {
        self.current_step = 0;
        self.reached_goal = false;
        self.choose(state)
    }

    fn control(&mut self, state: &T::State, last_reward: f64) -> Result<T::Action> {
        self.current_step += 1;
        if self.task.is_goal_reward(last_reward) {
            self.reached_goal = true;
        }
        if self.finished_learning() {
            return Ok(self.task.neutral_action());
        }
        self.choose(state)
    }

    fn finished_learning(&self) -> bool {
        self.reached_goal || self.current_step > self.max_learning_steps
    }

    fn current_step(&self) -> usize {
        self.current_step
    }

    fn name(&self) -> &str {
        "Random"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gridworld::{GridWorld, Move},
        ports::Environment,
    };

    #[test]
    fn test_only_legal_actions_are_chosen() {
        let env = GridWorld::corner(0.0).unwrap();
        let task = env.task();
        let mut driver = RandomDriver::new(task.clone()).with_seed(1);
        let start = env.map().start();
        for _ in 0..20 {
            assert_eq!(driver.start_attempt(&start).unwrap(), Move::Right);
        }
    }

    #[test]
    fn test_finishes_on_goal_reward() {
        let env = GridWorld::corner(0.0).unwrap();
        let mut driver = RandomDriver::new(env.task()).with_seed(2);
        let start = env.map().start();
        driver.start_attempt(&start).unwrap();
        driver.control(&start, -1.0).unwrap();
        assert!(!driver.finished_learning());
        let action = driver.control(&env.map().goal(), 0.0).unwrap();
        assert_eq!(action, Move::Stay);
        assert!(driver.finished_learning());
    }

    #[test]
    fn test_finishes_after_step_budget() {
        let env = GridWorld::corner(0.0).unwrap();
        let mut driver = RandomDriver::new(env.task())
            .with_max_learning_steps(3)
            .with_seed(3);
        let start = env.map().start();
        driver.start_attempt(&start).unwrap();
        for _ in 0..3 {
            driver.control(&start, -1.0).unwrap();
            assert!(!driver.finished_learning());
        }
        driver.control(&start, -1.0).unwrap();
        assert!(driver.finished_learning());
    }
}
