//! Serialization support for trained SARSA drivers.

use std::{
    fs::File,
    hash::Hash,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    ports::Task,
    sarsa::{OffPolicyNStepSarsaDriver, QTable, SarsaConfig},
};

/// Provenance recorded alongside a saved Q-table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingMetadata {
    /// Episodes the table was trained for
    pub episodes_trained: Option<usize>,
    /// Environment the table was trained on
    pub environment: Option<String>,
    /// Random seed used (if any)
    pub seed: Option<u64>,
}

/// On-disk form of a trained driver: hyperparameters plus the Q-table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize, A: Serialize",
    deserialize = "S: Deserialize<'de> + Eq + Hash, A: Deserialize<'de> + Eq + Hash"
))]
pub struct SavedSarsaDriver<S, A> {
    pub version: u32,
    pub config: SarsaConfig,
    q_table: QTable<S, A>,
    pub metadata: TrainingMetadata,
}

impl<S, A> SavedSarsaDriver<S, A>
where
    S: Eq + Hash + Clone,
    A: Eq + Hash + Clone,
{
    pub const VERSION: u32 = 1;

    pub fn from_driver<T>(driver: &OffPolicyNStepSarsaDriver<T>, metadata: TrainingMetadata) -> Self
    where
        T: Task<State = S, Action = A>,
    {
        Self {
            version: Self::VERSION,
            config: driver.config().clone(),
            q_table: driver.q_table().clone(),
            metadata,
        }
    }

    pub fn q_table(&self) -> &QTable<S, A> {
        &self.q_table
    }

    /// Rebuild a driver for `task`, continuing from the saved Q-table
    ///
    /// `config` overrides the saved hyperparameters when given.
    pub fn to_driver<T>(
        &self,
        task: T,
        config: Option<SarsaConfig>,
    ) -> Result<OffPolicyNStepSarsaDriver<T>>
    where
        T: Task<State = S, Action = A>,
    {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported SARSA save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }

        let config = config.unwrap_or_else(|| self.config.clone());
        OffPolicyNStepSarsaDriver::with_q_table(config, task, self.q_table.clone())
            .context("Saved driver has an invalid configuration")
    }
}

impl<S, A> SavedSarsaDriver<S, A>
where
    S: Serialize + DeserializeOwned + Eq + Hash,
    A: Serialize + DeserializeOwned + Eq + Hash,
{
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self).context("Failed to serialize SARSA driver")?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize SARSA driver")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gridworld::{GridTask, GridWorld, Move, Position},
        ports::{Driver, Environment},
    };

    fn train_once(driver: &mut OffPolicyNStepSarsaDriver<GridTask>, env: &mut GridWorld) {
        let mut state = env.reset();
        let mut action = driver.start_attempt(&state).unwrap();
        let mut reward = 0.0;
        let mut done = false;
        while !driver.finished_learning() {
            if !done {
                let transition = env.step(&action).unwrap();
                state = transition.state;
                reward = transition.reward;
                done = transition.done;
            }
            action = driver.control(&state, reward).unwrap();
        }
    }

    #[test]
    fn test_sarsa_roundtrip() -> Result<()> {
        let mut env = GridWorld::corner(0.0)?.with_seed(3);
        let config = SarsaConfig::new(0.6, 3, 0.1, 1.0).with_seed(11);
        let mut driver = OffPolicyNStepSarsaDriver::new(config.clone(), env.task())?;
        train_once(&mut driver, &mut env);
        assert!(!driver.q_table().is_empty());

        let saved = SavedSarsaDriver::from_driver(&driver, TrainingMetadata::default());
        let bytes = rmp_serde::to_vec(&saved)?;
        let loaded: SavedSarsaDriver<Position, Move> = rmp_serde::from_slice(&bytes)?;
        let restored = loaded.to_driver(env.task(), None)?;

        assert_eq!(restored.q_table().len(), driver.q_table().len());
        assert_eq!(restored.config(), &config);
        for (state, action, value) in driver.q_table().iter() {
            assert_eq!(restored.q_table().get(state, action), value);
        }
        Ok(())
    }

    #[test]
    fn test_rejects_unknown_version() -> Result<()> {
        let env = GridWorld::corner(0.0)?;
        let driver = OffPolicyNStepSarsaDriver::new(SarsaConfig::default(), env.task())?;
        let mut saved = SavedSarsaDriver::from_driver(&driver, TrainingMetadata::default());
        saved.version = 99;
        assert!(saved.to_driver(env.task(), None).is_err());
        Ok(())
    }
}
