//! Off-policy n-step SARSA
//!
//! A tabular temporal difference learner that acts ε-greedily but estimates
//! the value of the greedy policy. The pieces, leaves first:
//!
//! - [`QTable`]: long-lived action values, default 0.0 on miss
//! - [`History`]: ring of the last n+1 (state, action, reward) records
//! - [`greedy_policy`] / [`epsilon_greedy_policy`]: target and behaviour
//!   distributions
//! - [`sample_action`]: cumulative-distribution draw
//! - [`OffPolicyNStepSarsaDriver`]: the episode state machine and update rule
//!
//! ## Update
//!
//! For the pair at `τ`, with horizon `h = min(τ+n, T)`:
//!
//! | Term | Value |
//! |------|-------|
//! | weight ρ | Π π(A_i\|S_i) / b(A_i\|S_i), i = τ+1 ..= min(τ+n, T−1) |
//! | return G | Σ γ^(i−τ−1) R_i, i = τ+1 ..= h, plus γ^n Q(S_{τ+n}, A_{τ+n}) if τ+n < T |
//! | update | Q(S_τ, A_τ) ← Q + α ρ (G − Q) |
//!
//! ## Usage Example
//!
//! ```no_run
//! use sarsa_lab::{
//!     gridworld::GridWorld,
//!     ports::Environment,
//!     sarsa::{OffPolicyNStepSarsaDriver, SarsaConfig},
//! };
//!
//! let env = GridWorld::corner(0.01)?;
//! let driver = OffPolicyNStepSarsaDriver::new(
//!     SarsaConfig::new(
//!         0.6,  // step_size
//!         4,    // step_no
//!         0.05, // experiment_rate
//!         1.0,  // discount_factor
//!     ),
//!     env.task(),
//! )?;
//! # Ok::<(), sarsa_lab::Error>(())
//! ```

pub mod config;
pub mod driver;
pub mod history;
pub mod policy;
pub mod q_table;
pub mod sampler;
pub mod serialization;

pub use config::{MAX_LEARNING_STEPS, SarsaConfig};
pub use driver::{EpisodePhase, OffPolicyNStepSarsaDriver};
pub use history::History;
pub use policy::{ActionDistribution, epsilon_greedy_policy, greedy_policy, normalize_l1};
pub use q_table::{DEFAULT_Q_VALUE, QTable};
pub use sampler::sample_action;
pub use serialization::{SavedSarsaDriver, TrainingMetadata};
