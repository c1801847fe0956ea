//! Ports (trait boundaries) for external collaborators.
//!
//! The learner only sees environments through [`Task`] and is driven through
//! [`Driver`]. Training runs report progress to any number of [`Observer`]s.

pub mod driver;
pub mod environment;
pub mod observer;

pub use driver::Driver;
pub use environment::{Environment, Task, Transition};
pub use observer::{EpisodeSummary, Observer};
