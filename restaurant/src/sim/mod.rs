//! 模拟编排 - setup, task supervision and teardown of one restaurant run

pub mod runner;
pub mod tasks;

pub use runner::{Simulation, SimulationReport};
pub use tasks::{Outcomes, SimTasks, TaskKind, TaskOutcome};
