//! CLI module for Parley

pub mod app;
pub mod commands;

pub use app::SimulationConfig;
pub use commands::{Cli, Commands};
