//! Dialogue module: correlated per-counterparty state machines

pub mod manager;
pub mod state;

pub use manager::DialogueManager;
pub use state::{Dialogue, DialogueState, Role};
