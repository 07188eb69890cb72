//! Negotiation module: one-to-many CFP rounds and winner selection

pub mod engine;
pub mod round;
pub mod search;
pub mod strategy;

pub use engine::NegotiationEngine;
pub use round::{Decision, NegotiationRound, Proposal, RoundOutcome};
pub use search::SearchSession;
pub use strategy::{BuyerStrategy, StrategyPolicy};
