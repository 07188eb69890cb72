//! Parley: one-to-many call-for-proposal negotiation for autonomous agents
//!
//! An agent discovers candidate counterparties through a directory service,
//! fans a CFP out to each of them, buffers their proposals and, once every
//! contacted counterparty has answered, accepts the single cheapest
//! acceptable proposal and declines the rest. Domain judgement lives behind
//! the [`negotiation::StrategyPolicy`] trait; the engine only speaks the
//! protocol.

pub mod cli;
pub mod dialogue;
pub mod error;
pub mod negotiation;
pub mod transport;
pub mod types;

pub use dialogue::{Dialogue, DialogueManager, DialogueState, Role};
pub use error::{ParleyError, Result};
pub use negotiation::{
    BuyerStrategy, Decision, NegotiationEngine, NegotiationRound, Proposal, RoundOutcome,
    SearchSession, StrategyPolicy,
};
pub use transport::{
    ChannelDirectory, ChannelGateway, DirectoryClient, InboundEvent, OutboundGateway,
    RecordingDirectory, RecordingGateway,
};
pub use types::{
    AgentId, CorrelationId, Message, Payload, Performative, ProposalValues, Query, Terms,
};
