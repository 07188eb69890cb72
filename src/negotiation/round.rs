//! Negotiation round: proposal buffer, barrier and decision marking
//!
//! Exactly one logical round is live at a time. The round is a value
//! object: after its decision pass it is cleared, never versioned or
//! carried over.

use crate::types::{AgentId, Message, Terms};

use super::strategy::StrategyPolicy;

/// Decision slot of a buffered proposal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Pending,
    Accept,
    Decline,
}

/// A buffered inbound proposal awaiting the round's decision pass
#[derive(Clone, Debug)]
pub struct Proposal {
    pub sender: AgentId,
    pub message: Message,
    pub decision: Decision,
}

/// Result of a completed decision pass
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundOutcome {
    /// Terms of the single accepted proposal, if any counterparty won
    pub winner: Option<Terms>,
    /// Number of DECLINE replies sent
    pub declined: usize,
}

/// One batch of concurrent CFP -> PROPOSE exchanges sharing a decision pass
#[derive(Default)]
pub struct NegotiationRound {
    sent: Vec<AgentId>,
    received: Vec<Proposal>,
}

impl NegotiationRound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a counterparty a CFP was sent to
    pub fn record_sent(&mut self, counterparty: AgentId) {
        self.sent.push(counterparty);
    }

    /// Buffer an inbound proposal (callers validate the dialogue first)
    pub fn push(&mut self, proposal: Proposal) {
        self.received.push(proposal);
    }

    pub fn sent(&self) -> &[AgentId] {
        &self.sent
    }

    pub fn received(&self) -> &[Proposal] {
        &self.received
    }

    /// The barrier: every contacted counterparty has answered
    pub fn barrier_reached(&self) -> bool {
        !self.sent.is_empty() && self.received.len() == self.sent.len()
    }

    /// Mark decisions: the cheapest pending proposal wins, every other
    /// pending one is declined. Pre-declined proposals keep their slot.
    /// Returns the winner's sender, None when nothing was pending.
    pub fn decide<P: StrategyPolicy + ?Sized>(&mut self, policy: &P) -> Option<AgentId> {
        let winner_correlation = {
            let pending: Vec<&Proposal> = self
                .received
                .iter()
                .filter(|p| p.decision == Decision::Pending)
                .collect();
            policy
                .cheapest(&pending)
                .map(|winner| winner.message.correlation_id.clone())
        };

        let correlation = winner_correlation?;
        let mut winner_sender = None;
        for proposal in &mut self.received {
            if proposal.decision != Decision::Pending {
                continue;
            }
            if proposal.message.correlation_id == correlation {
                proposal.decision = Decision::Accept;
                winner_sender = Some(proposal.sender.clone());
            } else {
                proposal.decision = Decision::Decline;
            }
        }
        winner_sender
    }

    /// Drain the round: returns the received proposals in arrival order and
    /// clears both sequences, ready for the next round
    pub fn close(&mut self) -> Vec<Proposal> {
        self.sent.clear();
        std::mem::take(&mut self.received)
    }
}
