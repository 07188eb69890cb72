//! Strategy policy: the pluggable decision logic of the engine
//!
//! The engine never inspects proposal payloads itself; every domain
//! judgement (acceptability, affordability, ranking, terms) is delegated
//! here. Swapping the policy retargets the engine to different goods or
//! services without touching the protocol code.

use crate::types::{AgentId, ProposalValues, Query, Terms};

use super::round::Proposal;

/// Decision capability consumed by the negotiation engine
pub trait StrategyPolicy {
    /// Query describing the service this agent is looking for
    fn service_query(&self) -> Query;

    /// Filter discovery candidates down to the ones worth contacting
    fn acceptable_counterparties(&self, candidates: &[AgentId]) -> Vec<AgentId>;

    /// Whether a proposal's attributes are acceptable at all
    fn is_acceptable(&self, proposal: &ProposalValues) -> bool;

    /// Whether the agent can pay for the proposal
    fn is_affordable(&self, proposal: &ProposalValues) -> bool;

    /// Minimum-cost proposal among the pending ones, None for an empty slice
    ///
    /// The policy owns the total order over proposal cost, ties included;
    /// the result must be deterministic for a given input sequence.
    fn cheapest<'a>(&self, pending: &[&'a Proposal]) -> Option<&'a Proposal>;

    /// Derive settlement terms for the accepted proposal
    fn terms_from_proposal(&self, proposal: &ProposalValues, counterparty: &AgentId) -> Terms;

    /// Whether the discovery phase is still running
    fn is_searching(&self) -> bool;

    fn set_searching(&mut self, searching: bool);

    /// Whether discovery should stop after the first non-empty result
    fn stop_on_first_result(&self) -> bool;
}

/// Price-capped buyer strategy
///
/// Acceptable iff the proposal price is within `max_unit_price`; affordable
/// iff it is within the remaining `balance`. `cheapest` is the stable
/// minimum over the `price` attribute: ties go to the earliest arrival,
/// proposals without a price lose to any priced one.
pub struct BuyerStrategy {
    query: Query,
    max_unit_price: u64,
    balance: u64,
    searching: bool,
    stop_on_first_result: bool,
}

impl BuyerStrategy {
    pub fn new(query: Query, max_unit_price: u64, balance: u64) -> Self {
        Self {
            query,
            max_unit_price,
            balance,
            searching: true,
            stop_on_first_result: true,
        }
    }

    pub fn with_stop_on_first_result(mut self, stop: bool) -> Self {
        self.stop_on_first_result = stop;
        self
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    fn cost(proposal: &Proposal) -> u64 {
        proposal
            .message
            .proposal_values()
            .and_then(|values| values.price())
            .unwrap_or(u64::MAX)
    }
}

impl StrategyPolicy for BuyerStrategy {
    fn service_query(&self) -> Query {
        self.query.clone()
    }

    fn acceptable_counterparties(&self, candidates: &[AgentId]) -> Vec<AgentId> {
        candidates.iter().filter(|c| !c.is_empty()).cloned().collect()
    }

    fn is_acceptable(&self, proposal: &ProposalValues) -> bool {
        match proposal.price() {
            Some(price) => price <= self.max_unit_price,
            None => false,
        }
    }

    fn is_affordable(&self, proposal: &ProposalValues) -> bool {
        match proposal.price() {
            Some(price) => price <= self.balance,
            None => false,
        }
    }

    fn cheapest<'a>(&self, pending: &[&'a Proposal]) -> Option<&'a Proposal> {
        // a candidate replaces the best only when strictly cheaper,
        // so the earliest arrival keeps ties
        pending.iter().copied().fold(None, |best, candidate| match best {
            Some(current) if Self::cost(current) <= Self::cost(candidate) => Some(current),
            _ => Some(candidate),
        })
    }

    fn terms_from_proposal(&self, proposal: &ProposalValues, counterparty: &AgentId) -> Terms {
        Terms {
            counterparty: counterparty.clone(),
            price: proposal.price().unwrap_or(0),
            quantity: proposal.get("quantity").unwrap_or(1),
        }
    }

    fn is_searching(&self) -> bool {
        self.searching
    }

    fn set_searching(&mut self, searching: bool) {
        self.searching = searching;
    }

    fn stop_on_first_result(&self) -> bool {
        self.stop_on_first_result
    }
}
