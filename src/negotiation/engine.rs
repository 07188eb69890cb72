//! Negotiation engine: one-to-many CFP rounds with a single decision pass
//!
//! The engine is the single owner of the dialogue table, the live round and
//! the injected policy and ports. Handlers take `&mut self` and run each
//! inbound event to completion, so the append-then-maybe-decide sequence of
//! the round barrier is atomic without any locking.

use crate::dialogue::DialogueManager;
use crate::error::{ParleyError, Result};
use crate::transport::{DirectoryClient, InboundEvent, OutboundGateway};
use crate::types::{AgentId, Message, Performative};

use super::round::{Decision, NegotiationRound, Proposal, RoundOutcome};
use super::search::SearchSession;
use super::strategy::StrategyPolicy;

/// One negotiating agent's engine
pub struct NegotiationEngine<P, G, D> {
    dialogues: DialogueManager,
    search: SearchSession,
    round: NegotiationRound,
    policy: P,
    gateway: G,
    directory: D,
}

impl<P, G, D> NegotiationEngine<P, G, D>
where
    P: StrategyPolicy,
    G: OutboundGateway,
    D: DirectoryClient,
{
    pub fn new(self_id: AgentId, policy: P, gateway: G, directory: D) -> Self {
        Self {
            dialogues: DialogueManager::new(self_id),
            search: SearchSession::new(),
            round: NegotiationRound::new(),
            policy,
            gateway,
            directory,
        }
    }

    pub fn dialogues(&self) -> &DialogueManager {
        &self.dialogues
    }

    pub fn round(&self) -> &NegotiationRound {
        &self.round
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    /// Issue a discovery query if the policy is still searching
    pub fn start_search(&mut self) {
        self.search.start_search(&self.policy, &mut self.directory);
    }

    /// Route one inbound event; `Some(outcome)` when a decision pass ran
    pub fn on_event(&mut self, event: InboundEvent) -> Result<Option<RoundOutcome>> {
        match event {
            InboundEvent::SearchResult(candidates) => {
                self.on_search_result(&candidates)?;
                Ok(None)
            }
            InboundEvent::Message(message) => self.on_message(message),
        }
    }

    /// Handle a directory response; returns the number of CFPs sent
    pub fn on_search_result(&mut self, candidates: &[AgentId]) -> Result<usize> {
        self.search.on_search_result(
            candidates,
            &mut self.policy,
            &mut self.dialogues,
            &mut self.round,
            &mut self.gateway,
        )
    }

    /// Handle a negotiation message from a counterparty
    ///
    /// Only PROPOSE is expected by this engine; anything else is logged and
    /// dropped. Errors mean the message was rejected without being buffered.
    pub fn on_message(&mut self, message: Message) -> Result<Option<RoundOutcome>> {
        match message.performative {
            Performative::Propose => self.handle_propose(message),
            other => {
                tracing::warn!(
                    "ignoring unexpected {} from {} (dialogue {})",
                    other,
                    message.sender,
                    message.correlation_id
                );
                Ok(None)
            }
        }
    }

    /// Buffer an inbound proposal and run the decision pass if the barrier
    /// closes with it
    fn handle_propose(&mut self, message: Message) -> Result<Option<RoundOutcome>> {
        // resolve first so a stray message surfaces as UnknownDialogue
        self.dialogues.lookup(&message)?;
        let values = message
            .proposal_values()
            .ok_or_else(|| ParleyError::MissingProposal(message.correlation_id.to_string()))?
            .clone();

        // not buffered unless the dialogue was awaiting a proposal
        self.dialogues.register_propose(&message)?;

        // unacceptable or unaffordable proposals are declined on arrival,
        // everything else waits for the barrier
        let decision =
            if !self.policy.is_acceptable(&values) || !self.policy.is_affordable(&values) {
                Decision::Decline
            } else {
                Decision::Pending
            };
        tracing::info!(
            "received proposal={:?} from sender={} ({:?})",
            values,
            message.sender,
            decision
        );

        self.round.push(Proposal {
            sender: message.sender.clone(),
            message,
            decision,
        });

        if self.round.barrier_reached() {
            tracing::info!("received all proposals, making decision...");
            return self.run_decision_pass().map(Some);
        }
        Ok(None)
    }

    /// Run the decision pass over whatever has been received so far
    ///
    /// This is the escape hatch for a round whose barrier never closes
    /// (a contacted counterparty that stays silent): the caller decides when
    /// to give up waiting, typically on a deadline. No-op while nothing has
    /// been sent. Dialogues still awaiting a proposal are left untouched.
    pub fn force_decision(&mut self) -> Result<Option<RoundOutcome>> {
        if self.round.sent().is_empty() {
            return Ok(None);
        }
        self.run_decision_pass().map(Some)
    }

    fn run_decision_pass(&mut self) -> Result<RoundOutcome> {
        let winner = self.round.decide(&self.policy);
        match &winner {
            Some(sender) => tracing::info!("cheapest proposal wins: sender={}", sender),
            None => tracing::info!("no acceptable proposal this round"),
        }

        // exactly one reply per received proposal, in arrival order
        let received = self.round.close();
        let mut outcome = RoundOutcome {
            winner: None,
            declined: 0,
        };
        for proposal in received {
            match proposal.decision {
                Decision::Accept => {
                    let reply = self.dialogues.reply(Performative::Accept, &proposal.message)?;
                    let values = proposal.message.proposal_values().ok_or_else(|| {
                        ParleyError::MissingProposal(proposal.message.correlation_id.to_string())
                    })?;
                    let terms = self.policy.terms_from_proposal(values, &proposal.sender);
                    self.dialogues
                        .attach_terms(&proposal.message.correlation_id, terms.clone())?;
                    tracing::info!("ACCEPT the proposal from sender={}", proposal.sender);
                    self.gateway.send(reply);
                    outcome.winner = Some(terms);
                }
                Decision::Pending | Decision::Decline => {
                    let reply = self
                        .dialogues
                        .reply(Performative::Decline, &proposal.message)?;
                    tracing::info!("DECLINE the proposal from sender={}", proposal.sender);
                    self.gateway.send(reply);
                    outcome.declined += 1;
                }
            }
        }
        Ok(outcome)
    }
}
