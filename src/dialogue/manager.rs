//! Dialogue manager: ownership, correlation and transition enforcement

use crate::error::{ParleyError, Result};
use crate::types::{AgentId, CorrelationId, Message, Payload, Performative, Terms};
use std::collections::HashMap;

use super::state::{Dialogue, Role};

/// Owns every dialogue of the local agent, keyed by correlation id
pub struct DialogueManager {
    self_id: AgentId,
    dialogues: HashMap<CorrelationId, Dialogue>,
}

impl DialogueManager {
    pub fn new(self_id: AgentId) -> Self {
        Self {
            self_id,
            dialogues: HashMap::new(),
        }
    }

    pub fn self_id(&self) -> &AgentId {
        &self.self_id
    }

    /// Open a new dialogue towards `counterparty` and build its opening message
    pub fn create(
        &mut self,
        counterparty: &AgentId,
        performative: Performative,
        payload: Payload,
    ) -> Result<(Message, Dialogue)> {
        if counterparty.is_empty() || *counterparty == self.self_id {
            return Err(ParleyError::InvalidCounterparty(counterparty.to_string()));
        }

        let correlation_id = CorrelationId::generate();
        let mut dialogue = Dialogue::new(
            correlation_id.clone(),
            self.self_id.clone(),
            counterparty.clone(),
            Role::Initiator,
        );
        dialogue.advance(performative)?;

        let message = Message::new(
            performative,
            correlation_id.clone(),
            self.self_id.clone(),
            counterparty.clone(),
            payload,
        );

        self.dialogues.insert(correlation_id, dialogue.clone());
        Ok((message, dialogue))
    }

    /// Resolve the dialogue an inbound message belongs to
    pub fn lookup(&self, message: &Message) -> Result<&Dialogue> {
        self.dialogues
            .get(&message.correlation_id)
            .ok_or_else(|| ParleyError::UnknownDialogue(message.correlation_id.to_string()))
    }

    /// Register an inbound PROPOSE, advancing its dialogue to ProposeReceived
    ///
    /// Fails with `UnknownDialogue` for stray correlation ids and with
    /// `ProtocolViolation` when the dialogue is not awaiting a proposal
    /// (e.g. a second PROPOSE on the same dialogue). Neither failure mutates
    /// any state.
    pub fn register_propose(&mut self, message: &Message) -> Result<()> {
        let dialogue = self
            .dialogues
            .get_mut(&message.correlation_id)
            .ok_or_else(|| ParleyError::UnknownDialogue(message.correlation_id.to_string()))?;
        dialogue.advance(Performative::Propose)
    }

    /// Build a correlated reply to `target` and advance the dialogue
    pub fn reply(&mut self, performative: Performative, target: &Message) -> Result<Message> {
        let dialogue = self
            .dialogues
            .get_mut(&target.correlation_id)
            .ok_or_else(|| ParleyError::UnknownDialogue(target.correlation_id.to_string()))?;
        dialogue.advance(performative)?;

        Ok(Message::new(
            performative,
            target.correlation_id.clone(),
            self.self_id.clone(),
            dialogue.counterparty().clone(),
            Payload::Empty,
        ))
    }

    /// Attach accepted terms to a dialogue
    pub fn attach_terms(&mut self, correlation_id: &CorrelationId, terms: Terms) -> Result<()> {
        let dialogue = self
            .dialogues
            .get_mut(correlation_id)
            .ok_or_else(|| ParleyError::UnknownDialogue(correlation_id.to_string()))?;
        dialogue.attach_terms(terms)
    }

    /// Get a dialogue by correlation id
    pub fn get(&self, correlation_id: &CorrelationId) -> Option<&Dialogue> {
        self.dialogues.get(correlation_id)
    }

    /// Number of dialogues ever opened (terminal ones included)
    pub fn len(&self) -> usize {
        self.dialogues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::state::DialogueState;
    use crate::types::{ProposalValues, Query};

    fn manager() -> DialogueManager {
        DialogueManager::new(AgentId::new("buyer"))
    }

    fn cfp_payload() -> Payload {
        Payload::Query(Query::new("service", "car_park"))
    }

    fn propose_reply(cfp: &Message, price: u64) -> Message {
        Message::new(
            Performative::Propose,
            cfp.correlation_id.clone(),
            cfp.to.clone(),
            cfp.sender.clone(),
            Payload::Proposal(ProposalValues::new().with("price", price)),
        )
    }

    #[test]
    fn test_create_opens_cfp_sent_dialogue() {
        let mut dialogues = manager();
        let (msg, dialogue) = dialogues
            .create(&AgentId::new("seller_1"), Performative::Cfp, cfp_payload())
            .unwrap();

        assert_eq!(msg.performative, Performative::Cfp);
        assert_eq!(msg.sender, AgentId::new("buyer"));
        assert_eq!(msg.to, AgentId::new("seller_1"));
        assert_eq!(dialogue.state(), DialogueState::CfpSent);
        assert_eq!(dialogues.len(), 1);
    }

    #[test]
    fn test_create_rejects_self_and_empty() {
        let mut dialogues = manager();

        let err = dialogues
            .create(&AgentId::new("buyer"), Performative::Cfp, cfp_payload())
            .unwrap_err();
        assert!(matches!(err, ParleyError::InvalidCounterparty(_)));

        let err = dialogues
            .create(&AgentId::new(""), Performative::Cfp, cfp_payload())
            .unwrap_err();
        assert!(matches!(err, ParleyError::InvalidCounterparty(_)));
        assert!(dialogues.is_empty());
    }

    #[test]
    fn test_lookup_unknown_correlation() {
        let dialogues = manager();
        let stray = Message::new(
            Performative::Propose,
            CorrelationId::generate(),
            AgentId::new("seller_1"),
            AgentId::new("buyer"),
            Payload::Empty,
        );

        let err = dialogues.lookup(&stray).unwrap_err();
        assert!(matches!(err, ParleyError::UnknownDialogue(_)));
    }

    #[test]
    fn test_register_propose_advances_state() {
        let mut dialogues = manager();
        let (cfp, _) = dialogues
            .create(&AgentId::new("seller_1"), Performative::Cfp, cfp_payload())
            .unwrap();

        let propose = propose_reply(&cfp, 9);
        dialogues.register_propose(&propose).unwrap();

        let dialogue = dialogues.get(&cfp.correlation_id).unwrap();
        assert_eq!(dialogue.state(), DialogueState::ProposeReceived);
    }

    #[test]
    fn test_second_propose_is_violation() {
        let mut dialogues = manager();
        let (cfp, _) = dialogues
            .create(&AgentId::new("seller_1"), Performative::Cfp, cfp_payload())
            .unwrap();

        let propose = propose_reply(&cfp, 9);
        dialogues.register_propose(&propose).unwrap();

        let err = dialogues.register_propose(&propose).unwrap_err();
        assert!(matches!(err, ParleyError::ProtocolViolation { .. }));
    }

    #[test]
    fn test_reply_accept_and_attach_terms() {
        let mut dialogues = manager();
        let (cfp, _) = dialogues
            .create(&AgentId::new("seller_1"), Performative::Cfp, cfp_payload())
            .unwrap();
        let propose = propose_reply(&cfp, 9);
        dialogues.register_propose(&propose).unwrap();

        let accept = dialogues.reply(Performative::Accept, &propose).unwrap();
        assert_eq!(accept.performative, Performative::Accept);
        assert_eq!(accept.correlation_id, cfp.correlation_id);
        assert_eq!(accept.to, AgentId::new("seller_1"));

        let terms = Terms {
            counterparty: AgentId::new("seller_1"),
            price: 9,
            quantity: 1,
        };
        dialogues
            .attach_terms(&cfp.correlation_id, terms.clone())
            .unwrap();

        let dialogue = dialogues.get(&cfp.correlation_id).unwrap();
        assert_eq!(dialogue.state(), DialogueState::Accepted);
        assert_eq!(dialogue.terms(), Some(&terms));
    }

    #[test]
    fn test_reply_illegal_performative() {
        let mut dialogues = manager();
        let (cfp, _) = dialogues
            .create(&AgentId::new("seller_1"), Performative::Cfp, cfp_payload())
            .unwrap();

        // Accept straight from CfpSent is not in the transition table
        let err = dialogues.reply(Performative::Accept, &cfp).unwrap_err();
        assert!(matches!(err, ParleyError::ProtocolViolation { .. }));
    }
}
