//! Dialogue state machine and legal-transition table

use crate::error::{ParleyError, Result};
use crate::types::{AgentId, CorrelationId, Performative, Terms};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

/// Which side opened the dialogue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Initiator,
    Responder,
}

/// Per-dialogue state machine
///
/// `Init -> CfpSent -> ProposeReceived -> {Accepted | Declined}`, with the
/// last two terminal. Anything else is a protocol violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogueState {
    Init,
    CfpSent,
    ProposeReceived,
    Accepted,
    Declined,
}

impl DialogueState {
    /// Legal-transition table: the state reached by applying a performative,
    /// or None if the pair is not listed
    pub fn next(self, performative: Performative) -> Option<DialogueState> {
        match (self, performative) {
            (DialogueState::Init, Performative::Cfp) => Some(DialogueState::CfpSent),
            (DialogueState::CfpSent, Performative::Propose) => Some(DialogueState::ProposeReceived),
            (DialogueState::ProposeReceived, Performative::Accept) => {
                Some(DialogueState::Accepted)
            }
            (DialogueState::ProposeReceived, Performative::Decline) => {
                Some(DialogueState::Declined)
            }
            _ => None,
        }
    }

    /// Check if the dialogue is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, DialogueState::Accepted | DialogueState::Declined)
    }
}

impl fmt::Display for DialogueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DialogueState::Init => "Init",
            DialogueState::CfpSent => "CfpSent",
            DialogueState::ProposeReceived => "ProposeReceived",
            DialogueState::Accepted => "Accepted",
            DialogueState::Declined => "Declined",
        };
        write!(f, "{}", s)
    }
}

/// A correlated exchange of messages with one counterparty
#[derive(Clone, Debug)]
pub struct Dialogue {
    correlation_id: CorrelationId,
    self_agent: AgentId,
    counterparty: AgentId,
    role: Role,
    state: DialogueState,
    terms: Option<Terms>,
    _created_at: SystemTime,
}

impl Dialogue {
    pub fn new(
        correlation_id: CorrelationId,
        self_agent: AgentId,
        counterparty: AgentId,
        role: Role,
    ) -> Self {
        Self {
            correlation_id,
            self_agent,
            counterparty,
            role,
            state: DialogueState::Init,
            terms: None,
            _created_at: SystemTime::now(),
        }
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    pub fn self_agent(&self) -> &AgentId {
        &self.self_agent
    }

    pub fn counterparty(&self) -> &AgentId {
        &self.counterparty
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn terms(&self) -> Option<&Terms> {
        self.terms.as_ref()
    }

    /// Apply a performative, enforcing the legal-transition table
    pub fn advance(&mut self, performative: Performative) -> Result<()> {
        match self.state.next(performative) {
            Some(next) => {
                self.state = next;
                Ok(())
            }
            None => Err(ParleyError::ProtocolViolation {
                state: self.state.to_string(),
                performative: performative.to_string(),
            }),
        }
    }

    /// Record accepted terms; legal only once the dialogue is Accepted
    pub fn attach_terms(&mut self, terms: Terms) -> Result<()> {
        if self.state != DialogueState::Accepted {
            return Err(ParleyError::ProtocolViolation {
                state: self.state.to_string(),
                performative: "attach_terms".to_string(),
            });
        }
        if self.terms.is_some() {
            return Err(ParleyError::TermsAlreadyAttached(
                self.correlation_id.to_string(),
            ));
        }
        self.terms = Some(terms);
        Ok(())
    }
}
