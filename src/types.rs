//! Core types used throughout Parley

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Identifier of an agent (local or counterparty)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation identifier tying all messages of one dialogue together
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    /// Generate a fresh correlation id (timestamp plus random suffix)
    pub fn generate() -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_millis();
        let suffix: u32 = rand::random();

        Self(format!("dlg_{}_{:08x}", timestamp, suffix))
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Speech-act tag of a negotiation message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Performative {
    Cfp,
    Propose,
    Accept,
    Decline,
}

impl fmt::Display for Performative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Performative::Cfp => "CFP",
            Performative::Propose => "PROPOSE",
            Performative::Accept => "ACCEPT",
            Performative::Decline => "DECLINE",
        };
        write!(f, "{}", s)
    }
}

/// Service query handed to the directory service (opaque to the core)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub search_key: String,
    pub search_value: String,
}

impl Query {
    pub fn new(search_key: impl Into<String>, search_value: impl Into<String>) -> Self {
        Self {
            search_key: search_key.into(),
            search_value: search_value.into(),
        }
    }
}

/// Attribute set of a PROPOSE message; only the strategy reads it
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalValues(pub BTreeMap<String, u64>);

impl ProposalValues {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, key: impl Into<String>, value: u64) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.0.get(key).copied()
    }

    /// The price attribute, if present
    pub fn price(&self) -> Option<u64> {
        self.get("price")
    }
}

/// Terms derived for an accepted proposal
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terms {
    pub counterparty: AgentId,
    pub price: u64,
    pub quantity: u64,
}

/// Body of a negotiation message
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// CFP: the service query
    Query(Query),
    /// PROPOSE: the proposed attribute set
    Proposal(ProposalValues),
    /// ACCEPT / DECLINE carry no body
    Empty,
}

/// Message envelope exchanged between agents
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub performative: Performative,
    pub correlation_id: CorrelationId,
    pub sender: AgentId,
    pub to: AgentId,
    pub payload: Payload,
}

impl Message {
    pub fn new(
        performative: Performative,
        correlation_id: CorrelationId,
        sender: AgentId,
        to: AgentId,
        payload: Payload,
    ) -> Self {
        Self {
            performative,
            correlation_id,
            sender,
            to,
            payload,
        }
    }

    /// Proposal values of a PROPOSE message, if any
    pub fn proposal_values(&self) -> Option<&ProposalValues> {
        match &self.payload {
            Payload::Proposal(values) => Some(values),
            _ => None,
        }
    }
}
