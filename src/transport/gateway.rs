//! Outbound ports of the negotiation engine
//!
//! Both ports are fire-and-forget: the engine never observes delivery
//! failure for its own outbound traffic, and no retry happens here.

use crate::types::{AgentId, Message, Query};
use tokio::sync::mpsc;

/// Events delivered to the engine by whatever hosts it
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// Directory response: candidate counterparties, possibly empty
    SearchResult(Vec<AgentId>),
    /// A negotiation message from a counterparty
    Message(Message),
}

/// One-way hand-off of constructed messages to the transport
pub trait OutboundGateway {
    fn send(&mut self, message: Message);
}

/// One-way hand-off of service queries to the directory service
pub trait DirectoryClient {
    fn search(&mut self, query: Query);
}

/// Gateway backed by an unbounded channel; dropped receivers are ignored
pub struct ChannelGateway {
    tx: mpsc::UnboundedSender<Message>,
}

impl ChannelGateway {
    pub fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self { tx }
    }
}

impl OutboundGateway for ChannelGateway {
    fn send(&mut self, message: Message) {
        if self.tx.send(message).is_err() {
            tracing::warn!("outbound channel closed, message dropped");
        }
    }
}

/// Directory client backed by an unbounded channel
pub struct ChannelDirectory {
    tx: mpsc::UnboundedSender<Query>,
}

impl ChannelDirectory {
    pub fn new(tx: mpsc::UnboundedSender<Query>) -> Self {
        Self { tx }
    }
}

impl DirectoryClient for ChannelDirectory {
    fn search(&mut self, query: Query) {
        if self.tx.send(query).is_err() {
            tracing::warn!("directory channel closed, query dropped");
        }
    }
}

/// Gateway that records everything it is handed; used by tests and demos
#[derive(Default)]
pub struct RecordingGateway {
    pub sent: Vec<Message>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutboundGateway for RecordingGateway {
    fn send(&mut self, message: Message) {
        self.sent.push(message);
    }
}

/// Directory client that records queries; used by tests and demos
#[derive(Default)]
pub struct RecordingDirectory {
    pub queries: Vec<Query>,
}

impl RecordingDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DirectoryClient for RecordingDirectory {
    fn search(&mut self, query: Query) {
        self.queries.push(query);
    }
}
