//! Demo application: the engine negotiating with in-process counterparties
//!
//! Wires the engine into a single tokio task draining one event channel, so
//! every inbound event is handled to completion before the next one (the
//! single-owner discipline the round barrier relies on). Sellers, the
//! directory stub and the outbox router run as their own tasks connected by
//! unbounded channels.

use crate::error::Result;
use crate::negotiation::{BuyerStrategy, NegotiationEngine, RoundOutcome};
use crate::transport::{ChannelDirectory, ChannelGateway, InboundEvent};
use crate::types::{AgentId, Message, Payload, Performative, ProposalValues, Query};
use rand::Rng;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

/// Parameters of one simulated negotiation session
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    pub sellers: usize,
    pub max_price: u64,
    pub balance: u64,
    pub stop_on_first_result: bool,
    pub wait_secs: u64,
    pub silent: usize,
}

/// Run one negotiation session to completion
pub async fn run(config: SimulationConfig) -> Result<Option<RoundOutcome>> {
    let (inbound_tx, mut inbound_rx) = mpsc::unbounded_channel::<InboundEvent>();
    let (outbox_tx, mut outbox_rx) = mpsc::unbounded_channel::<Message>();
    let (query_tx, mut query_rx) = mpsc::unbounded_channel::<Query>();

    // seller tasks, each with a fixed asking price
    let mut seller_routes: HashMap<AgentId, mpsc::UnboundedSender<Message>> = HashMap::new();
    let mut seller_ids = Vec::new();
    let prices: Vec<u64> = {
        let low = (config.max_price / 2).max(1);
        let high = config.max_price.max(low);
        let mut rng = rand::thread_rng();
        (0..config.sellers).map(|_| rng.gen_range(low..=high)).collect()
    };
    for (i, price) in prices.into_iter().enumerate() {
        let id = AgentId::new(format!("seller_{}", i + 1));
        let silent = i < config.silent;
        let (tx, rx) = mpsc::unbounded_channel::<Message>();
        tokio::spawn(run_seller(id.clone(), price, silent, rx, inbound_tx.clone()));
        seller_routes.insert(id.clone(), tx);
        seller_ids.push(id);
    }

    // directory stub: every query returns the full seller list
    {
        let inbound_tx = inbound_tx.clone();
        let seller_ids = seller_ids.clone();
        tokio::spawn(async move {
            while let Some(query) = query_rx.recv().await {
                tracing::info!(
                    "directory lookup {}={}",
                    query.search_key,
                    query.search_value
                );
                let _ = inbound_tx.send(InboundEvent::SearchResult(seller_ids.clone()));
            }
        });
    }

    // outbox router: deliver engine messages to the addressed seller
    tokio::spawn(async move {
        while let Some(message) = outbox_rx.recv().await {
            match seller_routes.get(&message.to) {
                Some(tx) => {
                    let _ = tx.send(message);
                }
                None => tracing::warn!("no route to agent {}", message.to),
            }
        }
    });

    let strategy = BuyerStrategy::new(
        Query::new("seller_service", "generic_service"),
        config.max_price,
        config.balance,
    )
    .with_stop_on_first_result(config.stop_on_first_result);
    let mut engine = NegotiationEngine::new(
        AgentId::new("buyer"),
        strategy,
        ChannelGateway::new(outbox_tx),
        ChannelDirectory::new(query_tx),
    );

    engine.start_search();

    let deadline = tokio::time::sleep(Duration::from_secs(config.wait_secs));
    tokio::pin!(deadline);

    let outcome = loop {
        tokio::select! {
            event = inbound_rx.recv() => {
                let Some(event) = event else { break None };
                match engine.on_event(event) {
                    Ok(Some(outcome)) => break Some(outcome),
                    Ok(None) => {}
                    Err(e) => tracing::warn!("message dropped: {}", e),
                }
            }
            _ = &mut deadline => {
                tracing::info!("waiting for proposals timed out, making decision...");
                break engine.force_decision()?;
            }
        }
    };

    match &outcome {
        Some(RoundOutcome {
            winner: Some(terms),
            declined,
        }) => {
            tracing::info!(
                "accepted {} at price {} (declined {} others)",
                terms.counterparty,
                terms.price,
                declined
            );
            println!("{}", serde_json::to_string_pretty(terms)?);
        }
        Some(RoundOutcome { winner: None, .. }) => {
            tracing::info!("no acceptable proposal this round");
        }
        None => tracing::info!("round did not complete"),
    }

    Ok(outcome)
}

/// A seller answering CFPs with a fixed-price proposal
async fn run_seller(
    id: AgentId,
    price: u64,
    silent: bool,
    mut rx: mpsc::UnboundedReceiver<Message>,
    inbound_tx: mpsc::UnboundedSender<InboundEvent>,
) {
    while let Some(message) = rx.recv().await {
        match message.performative {
            Performative::Cfp => {
                if silent {
                    tracing::info!("{} ignores the CFP", id);
                    continue;
                }
                tracing::info!("{} proposes price={}", id, price);
                let proposal = Message::new(
                    Performative::Propose,
                    message.correlation_id.clone(),
                    id.clone(),
                    message.sender.clone(),
                    Payload::Proposal(
                        ProposalValues::new().with("price", price).with("quantity", 1),
                    ),
                );
                let _ = inbound_tx.send(InboundEvent::Message(proposal));
            }
            Performative::Accept => {
                tracing::info!("{} got the deal", id);
            }
            Performative::Decline => {
                tracing::info!("{} was declined", id);
            }
            Performative::Propose => {
                tracing::warn!("{} received an unexpected PROPOSE", id);
            }
        }
    }
}
