//! Walk one negotiation round by hand, with recording ports instead of a
//! live transport: search -> CFP fan-out -> proposals -> decision fan-out.
//!
//! Run with: cargo run --example round_demo

use parley::{
    AgentId, BuyerStrategy, Message, NegotiationEngine, Payload, Performative, ProposalValues,
    Query, RecordingDirectory, RecordingGateway,
};

fn propose(cfp: &Message, price: u64) -> Message {
    Message::new(
        Performative::Propose,
        cfp.correlation_id.clone(),
        cfp.to.clone(),
        cfp.sender.clone(),
        Payload::Proposal(ProposalValues::new().with("price", price).with("quantity", 1)),
    )
}

fn main() -> parley::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // a buyer that tolerates a unit price of 20 but only holds 12
    let strategy = BuyerStrategy::new(Query::new("seller_service", "car_park"), 20, 12);
    let mut engine = NegotiationEngine::new(
        AgentId::new("buyer"),
        strategy,
        RecordingGateway::new(),
        RecordingDirectory::new(),
    );

    // the directory answers with three candidates
    engine.start_search();
    let candidates = vec![AgentId::new("X"), AgentId::new("Y"), AgentId::new("Z")];
    let sent = engine.on_search_result(&candidates)?;
    println!("sent {} CFPs", sent);

    let cfps: Vec<Message> = engine.gateway_mut().sent.drain(..).collect();
    let cfp_for = |agent: &str| {
        cfps.iter()
            .find(|m| m.to == AgentId::new(agent))
            .expect("CFP was sent")
    };

    // proposals arrive: Y first at 9, X at 15 (over the balance of 12), Z at 11
    assert!(engine.on_message(propose(cfp_for("Y"), 9))?.is_none());
    assert!(engine.on_message(propose(cfp_for("X"), 15))?.is_none());
    let outcome = engine
        .on_message(propose(cfp_for("Z"), 11))?
        .expect("third proposal closes the barrier");

    let winner = outcome.winner.expect("Y is cheapest");
    println!(
        "winner: {} at price {} ({} declined)",
        winner.counterparty, winner.price, outcome.declined
    );

    for reply in &engine.gateway().sent {
        println!("  reply {} -> {}", reply.performative, reply.to);
    }

    Ok(())
}
