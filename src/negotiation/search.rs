//! Search session: discovery queries and CFP fan-out

use crate::dialogue::DialogueManager;
use crate::error::Result;
use crate::transport::{DirectoryClient, OutboundGateway};
use crate::types::{AgentId, Payload, Performative};

use super::round::NegotiationRound;
use super::strategy::StrategyPolicy;

/// Drives discovery and turns directory results into outbound CFPs
#[derive(Default)]
pub struct SearchSession {
    queries_issued: usize,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queries_issued(&self) -> usize {
        self.queries_issued
    }

    /// Issue a discovery query while the policy is still searching
    ///
    /// Idempotent under repeated invocation: each call while searching
    /// issues one more query, calls after the search stopped do nothing.
    pub fn start_search<P, D>(&mut self, policy: &P, directory: &mut D)
    where
        P: StrategyPolicy,
        D: DirectoryClient,
    {
        if !policy.is_searching() {
            return;
        }
        let query = policy.service_query();
        tracing::debug!(
            "searching for {}={}",
            query.search_key,
            query.search_value
        );
        directory.search(query);
        self.queries_issued += 1;
    }

    /// Handle a directory response: filter candidates, open one dialogue per
    /// accepted counterparty and fan out the CFPs. Returns how many were sent.
    pub fn on_search_result<P, G>(
        &mut self,
        candidates: &[AgentId],
        policy: &mut P,
        dialogues: &mut DialogueManager,
        round: &mut NegotiationRound,
        gateway: &mut G,
    ) -> Result<usize>
    where
        P: StrategyPolicy,
        G: OutboundGateway,
    {
        if candidates.is_empty() {
            tracing::info!("found no agents, continue searching");
            return Ok(0);
        }

        if policy.stop_on_first_result() {
            tracing::info!("found {} agents, stopping search", candidates.len());
            policy.set_searching(false);
        } else {
            tracing::info!("found {} agents", candidates.len());
        }

        let query = policy.service_query();
        let counterparties = policy.acceptable_counterparties(candidates);
        let mut sent = 0;
        for counterparty in &counterparties {
            let (cfp, _) = match dialogues.create(
                counterparty,
                Performative::Cfp,
                Payload::Query(query.clone()),
            ) {
                Ok(created) => created,
                Err(e) => {
                    // rejected candidates produce neither a sent entry nor a CFP
                    tracing::warn!("skipping candidate {}: {}", counterparty, e);
                    continue;
                }
            };
            round.record_sent(counterparty.clone());
            tracing::info!("sending CFP to agent={}", counterparty);
            gateway.send(cfp);
            sent += 1;
        }
        tracing::info!("CFPs sent to {} agents", sent);
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::negotiation::strategy::BuyerStrategy;
    use crate::transport::{RecordingDirectory, RecordingGateway};
    use crate::types::Query;

    fn setup() -> (SearchSession, BuyerStrategy, DialogueManager, NegotiationRound, RecordingGateway) {
        (
            SearchSession::new(),
            BuyerStrategy::new(Query::new("service", "car_park"), 20, 100),
            DialogueManager::new(AgentId::new("buyer")),
            NegotiationRound::new(),
            RecordingGateway::new(),
        )
    }

    #[test]
    fn test_start_search_issues_query_while_searching() {
        let (mut session, mut policy, _, _, _) = setup();
        let mut directory = RecordingDirectory::new();

        session.start_search(&policy, &mut directory);
        session.start_search(&policy, &mut directory);
        assert_eq!(directory.queries.len(), 2);
        assert_eq!(session.queries_issued(), 2);

        policy.set_searching(false);
        session.start_search(&policy, &mut directory);
        assert_eq!(directory.queries.len(), 2);
    }

    #[test]
    fn test_empty_result_is_benign() {
        let (mut session, mut policy, mut dialogues, mut round, mut gateway) = setup();

        let sent = session
            .on_search_result(&[], &mut policy, &mut dialogues, &mut round, &mut gateway)
            .unwrap();

        assert_eq!(sent, 0);
        assert!(policy.is_searching());
        assert!(round.sent().is_empty());
        assert!(gateway.sent.is_empty());
    }

    #[test]
    fn test_fanout_one_cfp_per_counterparty() {
        let (mut session, mut policy, mut dialogues, mut round, mut gateway) = setup();
        let candidates = vec![AgentId::new("x"), AgentId::new("y"), AgentId::new("z")];

        let sent = session
            .on_search_result(&candidates, &mut policy, &mut dialogues, &mut round, &mut gateway)
            .unwrap();

        assert_eq!(sent, 3);
        assert_eq!(round.sent(), candidates.as_slice());
        assert_eq!(gateway.sent.len(), 3);
        assert!(gateway
            .sent
            .iter()
            .all(|m| m.performative == Performative::Cfp));
        assert_eq!(dialogues.len(), 3);
    }

    #[test]
    fn test_stop_on_first_result_clears_searching() {
        let (mut session, mut policy, mut dialogues, mut round, mut gateway) = setup();
        assert!(policy.stop_on_first_result());

        session
            .on_search_result(
                &[AgentId::new("x")],
                &mut policy,
                &mut dialogues,
                &mut round,
                &mut gateway,
            )
            .unwrap();

        assert!(!policy.is_searching());
    }

    #[test]
    fn test_keep_searching_without_stop_flag() {
        let (mut session, _, mut dialogues, mut round, mut gateway) = setup();
        let mut policy = BuyerStrategy::new(Query::new("service", "car_park"), 20, 100)
            .with_stop_on_first_result(false);

        session
            .on_search_result(
                &[AgentId::new("x")],
                &mut policy,
                &mut dialogues,
                &mut round,
                &mut gateway,
            )
            .unwrap();

        assert!(policy.is_searching());
    }

    #[test]
    fn test_invalid_candidate_is_skipped() {
        let (mut session, mut policy, mut dialogues, mut round, mut gateway) = setup();
        // "buyer" passes the counterparty filter but is the local agent,
        // so dialogue creation refuses it
        let candidates = vec![AgentId::new("buyer"), AgentId::new("x")];

        let sent = session
            .on_search_result(&candidates, &mut policy, &mut dialogues, &mut round, &mut gateway)
            .unwrap();

        // the self candidate is refused by dialogue creation, not buffered
        assert_eq!(sent, 1);
        assert_eq!(round.sent(), &[AgentId::new("x")]);
        assert_eq!(gateway.sent.len(), 1);
    }
}
