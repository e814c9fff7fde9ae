//! Delivery of events and revealed results through the broadcast gateway.
//!
//! Every send is fire-and-forget: failures are logged and never propagate into the mutation that
//! produced them. A connection the gateway no longer knows is dropped from the directory.

use super::connections::ConnectionDirectory;
use peerate_core::broadcast::{BroadcastGateway, ConnectionId};
use peerate_core::session::{PlayerResults, Reveal, RoundEvent, Viewer};
use std::sync::Arc;

pub struct RevealDispatcher {
    gateway: Arc<dyn BroadcastGateway>,
    directory: Arc<ConnectionDirectory>,
}

impl RevealDispatcher {
    pub fn new(gateway: Arc<dyn BroadcastGateway>, directory: Arc<ConnectionDirectory>) -> Self {
        Self { gateway, directory }
    }

    pub async fn publish(&self, session_id: &str, event: &RoundEvent) {
        let payload = match event.payload() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(session_id, event = event.name(), "failed to encode event: {}", e);
                return;
            }
        };
        if let Err(e) = self
            .gateway
            .send_to_room(session_id, event.name(), payload)
            .await
        {
            tracing::warn!(session_id, event = event.name(), "room broadcast failed: {}", e);
        }
    }

    pub async fn send_private(&self, session_id: &str, connection: &ConnectionId, event: &RoundEvent) {
        let payload = match event.payload() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(session_id, event = event.name(), "failed to encode event: {}", e);
                return;
            }
        };
        if let Err(e) = self
            .gateway
            .send_to_connection(connection, event.name(), payload)
            .await
        {
            if e.is_not_found() {
                self.directory.remove(connection);
            }
            tracing::warn!(
                session_id,
                connection = %connection,
                event = event.name(),
                "private send failed: {}",
                e
            );
        }
    }

    /// Delivers a reveal to its audience.
    pub async fn dispatch(&self, session_id: &str, reveal: Reveal) {
        match reveal {
            Reveal::Ledger { ratings, complete } => {
                tracing::debug!(session_id, ratings = ratings.len(), complete, "broadcasting ledger");
                self.publish(session_id, &RoundEvent::Results { ratings, complete })
                    .await;
            }
            Reveal::Private { results } => {
                let members = self.directory.members(session_id);
                tracing::debug!(session_id, connections = members.len(), "sending private results");
                for (connection, viewer) in members {
                    match viewer {
                        Viewer::Participant(name) => {
                            let Some(own) = find_own(&results, &name) else {
                                continue;
                            };
                            let event = RoundEvent::PrivateResults {
                                results: own.clone(),
                            };
                            self.send_private(session_id, &connection, &event).await;
                        }
                        Viewer::Admin => {
                            let event = RoundEvent::AdminResults {
                                results: results.clone(),
                            };
                            self.send_private(session_id, &connection, &event).await;
                        }
                    }
                }
            }
        }
    }
}

fn find_own<'a>(results: &'a [PlayerResults], name: &str) -> Option<&'a PlayerResults> {
    results.iter().find(|r| r.participant == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use peerate_core::error::{PeerateError, Result};
    use peerate_core::session::TopicAverage;
    use serde_json::Value;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Mutex;

    // Mock gateway that only knows live connections
    #[derive(Default)]
    struct LiveGateway {
        live: HashSet<ConnectionId>,
        delivered: Mutex<Vec<ConnectionId>>,
    }

    #[async_trait]
    impl BroadcastGateway for LiveGateway {
        async fn join_room(&self, _connection: &ConnectionId, _session_id: &str) -> Result<()> {
            Ok(())
        }

        async fn send_to_room(&self, _session_id: &str, _event_name: &str, _payload: Value) -> Result<()> {
            Ok(())
        }

        async fn send_to_connection(
            &self,
            connection: &ConnectionId,
            _event_name: &str,
            _payload: Value,
        ) -> Result<()> {
            if !self.live.contains(connection) {
                return Err(PeerateError::not_found("Connection", connection.to_string()));
            }
            self.delivered.lock().unwrap().push(connection.clone());
            Ok(())
        }
    }

    fn results_for(name: &str) -> PlayerResults {
        PlayerResults {
            participant: name.to_string(),
            topic_averages: BTreeMap::from([("x".to_string(), TopicAverage::Score(5.0))]),
            total_average: TopicAverage::Score(5.0),
            skipped_counts: BTreeMap::from([("x".to_string(), 0)]),
        }
    }

    #[tokio::test]
    async fn test_private_dispatch_forgets_closed_connections() {
        let open = ConnectionId::from("c-open".to_string());
        let closed = ConnectionId::from("c-closed".to_string());
        let gateway = Arc::new(LiveGateway {
            live: HashSet::from([open.clone()]),
            ..Default::default()
        });
        let directory = Arc::new(ConnectionDirectory::new());
        directory.register("s1", open.clone(), Viewer::Participant("a".into()));
        directory.register("s1", closed.clone(), Viewer::Participant("b".into()));
        let dispatcher = RevealDispatcher::new(gateway.clone(), directory.clone());

        let reveal = Reveal::Private {
            results: vec![results_for("a"), results_for("b")],
        };
        dispatcher.dispatch("s1", reveal).await;

        assert_eq!(*gateway.delivered.lock().unwrap(), vec![open.clone()]);
        assert_eq!(
            directory.members("s1"),
            vec![(open, Viewer::Participant("a".into()))]
        );
    }
}
