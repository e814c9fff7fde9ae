//! Channel-backed broadcast gateway.
//!
//! Each connection owns an unbounded channel; the transport drains the receiver and writes the
//! messages to its socket. Rooms are sets of connections keyed by session ID.

use async_trait::async_trait;
use peerate_core::broadcast::{BroadcastGateway, ConnectionId};
use peerate_core::error::{PeerateError, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tokio::sync::{RwLock, mpsc};

/// One message queued for a connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub event: String,
    pub payload: serde_json::Value,
}

pub type OutboundReceiver = mpsc::UnboundedReceiver<OutboundMessage>;

#[derive(Default)]
pub struct ChannelBroadcaster {
    connections: RwLock<HashMap<ConnectionId, mpsc::UnboundedSender<OutboundMessage>>>,
    rooms: RwLock<HashMap<String, HashSet<ConnectionId>>>,
}

impl ChannelBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection and returns its handle and message stream.
    pub async fn connect(&self) -> (ConnectionId, OutboundReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::new();
        self.connections.write().await.insert(id.clone(), tx);
        tracing::debug!(connection = %id, "connection registered");
        (id, rx)
    }

    /// Forgets a connection and removes it from every room.
    pub async fn disconnect(&self, connection: &ConnectionId) {
        self.connections.write().await.remove(connection);
        let mut rooms = self.rooms.write().await;
        for members in rooms.values_mut() {
            members.remove(connection);
        }
        rooms.retain(|_, members| !members.is_empty());
        tracing::debug!(connection = %connection, "connection removed");
    }

    pub async fn room_size(&self, session_id: &str) -> usize {
        self.rooms
            .read()
            .await
            .get(session_id)
            .map(HashSet::len)
            .unwrap_or(0)
    }

    async fn deliver(&self, connection: &ConnectionId, message: OutboundMessage) -> bool {
        let connections = self.connections.read().await;
        match connections.get(connection) {
            Some(tx) => tx.send(message).is_ok(),
            None => false,
        }
    }
}

#[async_trait]
impl BroadcastGateway for ChannelBroadcaster {
    async fn join_room(&self, connection: &ConnectionId, session_id: &str) -> Result<()> {
        if !self.connections.read().await.contains_key(connection) {
            return Err(PeerateError::not_found("Connection", connection.to_string()));
        }
        self.rooms
            .write()
            .await
            .entry(session_id.to_string())
            .or_default()
            .insert(connection.clone());
        Ok(())
    }

    async fn send_to_room(
        &self,
        session_id: &str,
        event_name: &str,
        payload: serde_json::Value,
    ) -> Result<()> {
        let members: Vec<ConnectionId> = match self.rooms.read().await.get(session_id) {
            Some(members) => members.iter().cloned().collect(),
            None => return Ok(()),
        };

        let mut closed = Vec::new();
        for member in members {
            let message = OutboundMessage {
                event: event_name.to_string(),
                payload: payload.clone(),
            };
            if !self.deliver(&member, message).await {
                closed.push(member);
            }
        }

        for member in &closed {
            tracing::warn!(session_id, connection = %member, event = event_name, "dropping closed connection");
            self.disconnect(member).await;
        }
        Ok(())
    }

    async fn send_to_connection(
        &self,
        connection: &ConnectionId,
        event_name: &str,
        payload: serde_json::Value,
    ) -> Result<()> {
        let message = OutboundMessage {
            event: event_name.to_string(),
            payload,
        };
        if self.deliver(connection, message).await {
            Ok(())
        } else {
            self.disconnect(connection).await;
            Err(PeerateError::not_found("Connection", connection.to_string()))
        }
    }
}
