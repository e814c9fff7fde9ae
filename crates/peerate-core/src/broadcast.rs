//! Broadcast gateway trait.
//!
//! The gateway is the publish-to-room mechanism owned by the transport layer. The rating engine
//! only ever pushes through it and treats every send as fire-and-forget.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle identifying one client connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for ConnectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait BroadcastGateway: Send + Sync {
    /// Subscribes `connection` to everything sent to the session's room.
    async fn join_room(&self, connection: &ConnectionId, session_id: &str) -> Result<()>;

    /// Sends to every connection in the session's room.
    async fn send_to_room(
        &self,
        session_id: &str,
        event_name: &str,
        payload: serde_json::Value,
    ) -> Result<()>;

    /// Sends to a single connection.
    async fn send_to_connection(
        &self,
        connection: &ConnectionId,
        event_name: &str,
        payload: serde_json::Value,
    ) -> Result<()>;
}
