//! Which connection joined which session, and as whom.

use dashmap::DashMap;
use peerate_core::broadcast::ConnectionId;
use peerate_core::session::Viewer;

#[derive(Default)]
pub struct ConnectionDirectory {
    sessions: DashMap<String, Vec<(ConnectionId, Viewer)>>,
}

impl ConnectionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `connection` as `viewer` in `session_id`. Re-joining replaces the earlier entry.
    pub fn register(&self, session_id: &str, connection: ConnectionId, viewer: Viewer) {
        let mut members = self.sessions.entry(session_id.to_string()).or_default();
        members.retain(|(existing, _)| *existing != connection);
        members.push((connection, viewer));
    }

    pub fn members(&self, session_id: &str) -> Vec<(ConnectionId, Viewer)> {
        self.sessions
            .get(session_id)
            .map(|members| members.clone())
            .unwrap_or_default()
    }

    /// Forgets `connection` in every session.
    pub fn remove(&self, connection: &ConnectionId) {
        for mut members in self.sessions.iter_mut() {
            members.retain(|(existing, _)| existing != connection);
        }
        self.sessions.retain(|_, members| !members.is_empty());
    }
}
