//! Per-session mutual exclusion.
//!
//! Every read-modify-write cycle on a session runs while holding that session's gate. Gates for
//! different sessions are independent; the map itself is sharded so lookups for unrelated
//! sessions do not contend.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type GateMap = DashMap<String, Arc<Mutex<()>>>;

#[derive(Default, Clone)]
pub struct SessionGate {
    gates: Arc<GateMap>,
}

/// Held for the duration of one mutation. Dropping it releases the session.
pub struct SessionGuard {
    guard: Option<OwnedMutexGuard<()>>,
    gates: Arc<GateMap>,
    session_id: String,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other mutation of `session_id` is in flight.
    pub async fn acquire(&self, session_id: &str) -> SessionGuard {
        let gate = self
            .gates
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let guard = gate.lock_owned().await;
        SessionGuard {
            guard: Some(guard),
            gates: Arc::clone(&self.gates),
            session_id: session_id.to_string(),
        }
    }

    /// Number of sessions with a holder or waiter.
    pub fn active(&self) -> usize {
        self.gates.len()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map still references an idle gate.
        self.gates
            .remove_if(&self.session_id, |_, gate| Arc::strong_count(gate) == 1);
    }
}
