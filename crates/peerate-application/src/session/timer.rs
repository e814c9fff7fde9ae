//! Session countdown scheduling.
//!
//! Each session has at most one live scheduled expiry. Re-arming aborts the previous task, and
//! the expiry handler still checks the staleness token captured at scheduling time, since an
//! abort cannot stop a firing that is already running.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::future::Future;
use std::time::Duration;
use tokio::task::AbortHandle;

#[derive(Default)]
pub struct SessionTimer {
    pending: DashMap<String, (DateTime<Utc>, AbortHandle)>,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `on_expiry` once after `delay`, replacing any expiry already scheduled for the
    /// session. `armed_at` identifies this arming.
    pub fn schedule<F>(
        &self,
        session_id: &str,
        armed_at: DateTime<Utc>,
        delay: Duration,
        on_expiry: F,
    ) where
        F: Future<Output = ()> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_expiry.await;
        });

        if let Some((_, (previous_at, previous))) = self.pending.remove(session_id) {
            tracing::debug!(session_id, %previous_at, "superseding scheduled expiry");
            previous.abort();
        }
        self.pending
            .insert(session_id.to_string(), (armed_at, task.abort_handle()));
        tracing::debug!(session_id, %armed_at, delay_ms = delay.as_millis() as u64, "expiry scheduled");
    }

    /// Forgets the bookkeeping entry of a firing that has run, if it is still the latest one.
    pub fn complete(&self, session_id: &str, armed_at: DateTime<Utc>) {
        self.pending
            .remove_if(session_id, |_, (at, _)| *at == armed_at);
    }

    /// Aborts any scheduled expiry for the session.
    pub fn cancel(&self, session_id: &str) {
        if let Some((_, (_, handle))) = self.pending.remove(session_id) {
            handle.abort();
        }
    }

    pub fn is_scheduled(&self, session_id: &str) -> bool {
        self.pending.contains_key(session_id)
    }
}
