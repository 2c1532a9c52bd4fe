//! Pending selection sessions and the single-shot wait for a reaction.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use spotiford_core::ActorId;
use tokio::sync::oneshot;
use tracing::debug;
use uuid::Uuid;

use crate::chat::{MessageHandle, ReactionEvent};

/// Time an actor has to pick an affordance. Not extended by other events.
pub const SELECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Terminal outcome of a selection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Position of the chosen affordance
    Selected(usize),
    TimedOut,
}

struct PendingEntry {
    actor: ActorId,
    message: MessageHandle,
    affordances: Vec<String>,
    resolve: oneshot::Sender<usize>,
}

impl PendingEntry {
    fn position_of(&self, event: &ReactionEvent) -> Option<usize> {
        if event.actor != self.actor || event.message != self.message {
            return None;
        }
        let symbol = normalize_symbol(&event.symbol);
        self.affordances.iter().position(|a| *a == symbol)
    }
}

/// Emoji arrive with or without the U+FE0F presentation selector depending on
/// the client, so comparisons ignore it.
fn normalize_symbol(symbol: &str) -> String {
    symbol.chars().filter(|c| *c != '\u{fe0f}').collect()
}

/// Routes reaction events to the session waiting for them.
///
/// Each entry is removed exactly once: by the qualifying reaction, by the
/// deletion of its message, or when its [`PendingSelection`] is dropped.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, PendingEntry>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session for `message`. Call before attaching affordances so
    /// that an early reaction is not lost.
    pub fn begin<S: AsRef<str>>(
        &self,
        actor: ActorId,
        message: MessageHandle,
        affordances: &[S],
    ) -> PendingSelection<'_> {
        let (tx, rx) = oneshot::channel();
        let id = Uuid::new_v4();
        let entry = PendingEntry {
            actor,
            message,
            affordances: affordances
                .iter()
                .map(|a| normalize_symbol(a.as_ref()))
                .collect(),
            resolve: tx,
        };

        self.sessions
            .lock()
            .expect("SessionRegistry lock poisoned")
            .insert(id, entry);
        debug!(
            "[selection:{}] registered for user {} on message {}",
            id, actor, message.message_id
        );

        PendingSelection {
            registry: self,
            id,
            rx,
        }
    }

    /// Deliver a reaction. Returns `true` when it resolved a session.
    pub fn dispatch_reaction(&self, event: &ReactionEvent) -> bool {
        let mut sessions = self.sessions.lock().expect("SessionRegistry lock poisoned");
        let matched = sessions
            .iter()
            .find_map(|(id, entry)| entry.position_of(event).map(|index| (*id, index)));

        let Some((id, index)) = matched else {
            return false;
        };
        let Some(entry) = sessions.remove(&id) else {
            return false;
        };
        drop(sessions);

        debug!("[selection:{}] resolved with affordance #{}", id, index + 1);
        // The waiter may have timed out between the lookup and the send.
        entry.resolve.send(index).is_ok()
    }

    /// Abandon every session presented on `message`. Their waiters resolve to
    /// [`Resolution::TimedOut`] immediately.
    pub fn message_deleted(&self, message: MessageHandle) -> usize {
        let mut sessions = self.sessions.lock().expect("SessionRegistry lock poisoned");
        let before = sessions.len();
        sessions.retain(|_, entry| entry.message != message);
        let removed = before - sessions.len();
        if removed > 0 {
            debug!(
                "Message {} deleted, abandoned {} pending selection(s)",
                message.message_id, removed
            );
        }
        removed
    }

    pub fn pending_count(&self) -> usize {
        self.sessions
            .lock()
            .expect("SessionRegistry lock poisoned")
            .len()
    }

    fn remove(&self, id: &Uuid) {
        self.sessions
            .lock()
            .expect("SessionRegistry lock poisoned")
            .remove(id);
    }
}

/// Handle on one registered session. Dropping it unregisters the session.
pub struct PendingSelection<'a> {
    registry: &'a SessionRegistry,
    id: Uuid,
    rx: oneshot::Receiver<usize>,
}

impl PendingSelection<'_> {
    /// Wait up to [`SELECTION_TIMEOUT`] for the qualifying reaction.
    pub async fn wait(mut self) -> Resolution {
        match tokio::time::timeout(SELECTION_TIMEOUT, &mut self.rx).await {
            Ok(Ok(index)) => Resolution::Selected(index),
            Ok(Err(_)) => {
                debug!("[selection:{}] abandoned", self.id);
                Resolution::TimedOut
            }
            Err(_) => {
                debug!("[selection:{}] timed out", self.id);
                Resolution::TimedOut
            }
        }
    }
}

impl Drop for PendingSelection<'_> {
    fn drop(&mut self) {
        self.registry.remove(&self.id);
    }
}
