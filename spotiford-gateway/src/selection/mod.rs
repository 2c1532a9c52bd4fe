//! Interactive track selection.
//!
//! A session presents candidates, attaches one affordance per choice and
//! waits for the invoking actor to react. The first qualifying reaction (or
//! the deadline) resolves it, and the router carries out exactly one action.

mod presenter;
mod router;
mod toggle;
mod waiter;

use spotiford_core::Track;

use crate::chat::{ChatClient, ChatError, Invocation};
use crate::spotify::{MusicApi, MusicApiError};

pub use presenter::{MAX_CANDIDATES, PresentError, Presentation, present_candidates, present_toggle};
pub use router::{RouteReport, TrackIntent, route};
pub use toggle::run_toggle;
pub use waiter::{PendingSelection, Resolution, SELECTION_TIMEOUT, SessionRegistry};

/// Keycaps 1 to 5, one per candidate position.
pub const NUMBER_AFFORDANCES: [&str; 5] = [
    "1\u{20e3}",
    "2\u{20e3}",
    "3\u{20e3}",
    "4\u{20e3}",
    "5\u{20e3}",
];
/// Heart: add the track to the library.
pub const SAVE_AFFORDANCE: &str = "\u{2764}";
/// Broken heart: remove the track from the library.
pub const REMOVE_AFFORDANCE: &str = "\u{1f494}";

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error(transparent)]
    Present(#[from] PresentError),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error(transparent)]
    Api(#[from] MusicApiError),
}

/// Collaborators a session runs against.
#[derive(Clone, Copy)]
pub struct SelectionContext<'a> {
    pub chat: &'a dyn ChatClient,
    pub api: &'a dyn MusicApi,
    pub registry: &'a SessionRegistry,
}

impl SelectionContext<'_> {
    /// Send `presentation`, attach its affordances in order, wait for the
    /// actor and route the outcome to `intent`.
    pub(crate) async fn run(
        &self,
        invocation: &Invocation,
        presentation: Presentation,
        candidates: &[Track],
        intent: TrackIntent,
    ) -> Result<RouteReport, SelectionError> {
        let handle = self
            .chat
            .send(invocation.channel, presentation.message)
            .await?;
        let pending = self
            .registry
            .begin(invocation.actor, handle, presentation.affordances.as_slice());

        for affordance in &presentation.affordances {
            if let Err(e) = self.chat.attach_affordance(handle, affordance).await {
                drop(pending);
                router::retract(self.chat, handle).await;
                return Err(e.into());
            }
        }

        let outcome = pending.wait().await;
        Ok(route(
            self.chat,
            self.api,
            invocation,
            handle,
            outcome,
            candidates,
            intent,
        )
        .await?)
    }

    /// Let the actor pick one of `candidates` (found for `label`) and apply
    /// `intent` to it.
    pub async fn select_track(
        &self,
        invocation: &Invocation,
        label: &str,
        candidates: &[Track],
        intent: TrackIntent,
    ) -> Result<RouteReport, SelectionError> {
        let presentation = present_candidates(label, candidates)?;
        self.run(invocation, presentation, candidates, intent).await
    }
}
