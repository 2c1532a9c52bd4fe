//! Turns a resolved session into exactly one streaming action.

use spotiford_core::{ActorId, Track};
use tracing::{debug, error, warn};

use super::Resolution;
use crate::chat::{ChatClient, ChatError, Invocation, MessageHandle, OutgoingMessage};
use crate::messages;
use crate::spotify::{MusicApi, MusicApiError};

/// What to do with the selected track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackIntent {
    Queue,
    Play,
    Save,
    Remove,
}

impl TrackIntent {
    async fn apply(
        self,
        api: &dyn MusicApi,
        actor: ActorId,
        track: &Track,
    ) -> Result<(), MusicApiError> {
        match self {
            Self::Queue => api.enqueue(actor, track).await,
            Self::Play => api.play(actor, Some(track)).await,
            Self::Save => api.save_track(actor, track).await,
            Self::Remove => api.remove_track(actor, track).await,
        }
    }

    pub fn confirmation(self, track: &Track) -> OutgoingMessage {
        match self {
            Self::Queue | Self::Play => messages::track_card(track).into(),
            Self::Save => messages::saved(track).into(),
            Self::Remove => messages::removed(track).into(),
        }
    }
}

/// How a session ended, as seen by the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteReport {
    Confirmed(MessageHandle),
    /// The action was refused upstream; nothing was reported.
    ActionFailed,
    TimedOut,
}

/// Retract the presentation, then apply `intent` to the selected candidate
/// and confirm it. A timeout only retracts.
pub async fn route(
    chat: &dyn ChatClient,
    api: &dyn MusicApi,
    invocation: &Invocation,
    presented: MessageHandle,
    outcome: Resolution,
    candidates: &[Track],
    intent: TrackIntent,
) -> Result<RouteReport, ChatError> {
    retract(chat, presented).await;

    let track = match outcome {
        Resolution::Selected(index) => match candidates.get(index) {
            Some(track) => track,
            None => {
                error!("Selection #{} outside of {} candidates", index + 1, candidates.len());
                return Ok(RouteReport::TimedOut);
            }
        },
        Resolution::TimedOut => return Ok(RouteReport::TimedOut),
    };

    if let Err(e) = intent.apply(api, invocation.actor, track).await {
        if e.is_benign() {
            warn!("{:?} of {} ignored: {}", intent, track.uri, e);
        } else {
            error!("{:?} of {} failed: {}", intent, track.uri, e);
        }
        return Ok(RouteReport::ActionFailed);
    }

    let handle = chat
        .send(invocation.channel, intent.confirmation(track))
        .await?;
    Ok(RouteReport::Confirmed(handle))
}

/// Best-effort removal of a presented message.
pub(super) async fn retract(chat: &dyn ChatClient, message: MessageHandle) {
    match chat.delete(message).await {
        Ok(()) => {}
        Err(ChatError::MessageGone(id)) => debug!("Message {} was already removed", id),
        Err(e) => warn!("Failed to retract message {}: {}", message.message_id, e),
    }
}
