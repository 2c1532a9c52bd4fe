//! Renders candidates and picks the affordances that go with them.

use spotiford_core::Track;

use super::{NUMBER_AFFORDANCES, REMOVE_AFFORDANCE, SAVE_AFFORDANCE};
use crate::chat::OutgoingMessage;
use crate::messages;

/// Upper bound on candidates in one presentation.
pub const MAX_CANDIDATES: usize = NUMBER_AFFORDANCES.len();

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PresentError {
    #[error("No candidates to present")]
    Empty,
    #[error("Cannot present {0} candidates (at most {MAX_CANDIDATES})")]
    TooMany(usize),
}

/// A message to send and the affordances to attach to it, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub message: OutgoingMessage,
    pub affordances: Vec<&'static str>,
}

/// List `tracks` under `label` with one keycap per position.
pub fn present_candidates(label: &str, tracks: &[Track]) -> Result<Presentation, PresentError> {
    if tracks.is_empty() {
        return Err(PresentError::Empty);
    }
    if tracks.len() > MAX_CANDIDATES {
        return Err(PresentError::TooMany(tracks.len()));
    }

    Ok(Presentation {
        message: messages::results_card(label, tracks).into(),
        affordances: NUMBER_AFFORDANCES[..tracks.len()].to_vec(),
    })
}

/// Show `track` with the single affordance that inverts its saved state.
pub fn present_toggle(track: &Track, saved: bool) -> Presentation {
    let affordance = if saved {
        REMOVE_AFFORDANCE
    } else {
        SAVE_AFFORDANCE
    };

    Presentation {
        message: messages::track_card(track).into(),
        affordances: vec![affordance],
    }
}
