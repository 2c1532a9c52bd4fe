//! Like/unlike on a single track.

use spotiford_core::Track;

use super::{RouteReport, SelectionContext, SelectionError, TrackIntent, present_toggle};
use crate::chat::Invocation;

/// Show `track` with a heart (not saved yet) or a broken heart (saved), and
/// flip its saved state when the actor picks it.
pub async fn run_toggle(
    ctx: &SelectionContext<'_>,
    invocation: &Invocation,
    track: &Track,
) -> Result<RouteReport, SelectionError> {
    let saved = ctx.api.is_saved(invocation.actor, track).await?;
    let intent = if saved {
        TrackIntent::Remove
    } else {
        TrackIntent::Save
    };

    ctx.run(
        invocation,
        present_toggle(track, saved),
        std::slice::from_ref(track),
        intent,
    )
    .await
}
