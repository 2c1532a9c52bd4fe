use tracing::{debug, info, warn};

use super::{Command, CommandParseError, GuardOutcome};
use crate::chat::{ChatClient, ChatError, Invocation};
use crate::messages;
use crate::selection::{MAX_CANDIDATES, SelectionError, TrackIntent, run_toggle};
use crate::spotify::{MusicApiError, parse_redirect_code};
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),
    #[error("Streaming service error: {0}")]
    Api(#[from] MusicApiError),
    #[error("Selection failed: {0}")]
    Selection(#[from] SelectionError),
}

/// Parse `content`, run the guards and execute the command it names.
/// Messages without the command prefix are ignored.
pub async fn handle_message(
    state: &AppState,
    chat: &dyn ChatClient,
    invocation: &Invocation,
    content: &str,
) -> Result<(), CommandError> {
    let command = match Command::parse(&state.command_prefix, content) {
        None => return Ok(()),
        Some(Ok(command)) => command,
        Some(Err(e)) => {
            let reply = if !invocation.direct {
                messages::DM_ONLY.to_string()
            } else {
                match e {
                    CommandParseError::Unknown(name) => {
                        messages::unknown_command(&state.command_prefix, &name)
                    }
                    CommandParseError::MissingArgument { usage } => {
                        messages::missing_argument(&state.command_prefix, usage)
                    }
                }
            };
            chat.send(invocation.channel, reply.into()).await?;
            return Ok(());
        }
    };

    info!(
        "Command {} from user {} in channel {}",
        command.name(),
        invocation.actor,
        invocation.channel.0
    );

    for guard in &state.guards {
        if let GuardOutcome::Reject(reason) = guard
            .check(invocation, &command, state.api.as_ref())
            .await?
        {
            debug!("Command {} rejected: {}", command.name(), reason);
            chat.send(invocation.channel, reason.into()).await?;
            return Ok(());
        }
    }

    run_command(state, chat, invocation, command).await
}

async fn run_command(
    state: &AppState,
    chat: &dyn ChatClient,
    invocation: &Invocation,
    command: Command,
) -> Result<(), CommandError> {
    let api = state.api.as_ref();
    let actor = invocation.actor;
    let prefix = state.command_prefix.as_str();

    match command {
        Command::Help => {
            chat.send(invocation.channel, messages::help(prefix).into())
                .await?;
        }
        Command::Login => {
            let reply = messages::login_prompt(&api.authorize_url());
            chat.send(invocation.channel, reply.into()).await?;
        }
        Command::Connect(url) => {
            let Some(code) = parse_redirect_code(&url) else {
                chat.send(invocation.channel, messages::INVALID_RESPONSE_URL.into())
                    .await?;
                return Ok(());
            };
            match api.link_account(actor, &code).await {
                Ok(profile) => {
                    chat.send(invocation.channel, messages::profile_card(&profile).into())
                        .await?;
                }
                Err(e) => {
                    warn!("Authorization for user {} failed: {}", actor, e);
                    chat.send(
                        invocation.channel,
                        messages::authorization_failed(prefix).into(),
                    )
                    .await?;
                }
            }
        }
        Command::Account => {
            let profile = api.current_user(actor).await?;
            chat.send(invocation.channel, messages::profile_card(&profile).into())
                .await?;
        }
        Command::Now => match api.currently_playing(actor).await? {
            Some(track) => {
                let report = run_toggle(&state.selection(chat), invocation, &track).await?;
                debug!("Like/unlike for user {} ended: {:?}", actor, report);
            }
            None => {
                chat.send(invocation.channel, messages::NOTHING_PLAYING.into())
                    .await?;
            }
        },
        Command::Play(None) => swallow_benign("play", api.play(actor, None).await)?,
        Command::Play(Some(query)) => {
            search_and_select(state, chat, invocation, &query, TrackIntent::Play).await?
        }
        Command::Queue(query) => {
            search_and_select(state, chat, invocation, &query, TrackIntent::Queue).await?
        }
        Command::Pause => swallow_benign("pause", api.pause(actor).await)?,
        Command::Next => swallow_benign("next", api.skip_next(actor).await)?,
        Command::Previous => swallow_benign("previous", api.skip_previous(actor).await)?,
    }

    Ok(())
}

async fn search_and_select(
    state: &AppState,
    chat: &dyn ChatClient,
    invocation: &Invocation,
    query: &str,
    intent: TrackIntent,
) -> Result<(), CommandError> {
    let mut tracks = state.api.search_tracks(query, state.search_limit).await?;
    if tracks.is_empty() {
        chat.send(invocation.channel, messages::no_results(query).into())
            .await?;
        return Ok(());
    }
    tracks.truncate(MAX_CANDIDATES);

    let report = state
        .selection(chat)
        .select_track(invocation, query, &tracks, intent)
        .await?;
    debug!(
        "{:?} selection for user {} ended: {:?}",
        intent, invocation.actor, report
    );
    Ok(())
}

/// The service refuses redundant player commands (already playing, nothing
/// to skip to); those are not worth reporting.
fn swallow_benign(action: &str, result: Result<(), MusicApiError>) -> Result<(), MusicApiError> {
    match result {
        Err(e) if e.is_benign() => {
            warn!("Ignoring refused {}: {}", action, e);
            Ok(())
        }
        other => other,
    }
}
