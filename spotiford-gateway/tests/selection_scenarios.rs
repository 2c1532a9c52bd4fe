//! End-to-end selection flows driven through the command dispatcher.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{Action, RecordingChat, ScriptedMusic, track};
use spotiford_core::{ActorId, Track};
use spotiford_gateway::AppState;
use spotiford_gateway::chat::{ChannelRef, Invocation, MessageHandle, OutgoingMessage, ReactionEvent};
use spotiford_gateway::commands::handle_message;
use spotiford_gateway::messages;
use spotiford_gateway::selection::{NUMBER_AFFORDANCES, REMOVE_AFFORDANCE, SELECTION_TIMEOUT};

const ACTOR: ActorId = ActorId(314_159_265_358_979_323);

fn dm() -> Invocation {
    Invocation {
        actor: ACTOR,
        channel: ChannelRef(12),
        direct: true,
    }
}

fn daft_punk() -> Vec<Track> {
    vec![
        track("0DiWol3AO6WpXZgp0goxAV", "One More Time", "Discovery"),
        track("2VEZx7NWsZ1D0eJ4uv5Fym", "Digital Love", "Discovery"),
        track("69kOkLUCkxIZYexIgSG8rq", "Get Lucky", "Random Access Memories"),
    ]
}

/// Poll until the presentation carries `count` affordances.
async fn presentation(chat: &RecordingChat, count: usize) -> MessageHandle {
    loop {
        if let Some(handle) = chat.presented_with(count) {
            return handle;
        }
        tokio::task::yield_now().await;
    }
}

fn react(state: &AppState, actor: ActorId, symbol: &str, message: MessageHandle) -> bool {
    state.registry.dispatch_reaction(&ReactionEvent {
        actor,
        symbol: symbol.to_string(),
        message,
    })
}

#[tokio::test(start_paused = true)]
async fn scenario_a_second_pick_is_queued() {
    let music = Arc::new(ScriptedMusic::with_results(daft_punk()));
    let state = AppState::new(music.clone(), "-", 5);
    let chat = RecordingChat::default();

    let invocation = dm();
    let (result, presented) = tokio::join!(
        handle_message(&state, &chat, &invocation, "-queue Daft Punk"),
        async {
            let handle = presentation(&chat, 3).await;
            // Another user reacting first changes nothing.
            assert!(!react(&state, ActorId(1), NUMBER_AFFORDANCES[0], handle));
            tokio::time::sleep(Duration::from_secs(5)).await;
            assert!(react(&state, ACTOR, "2\u{fe0f}\u{20e3}", handle));
            handle
        }
    );
    result.unwrap();

    let tracks = daft_punk();
    assert_eq!(chat.attached(presented), NUMBER_AFFORDANCES[..3].to_vec());
    assert_eq!(music.actions(), vec![Action::Enqueue(ACTOR, tracks[1].uri.clone())]);
    assert_eq!(chat.deleted(), vec![presented]);

    let sent = chat.sent();
    assert_eq!(sent.len(), 2);
    match &sent[0].1 {
        OutgoingMessage::Card(card) => {
            assert_eq!(card.title, "Results for 'Daft Punk'");
            assert_eq!(card.fields[1].name, "#2 Daft Punk - Digital Love");
        }
        other => panic!("expected the results card, got {other:?}"),
    }
    assert_eq!(
        sent[1].1,
        OutgoingMessage::Card(messages::track_card(&tracks[1]))
    );
    assert_eq!(state.registry.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn scenario_b_no_reaction_times_out() {
    let music = Arc::new(ScriptedMusic::with_results(daft_punk()));
    let state = AppState::new(music.clone(), "-", 5);
    let chat = RecordingChat::default();

    let start = tokio::time::Instant::now();
    handle_message(&state, &chat, &dm(), "-queue Daft Punk")
        .await
        .unwrap();

    assert!(start.elapsed() >= SELECTION_TIMEOUT);
    assert!(music.actions().is_empty());
    let sent = chat.sent();
    assert_eq!(sent.len(), 1, "no confirmation after a timeout");
    assert_eq!(chat.deleted(), vec![sent[0].0]);
    assert_eq!(state.registry.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn scenario_c_saved_track_is_removed() {
    let digital_love = daft_punk()[1].clone();
    let music = Arc::new(ScriptedMusic::playing(digital_love.clone(), true));
    let state = AppState::new(music.clone(), "-", 5);
    let chat = RecordingChat::default();

    let invocation = dm();
    let (result, presented) = tokio::join!(
        handle_message(&state, &chat, &invocation, "-now"),
        async {
            let handle = presentation(&chat, 1).await;
            assert!(react(&state, ACTOR, REMOVE_AFFORDANCE, handle));
            handle
        }
    );
    result.unwrap();

    assert_eq!(chat.attached(presented), vec![REMOVE_AFFORDANCE.to_string()]);
    assert_eq!(music.actions(), vec![Action::Remove(ACTOR, digital_love.uri.clone())]);
    assert_eq!(chat.deleted(), vec![presented]);
    assert_eq!(
        chat.sent().last().map(|(_, message)| message.clone()),
        Some(OutgoingMessage::Text(
            "Removed Digital Love from your library.".to_string()
        ))
    );
}

#[tokio::test(start_paused = true)]
async fn concurrent_sessions_stay_isolated() {
    let music = Arc::new(ScriptedMusic::with_results(daft_punk()));
    let state = AppState::new(music.clone(), "-", 5);
    let chat_a = RecordingChat::default();
    let chat_b = RecordingChat::default();
    let other = Invocation {
        actor: ActorId(2718),
        channel: ChannelRef(13),
        direct: true,
    };

    let invocation = dm();
    let (a, b, _) = tokio::join!(
        handle_message(&state, &chat_a, &invocation, "-play Daft Punk"),
        handle_message(&state, &chat_b, &other, "-queue Daft Punk"),
        async {
            let handle_a = presentation(&chat_a, 3).await;
            let handle_b = presentation(&chat_b, 3).await;
            // Each actor can only resolve their own list.
            assert!(!react(&state, other.actor, NUMBER_AFFORDANCES[0], handle_a));
            assert!(react(&state, other.actor, NUMBER_AFFORDANCES[2], handle_b));
            assert!(react(&state, ACTOR, NUMBER_AFFORDANCES[0], handle_a));
        }
    );
    a.unwrap();
    b.unwrap();

    let tracks = daft_punk();
    let actions = music.actions();
    assert_eq!(actions.len(), 2);
    assert!(actions.contains(&Action::Play(ACTOR, Some(tracks[0].uri.clone()))));
    assert!(actions.contains(&Action::Enqueue(other.actor, tracks[2].uri.clone())));
}
