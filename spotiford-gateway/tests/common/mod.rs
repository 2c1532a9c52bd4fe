//! In-memory chat platform and streaming service for scenario tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use spotiford_core::{ActorId, Track, UserProfile};
use spotiford_gateway::chat::{ChannelRef, ChatClient, ChatError, MessageHandle, OutgoingMessage};
use spotiford_gateway::spotify::{MusicApi, MusicApiError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Sent(MessageHandle, OutgoingMessage),
    Deleted(MessageHandle),
    Attached(MessageHandle, String),
}

/// Chat client that records everything and hands out sequential message ids.
#[derive(Default)]
pub struct RecordingChat {
    events: Mutex<Vec<ChatEvent>>,
}

impl RecordingChat {
    pub fn events(&self) -> Vec<ChatEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<(MessageHandle, OutgoingMessage)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ChatEvent::Sent(handle, message) => Some((handle, message)),
                _ => None,
            })
            .collect()
    }

    pub fn attached(&self, handle: MessageHandle) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ChatEvent::Attached(h, symbol) if h == handle => Some(symbol),
                _ => None,
            })
            .collect()
    }

    pub fn deleted(&self) -> Vec<MessageHandle> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ChatEvent::Deleted(handle) => Some(handle),
                _ => None,
            })
            .collect()
    }

    /// First sent message, once `count` affordances are attached to it.
    pub fn presented_with(&self, count: usize) -> Option<MessageHandle> {
        let (handle, _) = self.sent().into_iter().next()?;
        (self.attached(handle).len() == count).then_some(handle)
    }
}

#[async_trait]
impl ChatClient for RecordingChat {
    async fn send(
        &self,
        channel: ChannelRef,
        message: OutgoingMessage,
    ) -> Result<MessageHandle, ChatError> {
        let mut events = self.events.lock().unwrap();
        let handle = MessageHandle {
            channel,
            message_id: 1000 + events.len() as u64,
        };
        events.push(ChatEvent::Sent(handle, message));
        Ok(handle)
    }

    async fn delete(&self, message: MessageHandle) -> Result<(), ChatError> {
        self.events.lock().unwrap().push(ChatEvent::Deleted(message));
        Ok(())
    }

    async fn attach_affordance(
        &self,
        message: MessageHandle,
        symbol: &str,
    ) -> Result<(), ChatError> {
        self.events
            .lock()
            .unwrap()
            .push(ChatEvent::Attached(message, symbol.to_string()));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Enqueue(ActorId, String),
    Play(ActorId, Option<String>),
    Save(ActorId, String),
    Remove(ActorId, String),
}

/// Streaming service with fixed search results and a mutable library.
#[derive(Default)]
pub struct ScriptedMusic {
    results: Vec<Track>,
    playing: Option<Track>,
    library: Mutex<HashSet<String>>,
    actions: Mutex<Vec<Action>>,
}

impl ScriptedMusic {
    pub fn with_results(results: Vec<Track>) -> Self {
        Self {
            results,
            ..Self::default()
        }
    }

    pub fn playing(track: Track, saved: bool) -> Self {
        let music = Self {
            playing: Some(track.clone()),
            ..Self::default()
        };
        if saved {
            music.library.lock().unwrap().insert(track.uri);
        }
        music
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().unwrap().clone()
    }

    fn record(&self, action: Action) -> Result<(), MusicApiError> {
        self.actions.lock().unwrap().push(action);
        Ok(())
    }
}

#[async_trait]
impl MusicApi for ScriptedMusic {
    async fn is_linked(&self, _actor: ActorId) -> Result<bool, MusicApiError> {
        Ok(true)
    }

    fn authorize_url(&self) -> String {
        "https://accounts.spotify.com/authorize".to_string()
    }

    async fn link_account(
        &self,
        _actor: ActorId,
        _code: &str,
    ) -> Result<UserProfile, MusicApiError> {
        Err(MusicApiError::Auth("not scripted".to_string()))
    }

    async fn search_tracks(
        &self,
        _query: &str,
        limit: usize,
    ) -> Result<Vec<Track>, MusicApiError> {
        Ok(self.results.iter().take(limit).cloned().collect())
    }

    async fn current_user(&self, actor: ActorId) -> Result<UserProfile, MusicApiError> {
        Err(MusicApiError::NotLinked(actor))
    }

    async fn currently_playing(&self, _actor: ActorId) -> Result<Option<Track>, MusicApiError> {
        Ok(self.playing.clone())
    }

    async fn is_saved(&self, _actor: ActorId, track: &Track) -> Result<bool, MusicApiError> {
        Ok(self.library.lock().unwrap().contains(&track.uri))
    }

    async fn save_track(&self, actor: ActorId, track: &Track) -> Result<(), MusicApiError> {
        self.library.lock().unwrap().insert(track.uri.clone());
        self.record(Action::Save(actor, track.uri.clone()))
    }

    async fn remove_track(&self, actor: ActorId, track: &Track) -> Result<(), MusicApiError> {
        self.library.lock().unwrap().remove(&track.uri);
        self.record(Action::Remove(actor, track.uri.clone()))
    }

    async fn enqueue(&self, actor: ActorId, track: &Track) -> Result<(), MusicApiError> {
        self.record(Action::Enqueue(actor, track.uri.clone()))
    }

    async fn play(&self, actor: ActorId, track: Option<&Track>) -> Result<(), MusicApiError> {
        self.record(Action::Play(actor, track.map(|t| t.uri.clone())))
    }

    async fn pause(&self, _actor: ActorId) -> Result<(), MusicApiError> {
        Ok(())
    }

    async fn skip_next(&self, _actor: ActorId) -> Result<(), MusicApiError> {
        Ok(())
    }

    async fn skip_previous(&self, _actor: ActorId) -> Result<(), MusicApiError> {
        Ok(())
    }
}

pub fn track(id: &str, name: &str, album: &str) -> Track {
    Track {
        uri: format!("spotify:track:{id}"),
        name: name.to_string(),
        artists: vec!["Daft Punk".to_string()],
        album: album.to_string(),
        image_url: Some(format!("https://i.scdn.co/image/{id}")),
    }
}
