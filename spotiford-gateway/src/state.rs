//! Shared application state handed to the chat adapter.

use std::sync::Arc;

use crate::chat::ChatClient;
use crate::commands::{CommandGuard, default_guards};
use crate::selection::{MAX_CANDIDATES, SelectionContext, SessionRegistry};
use crate::spotify::MusicApi;

/// Everything a command needs besides the chat client it answers through.
pub struct AppState {
    /// Streaming service client
    pub api: Arc<dyn MusicApi>,
    /// Selection sessions waiting for a reaction
    pub registry: SessionRegistry,
    /// Checks applied to every command before it runs
    pub guards: Vec<Box<dyn CommandGuard>>,
    pub command_prefix: String,
    /// Candidates shown per search (1 to 5)
    pub search_limit: usize,
}

impl AppState {
    pub fn new(
        api: Arc<dyn MusicApi>,
        command_prefix: impl Into<String>,
        search_limit: usize,
    ) -> Self {
        Self {
            api,
            registry: SessionRegistry::new(),
            guards: default_guards(),
            command_prefix: command_prefix.into(),
            search_limit: search_limit.clamp(1, MAX_CANDIDATES),
        }
    }

    pub fn selection<'a>(&'a self, chat: &'a dyn ChatClient) -> SelectionContext<'a> {
        SelectionContext {
            chat,
            api: self.api.as_ref(),
            registry: &self.registry,
        }
    }
}
