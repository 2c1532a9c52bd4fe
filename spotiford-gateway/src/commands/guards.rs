//! Checks run before a command body.

use async_trait::async_trait;

use super::Command;
use crate::chat::Invocation;
use crate::messages;
use crate::spotify::{MusicApi, MusicApiError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed,
    /// Stop and tell the actor why.
    Reject(&'static str),
}

#[async_trait]
pub trait CommandGuard: Send + Sync {
    async fn check(
        &self,
        invocation: &Invocation,
        command: &Command,
        api: &dyn MusicApi,
    ) -> Result<GuardOutcome, MusicApiError>;
}

/// Tokens must never be handled in a shared channel.
pub struct DirectMessageOnly;

#[async_trait]
impl CommandGuard for DirectMessageOnly {
    async fn check(
        &self,
        invocation: &Invocation,
        _command: &Command,
        _api: &dyn MusicApi,
    ) -> Result<GuardOutcome, MusicApiError> {
        if invocation.direct {
            Ok(GuardOutcome::Proceed)
        } else {
            Ok(GuardOutcome::Reject(messages::DM_ONLY))
        }
    }
}

/// Commands acting on an account need a stored authorization.
pub struct RequireLinkedAccount;

#[async_trait]
impl CommandGuard for RequireLinkedAccount {
    async fn check(
        &self,
        invocation: &Invocation,
        command: &Command,
        api: &dyn MusicApi,
    ) -> Result<GuardOutcome, MusicApiError> {
        if !command.requires_link() || api.is_linked(invocation.actor).await? {
            Ok(GuardOutcome::Proceed)
        } else {
            Ok(GuardOutcome::Reject(messages::NOT_LOGGED_IN))
        }
    }
}

/// Guards applied to every command, in order.
pub fn default_guards() -> Vec<Box<dyn CommandGuard>> {
    vec![Box::new(DirectMessageOnly), Box::new(RequireLinkedAccount)]
}
