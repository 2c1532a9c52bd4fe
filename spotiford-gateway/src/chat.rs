//! Chat platform boundary used by the selection protocol and command handlers.

use async_trait::async_trait;
use spotiford_core::ActorId;

/// Channel (DM or guild text channel) a message lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelRef(pub u64);

/// A message the bot has sent and may later retract or decorate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle {
    pub channel: ChannelRef,
    pub message_id: u64,
}

/// One name/value row of a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardField {
    pub name: String,
    pub value: String,
}

/// Rich message body (rendered as an embed on Discord).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Card {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<CardField>,
    pub thumbnail_url: Option<String>,
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(CardField {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn thumbnail(mut self, url: Option<String>) -> Self {
        self.thumbnail_url = url;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingMessage {
    Text(String),
    Card(Card),
}

impl From<&str> for OutgoingMessage {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for OutgoingMessage {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Card> for OutgoingMessage {
    fn from(card: Card) -> Self {
        Self::Card(card)
    }
}

/// Who issued a command, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub actor: ActorId,
    pub channel: ChannelRef,
    /// `true` for private (DM) conversations
    pub direct: bool,
}

/// A reaction added to some message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub actor: ActorId,
    pub symbol: String,
    pub message: MessageHandle,
}

/// Chat client errors
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Chat platform request failed: {0}")]
    Platform(String),
    #[error("Message {0} no longer exists")]
    MessageGone(u64),
}

/// Operations the bot needs from the chat platform.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn send(
        &self,
        channel: ChannelRef,
        message: OutgoingMessage,
    ) -> Result<MessageHandle, ChatError>;

    async fn delete(&self, message: MessageHandle) -> Result<(), ChatError>;

    /// Attach a selectable symbol (reaction) to a sent message.
    async fn attach_affordance(&self, message: MessageHandle, symbol: &str)
    -> Result<(), ChatError>;
}
