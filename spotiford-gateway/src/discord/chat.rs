//! [`ChatClient`] over the Discord REST API.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::builder::{CreateEmbed, CreateMessage};
use serenity::http::Http;
use serenity::model::channel::ReactionType;
use serenity::model::id::{ChannelId, MessageId};

use crate::chat::{Card, ChannelRef, ChatClient, ChatError, MessageHandle, OutgoingMessage};

/// Spotify green
pub const CARD_EMBED_COLOR: u32 = 0x1D_B9_54;

pub struct DiscordChat {
    http: Arc<Http>,
}

impl DiscordChat {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

pub(super) fn card_embed(card: &Card) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(card.title.clone())
        .color(CARD_EMBED_COLOR)
        .fields(
            card.fields
                .iter()
                .map(|field| (field.name.clone(), field.value.clone(), false)),
        );
    if let Some(description) = &card.description {
        embed = embed.description(description.clone());
    }
    if let Some(url) = &card.thumbnail_url {
        embed = embed.thumbnail(url.clone());
    }
    embed
}

fn platform_error(e: serenity::Error) -> ChatError {
    ChatError::Platform(e.to_string())
}

/// Errors from requests addressing an existing message. Discord answers 404
/// once the message is deleted.
fn message_error(e: serenity::Error, message: MessageHandle) -> ChatError {
    let status = match &e {
        serenity::Error::Http(http) => http.status_code().map(|code| code.as_u16()),
        _ => None,
    };
    classify_message_error(status, message, e.to_string())
}

fn classify_message_error(status: Option<u16>, message: MessageHandle, detail: String) -> ChatError {
    match status {
        Some(404) => ChatError::MessageGone(message.message_id),
        _ => ChatError::Platform(detail),
    }
}

#[async_trait]
impl ChatClient for DiscordChat {
    async fn send(
        &self,
        channel: ChannelRef,
        message: OutgoingMessage,
    ) -> Result<MessageHandle, ChatError> {
        let channel_id = ChannelId::new(channel.0);
        let sent = match message {
            OutgoingMessage::Text(text) => channel_id.say(self.http.as_ref(), text).await,
            OutgoingMessage::Card(card) => {
                channel_id
                    .send_message(self.http.as_ref(), CreateMessage::new().embed(card_embed(&card)))
                    .await
            }
        }
        .map_err(platform_error)?;

        Ok(MessageHandle {
            channel,
            message_id: sent.id.get(),
        })
    }

    async fn delete(&self, message: MessageHandle) -> Result<(), ChatError> {
        ChannelId::new(message.channel.0)
            .delete_message(self.http.as_ref(), MessageId::new(message.message_id))
            .await
            .map_err(|e| message_error(e, message))
    }

    async fn attach_affordance(
        &self,
        message: MessageHandle,
        symbol: &str,
    ) -> Result<(), ChatError> {
        let reaction = ReactionType::Unicode(symbol.to_string());
        self.http
            .create_reaction(
                ChannelId::new(message.channel.0),
                MessageId::new(message.message_id),
                &reaction,
            )
            .await
            .map_err(|e| message_error(e, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_embed_keeps_field_order() {
        let card = Card::new("Results for 'Daft Punk'")
            .field("#1 Daft Punk - One More Time", "Discovery")
            .field("#2 Daft Punk - Da Funk", "Homework");

        let json = serde_json::to_value(card_embed(&card)).unwrap();

        assert_eq!(json["title"], "Results for 'Daft Punk'");
        assert_eq!(json["color"], CARD_EMBED_COLOR);
        assert_eq!(json["fields"][1]["name"], "#2 Daft Punk - Da Funk");
        assert_eq!(json["fields"][1]["value"], "Homework");
        assert_eq!(json["fields"][0]["inline"], false);
    }

    #[test]
    fn test_missing_message_is_reported_as_gone() {
        let message = MessageHandle {
            channel: ChannelRef(1),
            message_id: 42,
        };

        assert!(matches!(
            classify_message_error(Some(404), message, "Unknown Message".to_string()),
            ChatError::MessageGone(42)
        ));
        assert!(matches!(
            classify_message_error(Some(403), message, "Missing Access".to_string()),
            ChatError::Platform(ref detail) if detail == "Missing Access"
        ));
        assert!(matches!(
            classify_message_error(None, message, "timed out".to_string()),
            ChatError::Platform(_)
        ));
    }
}
