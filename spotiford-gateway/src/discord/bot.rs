use std::sync::Arc;

use serenity::async_trait;
use serenity::model::channel::{Message, Reaction, ReactionType};
use serenity::model::gateway::Ready;
use serenity::model::id::{ChannelId, GuildId, MessageId};
use serenity::prelude::*;
use spotiford_core::ActorId;
use tracing::{debug, error, info};

use super::chat::DiscordChat;
use crate::chat::{ChannelRef, ChatClient, Invocation, MessageHandle, ReactionEvent};
use crate::commands::handle_message;
use crate::messages;
use crate::state::AppState;

/// Discord event handler
///
/// Commands run inside the `message` event, which serenity dispatches on its
/// own task; reactions and deletions reach the waiting session through the
/// registry from their own events.
pub struct Bot {
    state: Arc<AppState>,
}

impl Bot {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

fn message_handle(channel_id: ChannelId, message_id: MessageId) -> MessageHandle {
    MessageHandle {
        channel: ChannelRef(channel_id.get()),
        message_id: message_id.get(),
    }
}

/// Only unicode emoji can be affordances; custom guild emoji are dropped.
pub(super) fn reaction_event(
    user_id: u64,
    emoji: &ReactionType,
    channel_id: ChannelId,
    message_id: MessageId,
) -> Option<ReactionEvent> {
    match emoji {
        ReactionType::Unicode(symbol) => Some(ReactionEvent {
            actor: ActorId(user_id),
            symbol: symbol.clone(),
            message: message_handle(channel_id, message_id),
        }),
        _ => None,
    }
}

#[async_trait]
impl EventHandler for Bot {
    async fn message(&self, ctx: Context, msg: Message) {
        // Ignore messages from bots (including ourselves)
        if msg.author.bot {
            return;
        }

        let invocation = Invocation {
            actor: ActorId(msg.author.id.get()),
            channel: ChannelRef(msg.channel_id.get()),
            direct: msg.guild_id.is_none(),
        };
        let chat = DiscordChat::new(ctx.http.clone());

        if let Err(e) = handle_message(&self.state, &chat, &invocation, &msg.content).await {
            error!(
                "Command from user {} ({}) failed: {}",
                msg.author.name, invocation.actor, e
            );
            if let Err(send_err) = chat
                .send(invocation.channel, messages::ERROR_GENERIC.into())
                .await
            {
                error!("Failed to report error to user {}: {}", invocation.actor, send_err);
            }
        }
    }

    async fn reaction_add(&self, _ctx: Context, reaction: Reaction) {
        let Some(user_id) = reaction.user_id else {
            return;
        };
        let Some(event) = reaction_event(
            user_id.get(),
            &reaction.emoji,
            reaction.channel_id,
            reaction.message_id,
        ) else {
            return;
        };

        if self.state.registry.dispatch_reaction(&event) {
            debug!(
                "Reaction {} from user {} resolved a selection",
                event.symbol, event.actor
            );
        }
    }

    async fn message_delete(
        &self,
        _ctx: Context,
        channel_id: ChannelId,
        deleted_message_id: MessageId,
        _guild_id: Option<GuildId>,
    ) {
        self.state
            .registry
            .message_deleted(message_handle(channel_id, deleted_message_id));
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Discord bot connected as {}", ready.user.name);
    }
}
