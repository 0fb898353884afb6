use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tokio::time::Instant;
use tracing::debug;

use vigia_core::{CommandDispatcher, Data, InboundMessage};

use crate::surface::SerenityChatSurface;

pub fn inbound(message: &serenity::Message) -> InboundMessage {
    InboundMessage {
        id: message.id.get(),
        channel_id: message.channel_id.get(),
        guild_id: message.guild_id.map(|id| id.get()),
        author_id: message.author.id.get(),
        author_tag: message.author.tag(),
        author_is_bot: message.author.bot || message.webhook_id.is_some(),
        content: message.content.clone(),
    }
}

/// Route a chat message through the command pipeline.
pub async fn handle_message_command(
    ctx: &serenity::Context,
    framework: poise::FrameworkContext<'_, Data, vigia_core::Error>,
    data: &Data,
    message: &serenity::Message,
) {
    let surface = Arc::new(SerenityChatSurface::new(
        ctx.clone(),
        Some(framework.shard_manager().clone()),
    ));
    let inbound = inbound(message);

    let outcome = CommandDispatcher::new(data.clone())
        .dispatch(surface, &inbound, Instant::now())
        .await;

    debug!(message_id = inbound.id, ?outcome, "message dispatched");
}
