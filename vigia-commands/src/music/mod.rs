pub mod controls;
pub mod play;

use std::sync::Arc;

use vigia_core::{Error, Invocation, PlaybackEngine};

pub const ENGINE_UNAVAILABLE: &str = "Music playback is not available right now.";

/// The playback engine, or a reply explaining that none is attached.
pub(crate) async fn engine(ctx: &Invocation<'_>) -> Result<Option<Arc<dyn PlaybackEngine>>, Error> {
    match &ctx.data.playback {
        Some(engine) => Ok(Some(engine.clone())),
        None => {
            ctx.reply(ENGINE_UNAVAILABLE).await?;
            Ok(None)
        }
    }
}

/// False (after replying) when the guild pins music commands to another channel.
pub(crate) async fn in_music_channel(ctx: &Invocation<'_>) -> Result<bool, Error> {
    match ctx.config.music_channel {
        Some(channel_id) if channel_id != ctx.channel_id() => {
            ctx.reply(format!("Music commands can only be used in <#{channel_id}>."))
                .await?;
            Ok(false)
        }
        _ => Ok(true),
    }
}

/// False (after replying) when the guild has a DJ role the actor lacks.
pub(crate) async fn has_dj_role(ctx: &Invocation<'_>) -> Result<bool, Error> {
    match ctx.config.dj_role {
        Some(role_id) if !ctx.actor.is_owner && !ctx.actor.has_role(role_id) => {
            ctx.reply(format!("You need the <@&{role_id}> role to use this command."))
                .await?;
            Ok(false)
        }
        _ => Ok(true),
    }
}
