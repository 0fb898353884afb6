use async_trait::async_trait;
use tracing::info;

use vigia_core::{
    Category, CommandHandler, CommandMeta, DEFAULT_COOLDOWN_SECS, Error, Invocation, PlayRequest,
};

use crate::music::{engine, in_music_channel};

pub const META: CommandMeta = CommandMeta {
    name: "play",
    aliases: &["p"],
    desc: "Plays a song or playlist from a link or search query.",
    category: Category::Music,
    usage: "play <link|search>",
    cooldown_secs: DEFAULT_COOLDOWN_SECS,
    permission: None,
};

pub struct Play;

#[async_trait]
impl CommandHandler for Play {
    async fn run(&self, ctx: Invocation<'_>) -> Result<(), Error> {
        if !in_music_channel(&ctx).await? {
            return Ok(());
        }

        let Some(query) = ctx.rest(0) else {
            ctx.reply(ctx.usage()).await?;
            return Ok(());
        };

        let Some(voice_channel_id) = ctx.actor.voice_channel_id else {
            ctx.reply("You need to be in a voice channel to play music.")
                .await?;
            return Ok(());
        };

        let Some(engine) = engine(&ctx).await? else {
            return Ok(());
        };

        ctx.reply(format!("🔎 Searching for `{query}`...")).await?;

        info!(guild_id = ctx.guild_id, user_id = ctx.actor.user_id, %query, "play requested");
        engine
            .play(PlayRequest {
                guild_id: ctx.guild_id,
                voice_channel_id,
                text_channel_id: ctx.channel_id(),
                requested_by: ctx.actor.user_id,
                query,
            })
            .await?;

        Ok(())
    }
}
