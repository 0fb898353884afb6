use async_trait::async_trait;

use vigia_core::{Category, CommandHandler, CommandMeta, DEFAULT_COOLDOWN_SECS, Error, Invocation};

use crate::music::{engine, has_dj_role, in_music_channel};

pub const SKIP: CommandMeta = CommandMeta {
    name: "skip",
    aliases: &[],
    desc: "Skips the current song.",
    category: Category::Music,
    usage: "skip",
    cooldown_secs: DEFAULT_COOLDOWN_SECS,
    permission: None,
};

pub const STOP: CommandMeta = CommandMeta {
    name: "stop",
    aliases: &[],
    desc: "Stops playback and clears the queue.",
    category: Category::Music,
    usage: "stop",
    cooldown_secs: DEFAULT_COOLDOWN_SECS,
    permission: None,
};

pub const PAUSE: CommandMeta = CommandMeta {
    name: "pause",
    aliases: &[],
    desc: "Pauses the current song.",
    category: Category::Music,
    usage: "pause",
    cooldown_secs: DEFAULT_COOLDOWN_SECS,
    permission: None,
};

pub const RESUME: CommandMeta = CommandMeta {
    name: "resume",
    aliases: &[],
    desc: "Resumes a paused song.",
    category: Category::Music,
    usage: "resume",
    cooldown_secs: DEFAULT_COOLDOWN_SECS,
    permission: None,
};

/// Queue controls forwarded straight to the playback engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Skip,
    Stop,
    Pause,
    Resume,
}

impl Control {
    fn needs_dj(self) -> bool {
        matches!(self, Control::Skip | Control::Stop)
    }

    fn confirmation(self) -> &'static str {
        match self {
            Control::Skip => "⏭️ Skipped the current song.",
            Control::Stop => "⏹️ Stopped playback and cleared the queue.",
            Control::Pause => "⏸️ Paused.",
            Control::Resume => "▶️ Resumed.",
        }
    }
}

#[async_trait]
impl CommandHandler for Control {
    async fn run(&self, ctx: Invocation<'_>) -> Result<(), Error> {
        if !in_music_channel(&ctx).await? {
            return Ok(());
        }
        if self.needs_dj() && !has_dj_role(&ctx).await? {
            return Ok(());
        }

        let Some(engine) = engine(&ctx).await? else {
            return Ok(());
        };

        match self {
            Control::Skip => engine.skip(ctx.guild_id).await?,
            Control::Stop => engine.stop(ctx.guild_id).await?,
            Control::Pause => engine.pause(ctx.guild_id).await?,
            Control::Resume => engine.resume(ctx.guild_id).await?,
        }

        ctx.reply(self.confirmation()).await?;
        Ok(())
    }
}
