use async_trait::async_trait;

use vigia_core::{Category, CommandHandler, CommandMeta, DEFAULT_COOLDOWN_SECS, Error, Invocation};

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    aliases: &[],
    desc: "Replies with the bot's latency.",
    category: Category::Utility,
    usage: "ping",
    cooldown_secs: DEFAULT_COOLDOWN_SECS,
    permission: None,
};

pub struct Ping;

#[async_trait]
impl CommandHandler for Ping {
    async fn run(&self, ctx: Invocation<'_>) -> Result<(), Error> {
        let reply = match ctx.surface.latency().await {
            Some(latency) => format!("Pong! Gateway latency: {}ms", latency.as_millis()),
            None => "Pong!".to_owned(),
        };

        ctx.reply(reply).await?;
        Ok(())
    }
}
