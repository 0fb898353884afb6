use async_trait::async_trait;

use vigia_core::{Category, CommandHandler, CommandMeta, Error, Invocation};

use crate::utility::embeds::serverinfo_embed;

pub const META: CommandMeta = CommandMeta {
    name: "serverinfo",
    aliases: &["server", "si", "guildinfo"],
    desc: "Shows information about this server.",
    category: Category::Utility,
    usage: "serverinfo",
    cooldown_secs: 5,
    permission: None,
};

pub struct ServerInfo;

#[async_trait]
impl CommandHandler for ServerInfo {
    async fn run(&self, ctx: Invocation<'_>) -> Result<(), Error> {
        let guild = ctx.surface.guild(ctx.guild_id).await?;
        ctx.reply_embed(serverinfo_embed(&guild)).await?;
        Ok(())
    }
}
