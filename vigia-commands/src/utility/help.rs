use async_trait::async_trait;

use vigia_core::{Category, CommandHandler, CommandMeta, DEFAULT_COOLDOWN_SECS, Error, Invocation};

use crate::utility::embeds::{command_detail_embed, grouped_help_embed, unknown_topic_message};

pub const META: CommandMeta = CommandMeta {
    name: "help",
    aliases: &["h"],
    desc: "Lists available commands or shows details for one.",
    category: Category::Utility,
    usage: "help [command|category]",
    cooldown_secs: DEFAULT_COOLDOWN_SECS,
    permission: None,
};

pub struct Help;

#[async_trait]
impl CommandHandler for Help {
    async fn run(&self, ctx: Invocation<'_>) -> Result<(), Error> {
        let query = ctx.arg(0);

        if let Some(raw) = query
            && let Some(record) = ctx.data.registry.resolve(raw)
            && !ctx.config.is_command_disabled(record.meta.name)
        {
            ctx.reply_embed(command_detail_embed(&record.meta, ctx.prefix))
                .await?;
            return Ok(());
        }

        let category = match query {
            Some(raw) => match raw.parse::<Category>() {
                Ok(category) => Some(category),
                Err(()) => {
                    ctx.reply(unknown_topic_message(raw)).await?;
                    return Ok(());
                }
            },
            None => None,
        };

        let commands = visible_commands(&ctx, category);
        ctx.reply_embed(grouped_help_embed(&commands, ctx.prefix))
            .await?;
        Ok(())
    }
}

/// Registered commands not disabled in the guild, grouped by category and
/// sorted by name within each group.
fn visible_commands<'a>(ctx: &'a Invocation<'_>, category: Option<Category>) -> Vec<&'a CommandMeta> {
    let mut visible = Vec::new();

    for group in Category::ALL
        .into_iter()
        .filter(|group| category.is_none_or(|wanted| wanted == *group))
    {
        let mut metas: Vec<&CommandMeta> = ctx
            .data
            .registry
            .in_category(group)
            .map(|record| &record.meta)
            .filter(|meta| !ctx.config.is_command_disabled(meta.name))
            .collect();
        metas.sort_unstable_by_key(|meta| meta.name);
        visible.extend(metas);
    }

    visible
}
