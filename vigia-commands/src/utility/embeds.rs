use vigia_core::{Category, CommandMeta, GuildInfo};
use vigia_utils::embed::{ColorTag, Embed};
use vigia_utils::formatting::format_timestamp;
use vigia_utils::time::snowflake_created_at;

pub fn unknown_topic_message(wanted: &str) -> String {
    let valid = Category::ALL
        .iter()
        .map(|category| category.label())
        .collect::<Vec<_>>()
        .join(", ");

    format!("Unknown command or category: {wanted}\nValid categories: {valid}")
}

pub fn grouped_help_embed(commands: &[&CommandMeta], prefix: &str) -> Embed {
    let mut out = String::new();
    let mut current_category: Option<Category> = None;

    for command in commands {
        if current_category != Some(command.category) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n", command.category));
            current_category = Some(command.category);
        }

        out.push_str(&format!("`{prefix}{}`: {}\n", command.name, command.desc));
    }

    if out.is_empty() {
        out.push_str("No commands available.");
    }

    Embed::new("Available Commands", ColorTag::Default)
        .description(out.trim_end())
        .footer(format!("Prefix: {prefix} | {prefix}help <command> for details"))
}

pub fn command_detail_embed(command: &CommandMeta, prefix: &str) -> Embed {
    let aliases = if command.aliases.is_empty() {
        "None".to_owned()
    } else {
        command
            .aliases
            .iter()
            .map(|alias| format!("`{alias}`"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut embed = Embed::new(format!("Command: {}", command.name), ColorTag::Default)
        .description(command.desc)
        .field("Usage", format!("`{}`", command.usage_with_prefix(prefix)), false)
        .field("Aliases", aliases, true)
        .field("Category", command.category.label(), true)
        .field("Cooldown", format!("{}s", command.cooldown().as_secs()), true);

    if let Some(permission) = command.permission {
        embed = embed.field("Requires", permission.name(), true);
    }

    embed
}

pub fn serverinfo_embed(guild: &GuildInfo) -> Embed {
    let channels = &guild.channels;
    let channel_summary = format!(
        "Text: {}\nVoice: {}\nCategories: {}\nAnnouncements: {}\nThreads: {}\nForums: {}",
        channels.text,
        channels.voice,
        channels.category,
        channels.announcement,
        channels.thread,
        channels.forum,
    );

    Embed::new(guild.name.clone(), ColorTag::Default)
        .thumbnail(guild.icon_url.clone())
        .field("Owner", format!("<@{}>", guild.owner_id), true)
        .field(
            "Created",
            format_timestamp(snowflake_created_at(guild.id)),
            true,
        )
        .field("Members", guild.member_count.to_string(), true)
        .field("Channels", channel_summary, true)
        .field("Roles", guild.role_count.to_string(), true)
        .field("Emojis", guild.emoji_count.to_string(), true)
        .field(
            "Boosts",
            format!("Level {} ({} boosts)", guild.boost_tier, guild.boost_count),
            true,
        )
        .footer(format!("ID: {}", guild.id))
        .timestamp()
}
