use vigia_core::CommandMeta;
use vigia_database::{GuildConfig, LogCategory};
use vigia_utils::embed::{ColorTag, Embed};
use vigia_utils::formatting::{format_channel, format_role};

pub fn config_view_embed(config: &GuildConfig, prefix: &str) -> Embed {
    let mod_roles = if config.mod_roles.is_empty() {
        "None".to_owned()
    } else {
        config
            .mod_roles
            .iter()
            .map(|role| format!("<@&{role}>"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let disabled = if config.disabled_commands.is_empty() {
        "None".to_owned()
    } else {
        config
            .disabled_commands
            .iter()
            .map(|name| format!("`{name}`"))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let logs = LogCategory::ALL
        .iter()
        .map(|category| {
            let mark = if config.enabled_logs.is_enabled(*category) {
                "✅"
            } else {
                "❌"
            };
            format!("{mark} {category}")
        })
        .collect::<Vec<_>>()
        .join("\n");

    Embed::new("Server Configuration", ColorTag::Blue)
        .field("Prefix", format!("`{prefix}`"), true)
        .field("Log Channel", format_channel(config.log_channel), true)
        .field("Welcome Channel", format_channel(config.welcome_channel), true)
        .field("Music Channel", format_channel(config.music_channel), true)
        .field("Auto Role", format_role(config.auto_role), true)
        .field("DJ Role", format_role(config.dj_role), true)
        .field("Mod Roles", mod_roles, false)
        .field("Disabled Commands", disabled, false)
        .field("Enabled Logs", logs, false)
}

pub fn config_help_embed(meta: &CommandMeta, prefix: &str) -> Embed {
    let name = meta.name;
    Embed::new("Configuration Commands", ColorTag::Blue)
        .description(format!("Usage: `{}`", meta.usage_with_prefix(prefix)))
        .field("View", format!("`{prefix}{name} view`"), false)
        .field(
            "Set",
            format!(
                "`{prefix}{name} set <option> <value>`\nOptions: prefix, logchannel, welcomechannel, autorole, musicchannel, djrole\nUse `none` to clear a channel or role."
            ),
            false,
        )
        .field(
            "Toggle",
            format!(
                "`{prefix}{name} toggle logs <type>`\n`{prefix}{name} toggle command <name>`\n`{prefix}{name} toggle modrole <@role>`"
            ),
            false,
        )
        .field("Reset", format!("`{prefix}{name} reset`"), false)
}

pub fn config_change_embed(actor_id: u64, change: &str) -> Embed {
    Embed::new("Configuration Changed", ColorTag::Yellow)
        .field("Moderator", format!("<@{actor_id}>"), true)
        .field("Change", change, false)
        .timestamp()
}
