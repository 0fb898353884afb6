use async_trait::async_trait;
use tracing::info;

use vigia_core::audit::send_log_quietly;
use vigia_core::{AuditRecord, Category, CommandHandler, CommandMeta, Error, Invocation, ValidationError};
use vigia_database::{ConfigKey, ConfigUpdate, LogCategory};
use vigia_utils::parse::{is_clear_keyword, parse_channel_id, parse_role_id};
use vigia_utils::permissions::Permission;

use crate::admin::embeds::{config_change_embed, config_help_embed, config_view_embed};
use crate::reply_on_invalid;

pub const META: CommandMeta = CommandMeta {
    name: "config",
    aliases: &["settings", "configurar"],
    desc: "View and change this server's bot configuration.",
    category: Category::Admin,
    usage: "config <view|set|toggle|reset> [option] [value]",
    cooldown_secs: 5,
    permission: Some(Permission::Administrator),
};

pub const MAX_PREFIX_CHARS: usize = 3;

pub struct Config;

#[async_trait]
impl CommandHandler for Config {
    async fn run(&self, ctx: Invocation<'_>) -> Result<(), Error> {
        let sub = ctx.arg(0).map(str::to_lowercase);

        let result = match sub.as_deref() {
            Some("view" | "ver" | "show" | "mostrar") => view(&ctx).await,
            Some("set" | "definir") => set(&ctx).await,
            Some("toggle" | "alternar") => toggle(&ctx).await,
            Some("reset" | "resetar") => reset(&ctx).await,
            _ => {
                ctx.reply_embed(config_help_embed(&META, ctx.prefix)).await?;
                Ok(())
            }
        };

        reply_on_invalid(&ctx, result).await
    }
}

async fn view(ctx: &Invocation<'_>) -> Result<(), Error> {
    let config = ctx.data.store.get(ctx.guild_id).await;
    let prefix = config.effective_prefix(&ctx.data.settings.default_prefix);
    ctx.reply_embed(config_view_embed(&config, prefix)).await?;
    Ok(())
}

async fn set(ctx: &Invocation<'_>) -> Result<(), Error> {
    let raw_option = ctx.arg(1).ok_or(ValidationError::MissingArgument("option"))?;
    let key = ConfigKey::parse(raw_option)
        .ok_or_else(|| ValidationError::InvalidOption(raw_option.to_owned()))?;
    let value = ctx.rest(2).ok_or(ValidationError::MissingArgument("value"))?;

    let (update, shown) = if key == ConfigKey::Prefix {
        if value.chars().count() > MAX_PREFIX_CHARS {
            return Err(ValidationError::PrefixTooLong {
                max: MAX_PREFIX_CHARS,
            }
            .into());
        }
        (ConfigUpdate::Prefix(value.clone()), format!("`{value}`"))
    } else {
        let (id, shown) = if is_clear_keyword(&value) {
            (None, "none".to_owned())
        } else if key.is_channel() {
            let channel_id = existing_text_channel(ctx, &value).await?;
            (Some(channel_id), format!("<#{channel_id}>"))
        } else {
            let role_id = existing_role(ctx, &value).await?;
            (Some(role_id), format!("<@&{role_id}>"))
        };
        let update = ConfigUpdate::with_id(key, id)
            .ok_or_else(|| ValidationError::InvalidOption(raw_option.to_owned()))?;
        (update, shown)
    };

    ctx.data.store.set(ctx.guild_id, update).await?;

    let change = format!("`{key}` set to {shown}");
    info!(guild_id = ctx.guild_id, user_id = ctx.actor.user_id, option = %key, "config updated");
    ctx.reply(format!("✅ {change}.")).await?;
    audit_change(ctx, &change).await;
    Ok(())
}

async fn toggle(ctx: &Invocation<'_>) -> Result<(), Error> {
    let kind = ctx
        .arg(1)
        .ok_or(ValidationError::MissingArgument("logs|command|modrole"))?
        .to_lowercase();
    let value = ctx.arg(2).ok_or(ValidationError::MissingArgument("value"))?;
    let store = &ctx.data.store;

    let change = match kind.as_str() {
        "logs" | "log" => {
            let category = value
                .parse::<LogCategory>()
                .map_err(|_| ValidationError::InvalidLogCategory(value.to_owned()))?;
            let enabled = store.toggle_log(ctx.guild_id, category).await?;
            format!("`{category}` logs {}", if enabled { "enabled" } else { "disabled" })
        }
        "command" | "comando" => {
            let name = ctx
                .data
                .registry
                .canonical_name(value)
                .ok_or_else(|| ValidationError::UnknownCommand(value.to_owned()))?;
            if name == META.name {
                ctx.reply("❌ The config command cannot be disabled.").await?;
                return Ok(());
            }
            let disabled = store.toggle_command(ctx.guild_id, name).await?;
            format!("Command `{name}` {}", if disabled { "disabled" } else { "enabled" })
        }
        "modrole" | "cargomod" => {
            let role_id = existing_role(ctx, value).await?;
            let is_mod = store.toggle_mod_role(ctx.guild_id, role_id).await?;
            if is_mod {
                format!("<@&{role_id}> added to moderator roles")
            } else {
                format!("<@&{role_id}> removed from moderator roles")
            }
        }
        _ => {
            ctx.reply_embed(config_help_embed(&META, ctx.prefix)).await?;
            return Ok(());
        }
    };

    ctx.reply(format!("✅ {change}.")).await?;
    audit_change(ctx, &change).await;
    Ok(())
}

async fn reset(ctx: &Invocation<'_>) -> Result<(), Error> {
    let timeout = ctx.data.settings.confirm_timeout;
    ctx.reply(format!(
        "⚠️ This will reset every setting for this server. Reply `yes` within {}s to confirm.",
        timeout.as_secs()
    ))
    .await?;

    let answer = ctx
        .surface
        .await_reply(ctx.channel_id(), ctx.actor.user_id, timeout)
        .await?;

    match answer.as_deref().map(str::trim) {
        Some(reply) if reply.eq_ignore_ascii_case("yes") || reply.eq_ignore_ascii_case("sim") => {
            ctx.data.store.reset(ctx.guild_id).await?;
            info!(guild_id = ctx.guild_id, user_id = ctx.actor.user_id, "config reset");
            ctx.reply("✅ Configuration reset to defaults.").await?;
            audit_change(ctx, "Configuration reset to defaults").await;
        }
        Some(_) => {
            ctx.reply("Reset cancelled.").await?;
        }
        None => {
            ctx.reply("Reset timed out. Nothing was changed.").await?;
        }
    }

    Ok(())
}

async fn existing_text_channel(ctx: &Invocation<'_>, raw: &str) -> Result<u64, ValidationError> {
    let channel_id = parse_channel_id(raw).ok_or(ValidationError::ChannelNotFound)?;

    match ctx.surface.channel_kind(ctx.guild_id, channel_id).await {
        Ok(Some(kind)) if kind.is_text_like() => Ok(channel_id),
        Ok(Some(_)) => Err(ValidationError::NotTextChannel),
        Ok(None) | Err(_) => Err(ValidationError::ChannelNotFound),
    }
}

async fn existing_role(ctx: &Invocation<'_>, raw: &str) -> Result<u64, ValidationError> {
    let role_id = parse_role_id(raw).ok_or(ValidationError::RoleNotFound)?;

    match ctx.surface.role_name(ctx.guild_id, role_id).await {
        Ok(Some(_)) => Ok(role_id),
        Ok(None) | Err(_) => Err(ValidationError::RoleNotFound),
    }
}

async fn audit_change(ctx: &Invocation<'_>, change: &str) {
    if !ctx.data.store.is_log_enabled(ctx.guild_id, LogCategory::Server).await {
        return;
    }

    let record = AuditRecord::new(Some(ctx.guild_id), config_change_embed(ctx.actor.user_id, change));
    send_log_quietly(ctx.data.audit.as_ref(), record).await;
}
