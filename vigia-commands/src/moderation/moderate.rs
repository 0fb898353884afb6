use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use vigia_core::audit::AuditUser;
use vigia_core::{
    Category, CommandHandler, CommandMeta, DEFAULT_COOLDOWN_SECS, Error, Invocation, MemberInfo,
    ModAction, ValidationError,
};
use vigia_database::LogCategory;
use vigia_utils::formatting::format_compact_duration;
use vigia_utils::parse::{has_duration_unit, parse_duration_seconds, parse_user_id};
use vigia_utils::permissions::Permission;

use crate::moderation::embeds::{
    bot_hierarchy_message, hierarchy_message, moderation_action_embed, moderation_bot_target_message,
    moderation_self_action_message, moderation_target_dm_embed,
};
use crate::reply_on_invalid;

pub const META: CommandMeta = CommandMeta {
    name: "moderate",
    aliases: &["mod"],
    desc: "Warn, mute, kick or ban a member.",
    category: Category::Moderation,
    usage: "moderate <@user> <warn|mute|kick|ban> [duration] [reason]",
    cooldown_secs: DEFAULT_COOLDOWN_SECS,
    permission: Some(Permission::ManageMessages),
};

pub const DEFAULT_MUTE_SECS: u64 = 10 * 60;
/// Longest timeout the platform accepts.
pub const MAX_MUTE_SECS: u64 = 28 * 86_400;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Warn,
    Mute,
    Kick,
    Ban,
}

impl Action {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "warn" => Some(Action::Warn),
            "mute" | "timeout" => Some(Action::Mute),
            "kick" => Some(Action::Kick),
            "ban" => Some(Action::Ban),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Action::Warn => "Warn",
            Action::Mute => "Mute",
            Action::Kick => "Kick",
            Action::Ban => "Ban",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Action::Warn => "warn",
            Action::Mute => "mute",
            Action::Kick => "kick",
            Action::Ban => "ban",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            Action::Warn => "warned",
            Action::Mute => "muted",
            Action::Kick => "kicked",
            Action::Ban => "banned",
        }
    }
}

pub struct Moderate;

#[async_trait]
impl CommandHandler for Moderate {
    async fn run(&self, ctx: Invocation<'_>) -> Result<(), Error> {
        let result = moderate(&ctx).await;
        reply_on_invalid(&ctx, result).await
    }
}

async fn moderate(ctx: &Invocation<'_>) -> Result<(), Error> {
    let (Some(raw_target), Some(action)) = (ctx.arg(0), ctx.arg(1).and_then(Action::parse)) else {
        ctx.reply(ctx.usage()).await?;
        return Ok(());
    };
    let target_id = parse_user_id(raw_target).ok_or(ValidationError::UserNotFound)?;

    let (duration_secs, reason) = if action == Action::Mute {
        match ctx.arg(2) {
            Some(raw) if has_duration_unit(raw) => {
                let Some(seconds) = parse_duration_seconds(raw) else {
                    ctx.reply("Invalid duration. Use a format like `30s`, `10m`, `2h` or `1d`.")
                        .await?;
                    return Ok(());
                };
                (Some(seconds), ctx.rest(3))
            }
            _ => (Some(DEFAULT_MUTE_SECS), ctx.rest(2)),
        }
    } else {
        (None, ctx.rest(2))
    };

    if duration_secs.is_some_and(|seconds| seconds > MAX_MUTE_SECS) {
        ctx.reply("Timeout duration cannot exceed 28 days.").await?;
        return Ok(());
    }

    if target_id == ctx.actor.user_id {
        ctx.reply(moderation_self_action_message()).await?;
        return Ok(());
    }

    let target = ctx
        .surface
        .member(ctx.guild_id, target_id)
        .await?
        .ok_or(ValidationError::UserNotFound)?;

    if let Some(refusal) = refusal(ctx, &target).await? {
        ctx.reply(refusal).await?;
        return Ok(());
    }

    let reason_text = reason.as_deref().unwrap_or("No reason provided");
    let duration_label = duration_secs.map(format_compact_duration);

    let applied = match action {
        Action::Warn => {
            let guild_name = match ctx.surface.guild(ctx.guild_id).await {
                Ok(guild) => guild.name,
                Err(_) => format!("Server {}", ctx.guild_id),
            };
            let dm = moderation_target_dm_embed(&guild_name, action.past_tense(), reason.as_deref(), None);
            if let Err(source) = ctx.surface.direct_message(target_id, dm).await {
                warn!(?source, user_id = target_id, "could not DM warned member");
            }
            Ok(())
        }
        Action::Mute => {
            let seconds = duration_secs.unwrap_or(DEFAULT_MUTE_SECS);
            ctx.surface
                .timeout(ctx.guild_id, target_id, Duration::from_secs(seconds), reason_text)
                .await
        }
        Action::Kick => ctx.surface.kick(ctx.guild_id, target_id, reason_text).await,
        Action::Ban => ctx.surface.ban(ctx.guild_id, target_id, reason_text).await,
    };

    if let Err(source) = applied {
        error!(?source, action = action.verb(), "moderation request failed");
        ctx.reply(format!(
            "I couldn't {} that user. Check role hierarchy and permissions.",
            action.verb()
        ))
        .await?;
        return Ok(());
    }

    info!(
        guild_id = ctx.guild_id,
        moderator_id = ctx.actor.user_id,
        target_id,
        action = action.verb(),
        "moderation action applied"
    );

    ctx.reply_embed(moderation_action_embed(
        &target.tag,
        target_id,
        target.avatar_url.clone(),
        action.past_tense(),
        reason.as_deref(),
        duration_label.as_deref(),
    ))
    .await?;

    if ctx.data.store.is_log_enabled(ctx.guild_id, LogCategory::Moderation).await {
        let record = ModAction {
            guild_id: ctx.guild_id,
            moderator: audit_user(ctx.actor),
            target: audit_user(&target),
            action: action.label().to_owned(),
            reason,
            duration: duration_label,
        };
        if let Err(source) = ctx.data.audit.log_mod_action(&record).await {
            warn!(?source, "failed to log moderation action");
        }
    }

    Ok(())
}

/// Why the actor may not act on `target`, if anything forbids it.
async fn refusal(ctx: &Invocation<'_>, target: &MemberInfo) -> Result<Option<&'static str>, Error> {
    if target.is_bot {
        return Ok(Some(moderation_bot_target_message()));
    }

    let outranked = !ctx.actor.is_owner
        && target.highest_role_position >= ctx.actor.highest_role_position;
    if target.is_owner || outranked {
        return Ok(Some(hierarchy_message()));
    }

    let bot_position = ctx.surface.bot_highest_role_position(ctx.guild_id).await?;
    if target.highest_role_position >= bot_position {
        return Ok(Some(bot_hierarchy_message()));
    }

    Ok(None)
}

fn audit_user(member: &MemberInfo) -> AuditUser {
    AuditUser {
        id: member.user_id,
        tag: member.tag.clone(),
        avatar_url: member.avatar_url.clone(),
    }
}
