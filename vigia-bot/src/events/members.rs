use poise::serenity_prelude as serenity;
use tracing::warn;

use vigia_core::Data;
use vigia_core::audit::{AuditRecord, send_log_quietly};
use vigia_database::LogCategory;
use vigia_utils::embed::{ColorTag, Embed};
use vigia_utils::formatting::{format_timestamp, user_label};
use vigia_utils::time::snowflake_created_at;

/// Auto-role, welcome message and join log for a new member.
pub async fn handle_member_join(ctx: &serenity::Context, data: &Data, member: &serenity::Member) {
    let guild_id = member.guild_id;
    let config = data.store.get(guild_id.get()).await;

    if let Some(role_id) = config.auto_role
        && let Err(source) = member.add_role(&ctx.http, serenity::RoleId::new(role_id)).await
    {
        warn!(?source, guild_id = guild_id.get(), role_id, "failed to assign auto role");
    }

    let (guild_name, member_count) = ctx
        .cache
        .guild(guild_id)
        .map(|guild| (guild.name.clone(), guild.member_count))
        .unwrap_or_else(|| (format!("Server {}", guild_id.get()), 0));

    if let Some(channel_id) = config.welcome_channel {
        let mut welcome = Embed::new("Welcome!", ColorTag::Green)
            .description(format!(
                "Welcome to **{guild_name}**, <@{}>!",
                member.user.id.get()
            ))
            .thumbnail(Some(member.user.face()));
        if member_count > 0 {
            welcome = welcome.footer(format!("You are member #{member_count}"));
        }

        let sent = serenity::ChannelId::new(channel_id)
            .send_message(
                &ctx.http,
                serenity::CreateMessage::new().embed(welcome.to_create_embed()),
            )
            .await;
        if let Err(source) = sent {
            warn!(?source, guild_id = guild_id.get(), channel_id, "failed to send welcome message");
        }
    }

    if !config.enabled_logs.is_enabled(LogCategory::Join) {
        return;
    }

    let user_id = member.user.id.get();
    let embed = Embed::new("Member Joined", ColorTag::Green)
        .thumbnail(Some(member.user.face()))
        .field("User", user_label(&member.user.tag(), user_id), true)
        .field(
            "Account Created",
            format_timestamp(snowflake_created_at(user_id)),
            true,
        )
        .footer(format!("ID: {user_id}"))
        .timestamp();
    send_log_quietly(data.audit.as_ref(), AuditRecord::new(Some(guild_id.get()), embed)).await;
}

pub async fn handle_member_leave(data: &Data, guild_id: serenity::GuildId, user: &serenity::User) {
    if !data
        .store
        .is_log_enabled(guild_id.get(), LogCategory::Leave)
        .await
    {
        return;
    }

    let user_id = user.id.get();
    let embed = Embed::new("Member Left", ColorTag::Red)
        .thumbnail(Some(user.face()))
        .field("User", user_label(&user.tag(), user_id), true)
        .footer(format!("ID: {user_id}"))
        .timestamp();
    send_log_quietly(data.audit.as_ref(), AuditRecord::new(Some(guild_id.get()), embed)).await;
}
