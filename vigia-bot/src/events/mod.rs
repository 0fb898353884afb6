pub mod commands;
pub mod members;
pub mod ready;
pub mod voice_state;

use poise::serenity_prelude as serenity;

use vigia_core::{Data, Error};

pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            ready::handle_ready(ctx, data_about_bot, data).await;
        }
        serenity::FullEvent::Message { new_message } => {
            commands::handle_message_command(ctx, framework, data, new_message).await;
        }
        serenity::FullEvent::VoiceStateUpdate { old, new } => {
            voice_state::handle_voice_state_update(data, old.as_ref(), new).await;
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            members::handle_member_join(ctx, data, new_member).await;
        }
        serenity::FullEvent::GuildMemberRemoval { guild_id, user, .. } => {
            members::handle_member_leave(data, *guild_id, user).await;
        }
        _ => {}
    }

    Ok(())
}
