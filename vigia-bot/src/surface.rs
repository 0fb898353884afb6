use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use poise::serenity_prelude as serenity;

use vigia_core::surface::ChannelCounts;
use vigia_core::{ChannelKind, ChatSurface, Error, GuildInfo, MemberInfo, MessageRef};
use vigia_utils::embed::Embed;
use vigia_utils::permissions::resolve_member;

/// [`ChatSurface`] over a live gateway connection.
#[derive(Clone)]
pub struct SerenityChatSurface {
    ctx: serenity::Context,
    shard_manager: Option<Arc<serenity::ShardManager>>,
}

impl SerenityChatSurface {
    pub fn new(ctx: serenity::Context, shard_manager: Option<Arc<serenity::ShardManager>>) -> Self {
        Self { ctx, shard_manager }
    }

    fn http(&self) -> &serenity::Http {
        &self.ctx.http
    }

    async fn fetch_member(
        &self,
        guild_id: serenity::GuildId,
        user_id: serenity::UserId,
    ) -> Result<Option<serenity::Member>, Error> {
        match guild_id.member(&self.ctx, user_id).await {
            Ok(member) => Ok(Some(member)),
            Err(source) if is_not_found(&source) => Ok(None),
            Err(source) => Err(source.into()),
        }
    }

    fn voice_channel_of(&self, guild_id: serenity::GuildId, user_id: serenity::UserId) -> Option<u64> {
        let guild = self.ctx.cache.guild(guild_id)?;
        guild
            .voice_states
            .get(&user_id)
            .and_then(|state| state.channel_id)
            .map(|channel_id| channel_id.get())
    }
}

fn to_ref(message: &serenity::Message) -> MessageRef {
    MessageRef::new(message.channel_id.get(), message.id.get())
}

fn is_not_found(source: &serenity::Error) -> bool {
    matches!(
        source,
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 404
    )
}

fn channel_kind(kind: serenity::ChannelType) -> ChannelKind {
    match kind {
        serenity::ChannelType::Text => ChannelKind::Text,
        serenity::ChannelType::News => ChannelKind::Announcement,
        serenity::ChannelType::Voice => ChannelKind::Voice,
        serenity::ChannelType::Stage => ChannelKind::Stage,
        serenity::ChannelType::Category => ChannelKind::Category,
        serenity::ChannelType::NewsThread
        | serenity::ChannelType::PublicThread
        | serenity::ChannelType::PrivateThread => ChannelKind::Thread,
        serenity::ChannelType::Forum => ChannelKind::Forum,
        _ => ChannelKind::Other,
    }
}

#[async_trait]
impl ChatSurface for SerenityChatSurface {
    async fn reply(&self, to: MessageRef, content: &str) -> Result<MessageRef, Error> {
        let channel_id = serenity::ChannelId::new(to.channel_id);
        let builder = serenity::CreateMessage::new()
            .content(content)
            .reference_message((channel_id, serenity::MessageId::new(to.message_id)));

        let message = channel_id.send_message(self.http(), builder).await?;
        Ok(to_ref(&message))
    }

    async fn reply_embed(&self, to: MessageRef, embed: Embed) -> Result<MessageRef, Error> {
        let channel_id = serenity::ChannelId::new(to.channel_id);
        let builder = serenity::CreateMessage::new()
            .embed(embed.to_create_embed())
            .reference_message((channel_id, serenity::MessageId::new(to.message_id)));

        let message = channel_id.send_message(self.http(), builder).await?;
        Ok(to_ref(&message))
    }

    async fn send(&self, channel_id: u64, content: &str) -> Result<MessageRef, Error> {
        let message = serenity::ChannelId::new(channel_id)
            .say(self.http(), content)
            .await?;
        Ok(to_ref(&message))
    }

    async fn send_embed(&self, channel_id: u64, embed: Embed) -> Result<MessageRef, Error> {
        let message = serenity::ChannelId::new(channel_id)
            .send_message(
                self.http(),
                serenity::CreateMessage::new().embed(embed.to_create_embed()),
            )
            .await?;
        Ok(to_ref(&message))
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), Error> {
        serenity::ChannelId::new(message.channel_id)
            .delete_message(self.http(), serenity::MessageId::new(message.message_id))
            .await?;
        Ok(())
    }

    async fn direct_message(&self, user_id: u64, embed: Embed) -> Result<(), Error> {
        serenity::UserId::new(user_id)
            .direct_message(
                &self.ctx,
                serenity::CreateMessage::new().embed(embed.to_create_embed()),
            )
            .await?;
        Ok(())
    }

    async fn await_reply(
        &self,
        channel_id: u64,
        author_id: u64,
        timeout: Duration,
    ) -> Result<Option<String>, Error> {
        let reply = serenity::MessageCollector::new(&self.ctx)
            .channel_id(serenity::ChannelId::new(channel_id))
            .author_id(serenity::UserId::new(author_id))
            .timeout(timeout)
            .next()
            .await;

        Ok(reply.map(|message| message.content))
    }

    async fn guild(&self, guild_id: u64) -> Result<GuildInfo, Error> {
        let id = serenity::GuildId::new(guild_id);
        let guild = id.to_partial_guild_with_counts(self.http()).await?;
        let channels = id.channels(self.http()).await?;

        let mut counts = ChannelCounts::default();
        for channel in channels.values() {
            match channel_kind(channel.kind) {
                ChannelKind::Text => counts.text += 1,
                ChannelKind::Voice | ChannelKind::Stage => counts.voice += 1,
                ChannelKind::Category => counts.category += 1,
                ChannelKind::Announcement => counts.announcement += 1,
                ChannelKind::Thread => counts.thread += 1,
                ChannelKind::Forum => counts.forum += 1,
                ChannelKind::Other => {}
            }
        }

        Ok(GuildInfo {
            id: guild_id,
            name: guild.name.clone(),
            owner_id: guild.owner_id.get(),
            member_count: guild.approximate_member_count.unwrap_or_default(),
            role_count: guild.roles.len(),
            emoji_count: guild.emojis.len(),
            boost_tier: u8::from(guild.premium_tier),
            boost_count: guild.premium_subscription_count.unwrap_or_default(),
            channels: counts,
            icon_url: guild.icon_url(),
        })
    }

    async fn member(&self, guild_id: u64, user_id: u64) -> Result<Option<MemberInfo>, Error> {
        let guild_id = serenity::GuildId::new(guild_id);
        let user_id = serenity::UserId::new(user_id);

        let Some(member) = self.fetch_member(guild_id, user_id).await? else {
            return Ok(None);
        };
        let guild = guild_id.to_partial_guild(self.http()).await?;
        let resolved = resolve_member(&guild, &member);

        Ok(Some(MemberInfo {
            user_id: user_id.get(),
            tag: member.user.tag(),
            is_bot: member.user.bot,
            is_owner: resolved.is_owner,
            roles: resolved.roles.iter().map(|role| role.get()).collect(),
            permissions: resolved.permissions,
            highest_role_position: resolved.highest_role_position,
            avatar_url: Some(member.user.face()),
            voice_channel_id: self.voice_channel_of(guild_id, user_id),
        }))
    }

    async fn bot_highest_role_position(&self, guild_id: u64) -> Result<u16, Error> {
        let bot_id = self.ctx.cache.current_user().id;
        let position = self
            .member(guild_id, bot_id.get())
            .await?
            .map_or(0, |member| member.highest_role_position);
        Ok(position)
    }

    async fn channel_kind(&self, guild_id: u64, channel_id: u64) -> Result<Option<ChannelKind>, Error> {
        let channels = serenity::GuildId::new(guild_id)
            .channels(self.http())
            .await?;

        Ok(channels
            .get(&serenity::ChannelId::new(channel_id))
            .map(|channel| channel_kind(channel.kind)))
    }

    async fn role_name(&self, guild_id: u64, role_id: u64) -> Result<Option<String>, Error> {
        let roles = serenity::GuildId::new(guild_id).roles(self.http()).await?;
        Ok(roles
            .get(&serenity::RoleId::new(role_id))
            .map(|role| role.name.clone()))
    }

    async fn ban(&self, guild_id: u64, user_id: u64, reason: &str) -> Result<(), Error> {
        serenity::GuildId::new(guild_id)
            .ban_with_reason(self.http(), serenity::UserId::new(user_id), 0, reason)
            .await?;
        Ok(())
    }

    async fn kick(&self, guild_id: u64, user_id: u64, reason: &str) -> Result<(), Error> {
        serenity::GuildId::new(guild_id)
            .kick_with_reason(self.http(), serenity::UserId::new(user_id), reason)
            .await?;
        Ok(())
    }

    async fn timeout(
        &self,
        guild_id: u64,
        user_id: u64,
        duration: Duration,
        reason: &str,
    ) -> Result<(), Error> {
        let until_unix = SystemTime::now()
            .checked_add(duration)
            .unwrap_or(SystemTime::now())
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs()) as i64;
        let until = serenity::Timestamp::from_unix_timestamp(until_unix)?;

        let edit = serenity::EditMember::new()
            .disable_communication_until_datetime(until)
            .audit_log_reason(reason);
        serenity::GuildId::new(guild_id)
            .edit_member(self.http(), serenity::UserId::new(user_id), edit)
            .await?;
        Ok(())
    }

    async fn latency(&self) -> Option<Duration> {
        let manager = self.shard_manager.as_ref()?;
        let runners = manager.runners.lock().await;
        runners
            .get(&self.ctx.shard_id)
            .and_then(|runner| runner.latency)
    }
}
