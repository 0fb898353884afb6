use std::time::Duration;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;

use vigia_utils::embed::Embed;

use crate::Error;

/// A posted message, addressed by channel and id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub channel_id: u64,
    pub message_id: u64,
}

impl MessageRef {
    pub fn new(channel_id: u64, message_id: u64) -> Self {
        Self {
            channel_id,
            message_id,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    Announcement,
    Voice,
    Stage,
    Category,
    Thread,
    Forum,
    Other,
}

impl ChannelKind {
    /// Channels that can receive bot text messages.
    pub fn is_text_like(self) -> bool {
        matches!(self, ChannelKind::Text | ChannelKind::Announcement)
    }
}

/// A guild member as seen by the authorization and moderation paths.
#[derive(Clone, Debug)]
pub struct MemberInfo {
    pub user_id: u64,
    pub tag: String,
    pub is_bot: bool,
    pub is_owner: bool,
    pub roles: Vec<u64>,
    pub permissions: serenity::Permissions,
    pub highest_role_position: u16,
    pub avatar_url: Option<String>,
    pub voice_channel_id: Option<u64>,
}

impl MemberInfo {
    pub fn has_role(&self, role_id: u64) -> bool {
        self.roles.contains(&role_id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelCounts {
    pub text: usize,
    pub voice: usize,
    pub category: usize,
    pub announcement: usize,
    pub thread: usize,
    pub forum: usize,
}

#[derive(Clone, Debug)]
pub struct GuildInfo {
    pub id: u64,
    pub name: String,
    pub owner_id: u64,
    pub member_count: u64,
    pub role_count: usize,
    pub emoji_count: usize,
    pub boost_tier: u8,
    pub boost_count: u64,
    pub channels: ChannelCounts,
    pub icon_url: Option<String>,
}

/// Everything the bot needs from the chat platform while handling a command.
///
/// The gateway adapter implements this over serenity; tests use a recording
/// fake. Identifiers are raw snowflakes.
#[async_trait]
pub trait ChatSurface: Send + Sync {
    async fn reply(&self, to: MessageRef, content: &str) -> Result<MessageRef, Error>;

    async fn reply_embed(&self, to: MessageRef, embed: Embed) -> Result<MessageRef, Error>;

    async fn send(&self, channel_id: u64, content: &str) -> Result<MessageRef, Error>;

    async fn send_embed(&self, channel_id: u64, embed: Embed) -> Result<MessageRef, Error>;

    async fn delete_message(&self, message: MessageRef) -> Result<(), Error>;

    async fn direct_message(&self, user_id: u64, embed: Embed) -> Result<(), Error>;

    /// Wait for the next message by `author_id` in `channel_id`.
    async fn await_reply(
        &self,
        channel_id: u64,
        author_id: u64,
        timeout: Duration,
    ) -> Result<Option<String>, Error>;

    async fn guild(&self, guild_id: u64) -> Result<GuildInfo, Error>;

    async fn member(&self, guild_id: u64, user_id: u64) -> Result<Option<MemberInfo>, Error>;

    /// Highest role position held by the bot itself.
    async fn bot_highest_role_position(&self, guild_id: u64) -> Result<u16, Error>;

    async fn channel_kind(&self, guild_id: u64, channel_id: u64) -> Result<Option<ChannelKind>, Error>;

    async fn role_name(&self, guild_id: u64, role_id: u64) -> Result<Option<String>, Error>;

    async fn ban(&self, guild_id: u64, user_id: u64, reason: &str) -> Result<(), Error>;

    async fn kick(&self, guild_id: u64, user_id: u64, reason: &str) -> Result<(), Error>;

    async fn timeout(
        &self,
        guild_id: u64,
        user_id: u64,
        duration: Duration,
        reason: &str,
    ) -> Result<(), Error>;

    /// Round-trip latency to the gateway, when known.
    async fn latency(&self) -> Option<Duration>;
}
