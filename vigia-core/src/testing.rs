//! Recording fakes for the collaborator traits.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use poise::serenity_prelude as serenity;

use vigia_database::ConfigStore;
use vigia_utils::embed::Embed;

use crate::audit::{AuditLog, AuditRecord};
use crate::dispatch::InboundMessage;
use crate::playback::{PlayRequest, PlaybackEngine};
use crate::registry::{CommandRecord, CommandRegistry};
use crate::settings::Settings;
use crate::surface::{ChannelKind, ChatSurface, GuildInfo, MemberInfo, MessageRef};
use crate::{Data, Error};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    pub id: MessageRef,
    pub reply_to: Option<u64>,
    pub content: Option<String>,
    pub embed: Option<Embed>,
}

impl SentMessage {
    /// Text content, or the embed's title and description.
    pub fn text(&self) -> String {
        match (&self.content, &self.embed) {
            (Some(content), _) => content.clone(),
            (None, Some(embed)) => {
                format!("{} {}", embed.title, embed.description.clone().unwrap_or_default())
            }
            (None, None) => String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModerationCall {
    Ban { user_id: u64, reason: String },
    Kick { user_id: u64, reason: String },
    Timeout { user_id: u64, duration: Duration, reason: String },
}

/// In-memory chat surface that records everything it is asked to do.
#[derive(Default)]
pub struct FakeSurface {
    next_id: AtomicU64,
    fail_sends: AtomicBool,
    sent: Mutex<Vec<SentMessage>>,
    deleted: Mutex<Vec<MessageRef>>,
    direct: Mutex<Vec<(u64, Embed)>>,
    actions: Mutex<Vec<ModerationCall>>,
    members: Mutex<HashMap<u64, MemberInfo>>,
    channels: Mutex<HashMap<u64, ChannelKind>>,
    roles: Mutex<HashMap<u64, String>>,
    replies: Mutex<VecDeque<Option<String>>>,
    bot_position: AtomicU64,
}

impl FakeSurface {
    pub fn new() -> Arc<Self> {
        let surface = Self::default();
        surface.next_id.store(10_000, Ordering::SeqCst);
        surface.bot_position.store(100, Ordering::SeqCst);
        Arc::new(surface)
    }

    pub fn with_member(&self, member: MemberInfo) -> &Self {
        lock(&self.members).insert(member.user_id, member);
        self
    }

    pub fn with_channel(&self, channel_id: u64, kind: ChannelKind) -> &Self {
        lock(&self.channels).insert(channel_id, kind);
        self
    }

    pub fn with_role(&self, role_id: u64, name: &str) -> &Self {
        lock(&self.roles).insert(role_id, name.to_owned());
        self
    }

    /// Queue the answer for the next `await_reply`; `None` simulates a timeout.
    pub fn queue_reply(&self, reply: Option<&str>) -> &Self {
        lock(&self.replies).push_back(reply.map(str::to_owned));
        self
    }

    pub fn set_bot_position(&self, position: u16) {
        self.bot_position.store(u64::from(position), Ordering::SeqCst);
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        lock(&self.sent).clone()
    }

    pub fn last_text(&self) -> Option<String> {
        lock(&self.sent).last().map(SentMessage::text)
    }

    pub fn deleted(&self) -> Vec<MessageRef> {
        lock(&self.deleted).clone()
    }

    pub fn direct_messages(&self) -> Vec<(u64, Embed)> {
        lock(&self.direct).clone()
    }

    pub fn actions(&self) -> Vec<ModerationCall> {
        lock(&self.actions).clone()
    }

    fn record(
        &self,
        channel_id: u64,
        reply_to: Option<u64>,
        content: Option<String>,
        embed: Option<Embed>,
    ) -> Result<MessageRef, Error> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(anyhow!("missing access"));
        }

        let id = MessageRef::new(channel_id, self.next_id.fetch_add(1, Ordering::SeqCst));
        lock(&self.sent).push(SentMessage {
            id,
            reply_to,
            content,
            embed,
        });
        Ok(id)
    }
}

#[async_trait]
impl ChatSurface for FakeSurface {
    async fn reply(&self, to: MessageRef, content: &str) -> Result<MessageRef, Error> {
        self.record(to.channel_id, Some(to.message_id), Some(content.to_owned()), None)
    }

    async fn reply_embed(&self, to: MessageRef, embed: Embed) -> Result<MessageRef, Error> {
        self.record(to.channel_id, Some(to.message_id), None, Some(embed))
    }

    async fn send(&self, channel_id: u64, content: &str) -> Result<MessageRef, Error> {
        self.record(channel_id, None, Some(content.to_owned()), None)
    }

    async fn send_embed(&self, channel_id: u64, embed: Embed) -> Result<MessageRef, Error> {
        self.record(channel_id, None, None, Some(embed))
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), Error> {
        lock(&self.deleted).push(message);
        Ok(())
    }

    async fn direct_message(&self, user_id: u64, embed: Embed) -> Result<(), Error> {
        lock(&self.direct).push((user_id, embed));
        Ok(())
    }

    async fn await_reply(
        &self,
        _channel_id: u64,
        _author_id: u64,
        _timeout: Duration,
    ) -> Result<Option<String>, Error> {
        Ok(lock(&self.replies).pop_front().flatten())
    }

    async fn guild(&self, guild_id: u64) -> Result<GuildInfo, Error> {
        let channels = lock(&self.channels);
        let count = |kind: ChannelKind| channels.values().filter(|k| **k == kind).count();

        Ok(GuildInfo {
            id: guild_id,
            name: "Test Guild".to_owned(),
            owner_id: 1,
            member_count: lock(&self.members).len() as u64,
            role_count: lock(&self.roles).len(),
            emoji_count: 0,
            boost_tier: 0,
            boost_count: 0,
            channels: crate::surface::ChannelCounts {
                text: count(ChannelKind::Text),
                voice: count(ChannelKind::Voice),
                category: count(ChannelKind::Category),
                announcement: count(ChannelKind::Announcement),
                thread: count(ChannelKind::Thread),
                forum: count(ChannelKind::Forum),
            },
            icon_url: None,
        })
    }

    async fn member(&self, _guild_id: u64, user_id: u64) -> Result<Option<MemberInfo>, Error> {
        Ok(lock(&self.members).get(&user_id).cloned())
    }

    async fn bot_highest_role_position(&self, _guild_id: u64) -> Result<u16, Error> {
        Ok(u16::try_from(self.bot_position.load(Ordering::SeqCst)).unwrap_or(u16::MAX))
    }

    async fn channel_kind(&self, _guild_id: u64, channel_id: u64) -> Result<Option<ChannelKind>, Error> {
        Ok(lock(&self.channels).get(&channel_id).copied())
    }

    async fn role_name(&self, _guild_id: u64, role_id: u64) -> Result<Option<String>, Error> {
        Ok(lock(&self.roles).get(&role_id).cloned())
    }

    async fn ban(&self, _guild_id: u64, user_id: u64, reason: &str) -> Result<(), Error> {
        lock(&self.actions).push(ModerationCall::Ban {
            user_id,
            reason: reason.to_owned(),
        });
        Ok(())
    }

    async fn kick(&self, _guild_id: u64, user_id: u64, reason: &str) -> Result<(), Error> {
        lock(&self.actions).push(ModerationCall::Kick {
            user_id,
            reason: reason.to_owned(),
        });
        Ok(())
    }

    async fn timeout(
        &self,
        _guild_id: u64,
        user_id: u64,
        duration: Duration,
        reason: &str,
    ) -> Result<(), Error> {
        lock(&self.actions).push(ModerationCall::Timeout {
            user_id,
            duration,
            reason: reason.to_owned(),
        });
        Ok(())
    }

    async fn latency(&self) -> Option<Duration> {
        Some(Duration::from_millis(42))
    }
}

/// Audit sink that keeps every record, optionally failing each delivery.
#[derive(Default)]
pub struct RecordingAudit {
    records: Mutex<Vec<AuditRecord>>,
    fail: AtomicBool,
}

impl RecordingAudit {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let audit = Self::default();
        audit.fail.store(true, Ordering::SeqCst);
        Arc::new(audit)
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        lock(&self.records).clone()
    }

    pub fn titles(&self) -> Vec<String> {
        lock(&self.records)
            .iter()
            .map(|record| record.embed.title.clone())
            .collect()
    }
}

#[async_trait]
impl AuditLog for RecordingAudit {
    async fn send_log(&self, record: AuditRecord) -> Result<(), Error> {
        lock(&self.records).push(record);
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("log channel unavailable"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackCall {
    Play(PlayRequest),
    Skip(u64),
    Stop(u64),
    Pause(u64),
    Resume(u64),
}

#[derive(Default)]
pub struct RecordingPlayback {
    calls: Mutex<Vec<PlaybackCall>>,
    fail: AtomicBool,
}

impl RecordingPlayback {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<PlaybackCall> {
        lock(&self.calls).clone()
    }

    fn push(&self, call: PlaybackCall) -> Result<(), Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("no results found"));
        }
        lock(&self.calls).push(call);
        Ok(())
    }
}

#[async_trait]
impl PlaybackEngine for RecordingPlayback {
    async fn play(&self, request: PlayRequest) -> Result<(), Error> {
        self.push(PlaybackCall::Play(request))
    }

    async fn skip(&self, guild_id: u64) -> Result<(), Error> {
        self.push(PlaybackCall::Skip(guild_id))
    }

    async fn stop(&self, guild_id: u64) -> Result<(), Error> {
        self.push(PlaybackCall::Stop(guild_id))
    }

    async fn pause(&self, guild_id: u64) -> Result<(), Error> {
        self.push(PlaybackCall::Pause(guild_id))
    }

    async fn resume(&self, guild_id: u64) -> Result<(), Error> {
        self.push(PlaybackCall::Resume(guild_id))
    }
}

pub const GUILD: u64 = 500;
pub const CHANNEL: u64 = 600;
pub const OWNER: u64 = 1;

/// A plain member with no roles or permissions.
pub fn member(user_id: u64) -> MemberInfo {
    MemberInfo {
        user_id,
        tag: format!("user{user_id}"),
        is_bot: false,
        is_owner: user_id == OWNER,
        roles: Vec::new(),
        permissions: serenity::Permissions::empty(),
        highest_role_position: 0,
        avatar_url: None,
        voice_channel_id: None,
    }
}

pub fn message(id: u64, author_id: u64, content: &str) -> InboundMessage {
    InboundMessage {
        id,
        channel_id: CHANNEL,
        guild_id: Some(GUILD),
        author_id,
        author_tag: format!("user{author_id}"),
        author_is_bot: false,
        content: content.to_owned(),
    }
}

/// `Data` over an in-memory store with a recording audit sink.
pub fn data(records: Vec<CommandRecord>, audit: Arc<RecordingAudit>) -> Result<Data, Error> {
    let registry = CommandRegistry::new(records)?;
    Ok(Data::new(
        ConfigStore::in_memory(),
        registry,
        audit,
        Settings::default(),
    ))
}
