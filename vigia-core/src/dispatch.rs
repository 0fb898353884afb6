use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use poise::serenity_prelude as serenity;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use vigia_utils::embed::{ColorTag, Embed};
use vigia_utils::formatting::{format_seconds_one_decimal, user_label};

use crate::Data;
use crate::audit::{AuditRecord, send_log_quietly};
use crate::cooldown::CooldownStatus;
use crate::gate::{ActorContext, Decision, DenyReason};
use crate::invocation::Invocation;
use crate::surface::{ChatSurface, MemberInfo, MessageRef};

pub const FAILURE_NOTICE: &str = "There was an error executing this command.";

/// A chat message as delivered by the gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub id: u64,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub author_id: u64,
    pub author_tag: String,
    pub author_is_bot: bool,
    pub content: String,
}

impl InboundMessage {
    pub fn reference(&self) -> MessageRef {
        MessageRef::new(self.channel_id, self.id)
    }
}

/// Terminal state of one dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Not a command: bot author, direct message, or missing prefix.
    Ignored,
    /// Prefixed, but the token names no registered command.
    Unresolved,
    Denied(DenyReason),
    Waiting(Duration),
    Succeeded,
    Failed(String),
}

/// Split a prefixed line into a lowercased command token and its arguments.
pub fn parse_command_line(content: &str, prefix: &str) -> Option<(String, Vec<String>)> {
    if prefix.is_empty() {
        return None;
    }

    let rest = content.strip_prefix(prefix)?;
    let mut tokens = rest.split_whitespace();
    let command = tokens.next()?.to_lowercase();
    let args = tokens.map(str::to_owned).collect();

    Some((command, args))
}

/// Delete `messages` after `delay` on a detached task. Failures are only traced.
pub fn schedule_deletion(surface: Arc<dyn ChatSurface>, messages: Vec<MessageRef>, delay: Duration) {
    if messages.is_empty() {
        return;
    }

    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        for message in messages {
            if let Err(source) = surface.delete_message(message).await {
                debug!(?source, message_id = message.message_id, "transient message already gone");
            }
        }
    });
}

/// Routes inbound messages through authorization, cooldowns and handlers.
#[derive(Clone)]
pub struct CommandDispatcher {
    data: Data,
}

impl CommandDispatcher {
    pub fn new(data: Data) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub async fn dispatch(
        &self,
        surface: Arc<dyn ChatSurface>,
        message: &InboundMessage,
        now: Instant,
    ) -> Outcome {
        if message.author_is_bot {
            return Outcome::Ignored;
        }
        let Some(guild_id) = message.guild_id else {
            return Outcome::Ignored;
        };

        let data = &self.data;
        let config = data.store.get(guild_id).await;
        let prefix = config.effective_prefix(&data.settings.default_prefix).to_owned();

        let Some((token, args)) = parse_command_line(&message.content, &prefix) else {
            return Outcome::Ignored;
        };
        let Some(record) = data.registry.resolve(&token) else {
            debug!(guild_id, command = %token, "unresolved command");
            return Outcome::Unresolved;
        };
        let meta = record.meta;

        let actor = self.resolve_actor(surface.as_ref(), guild_id, message).await;

        if let Decision::Denied(reason) =
            data.gate().authorize(&ActorContext::from(&actor), &config, &token)
        {
            info!(guild_id, command = meta.name, user_id = message.author_id, ?reason, "command denied");
            self.report_denial(&surface, message, guild_id, meta.name, reason)
                .await;
            return Outcome::Denied(reason);
        }

        if let CooldownStatus::Wait(remaining) =
            data.cooldowns
                .acquire(meta.name, message.author_id, now, meta.cooldown())
        {
            let notice = format!(
                "Please wait {} before using `{}` again.",
                format_seconds_one_decimal(remaining.as_secs_f64()),
                meta.name
            );
            match surface.reply(message.reference(), &notice).await {
                Ok(sent) => schedule_deletion(surface.clone(), vec![sent], data.settings.notice_ttl),
                Err(source) => warn!(?source, "failed to send cooldown notice"),
            }
            return Outcome::Waiting(remaining);
        }

        let invocation = Invocation {
            data,
            surface: surface.as_ref(),
            message,
            guild_id,
            actor: &actor,
            config,
            prefix: &prefix,
            meta,
            args: &args,
        };

        let result = AssertUnwindSafe(record.handler.run(invocation))
            .catch_unwind()
            .await;

        let failure = match result {
            Ok(Ok(())) => return Outcome::Succeeded,
            Ok(Err(err)) => format!("{err:#}"),
            Err(panic) => format!("handler panicked: {}", panic_message(panic.as_ref())),
        };

        error!(guild_id, command = meta.name, user_id = message.author_id, error = %failure, "command failed");
        self.report_failure(&surface, message, guild_id, meta.name, &failure)
            .await;

        Outcome::Failed(failure)
    }

    async fn resolve_actor(
        &self,
        surface: &dyn ChatSurface,
        guild_id: u64,
        message: &InboundMessage,
    ) -> MemberInfo {
        match surface.member(guild_id, message.author_id).await {
            Ok(Some(member)) => return member,
            Ok(None) => debug!(guild_id, user_id = message.author_id, "author is not a cached member"),
            Err(source) => warn!(?source, guild_id, user_id = message.author_id, "failed to resolve author"),
        }

        MemberInfo {
            user_id: message.author_id,
            tag: message.author_tag.clone(),
            is_bot: message.author_is_bot,
            is_owner: false,
            roles: Vec::new(),
            permissions: serenity::Permissions::empty(),
            highest_role_position: 0,
            avatar_url: None,
            voice_channel_id: None,
        }
    }

    async fn report_denial(
        &self,
        surface: &Arc<dyn ChatSurface>,
        message: &InboundMessage,
        guild_id: u64,
        command: &str,
        reason: DenyReason,
    ) {
        let embed = Embed::new("Permission Denied", ColorTag::Orange)
            .field("User", user_label(&message.author_tag, message.author_id), true)
            .field("Command", command, true)
            .field("Channel", format!("<#{}>", message.channel_id), true)
            .field("Reason", reason.notice(), false)
            .timestamp();
        send_log_quietly(self.data.audit.as_ref(), AuditRecord::new(Some(guild_id), embed)).await;

        self.notify_and_clean(surface, message, reason.notice()).await;
    }

    async fn report_failure(
        &self,
        surface: &Arc<dyn ChatSurface>,
        message: &InboundMessage,
        guild_id: u64,
        command: &str,
        failure: &str,
    ) {
        let embed = Embed::new("Command Error", ColorTag::Red)
            .field("Command", command, true)
            .field("User", user_label(&message.author_tag, message.author_id), true)
            .field("Channel", format!("<#{}>", message.channel_id), true)
            .field("Error", failure, false)
            .timestamp();
        send_log_quietly(self.data.audit.as_ref(), AuditRecord::new(Some(guild_id), embed)).await;

        self.notify_and_clean(surface, message, FAILURE_NOTICE).await;
    }

    /// Post `notice`, then remove it together with the trigger after the TTL.
    async fn notify_and_clean(&self, surface: &Arc<dyn ChatSurface>, message: &InboundMessage, notice: &str) {
        let mut transient = vec![message.reference()];
        match surface.reply(message.reference(), notice).await {
            Ok(sent) => transient.push(sent),
            Err(source) => warn!(?source, "failed to send notice"),
        }

        schedule_deletion(surface.clone(), transient, self.data.settings.notice_ttl);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
