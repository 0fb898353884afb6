use vigia_database::GuildConfig;
use vigia_utils::embed::Embed;

use crate::dispatch::InboundMessage;
use crate::registry::CommandMeta;
use crate::surface::{ChatSurface, MemberInfo, MessageRef};
use crate::{Data, Error};

/// Everything a handler receives for one authorized, off-cooldown invocation.
pub struct Invocation<'a> {
    pub data: &'a Data,
    pub surface: &'a dyn ChatSurface,
    pub message: &'a InboundMessage,
    pub guild_id: u64,
    pub actor: &'a MemberInfo,
    /// Guild configuration as read before authorization.
    pub config: GuildConfig,
    pub prefix: &'a str,
    pub meta: CommandMeta,
    pub args: &'a [String],
}

impl Invocation<'_> {
    pub fn trigger(&self) -> MessageRef {
        self.message.reference()
    }

    pub fn channel_id(&self) -> u64 {
        self.message.channel_id
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Arguments from `index` on, joined by single spaces.
    pub fn rest(&self, index: usize) -> Option<String> {
        let rest = self.args.get(index..)?;
        (!rest.is_empty()).then(|| rest.join(" "))
    }

    pub fn usage(&self) -> String {
        format!("Usage: `{}`", self.meta.usage_with_prefix(self.prefix))
    }

    pub async fn reply(&self, content: impl AsRef<str>) -> Result<MessageRef, Error> {
        self.surface.reply(self.trigger(), content.as_ref()).await
    }

    pub async fn reply_embed(&self, embed: Embed) -> Result<MessageRef, Error> {
        self.surface.reply_embed(self.trigger(), embed).await
    }
}
