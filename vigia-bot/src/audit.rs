use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use tracing::info;

use vigia_core::{AuditLog, AuditRecord, Error};
use vigia_database::ConfigStore;

/// Posts audit records to the guild's log channel, or the global fallback.
#[derive(Clone)]
pub struct ChannelAuditLog {
    http: Arc<serenity::Http>,
    store: ConfigStore,
    fallback_channel_id: Option<u64>,
}

impl ChannelAuditLog {
    pub fn new(http: Arc<serenity::Http>, store: ConfigStore, fallback_channel_id: Option<u64>) -> Self {
        Self {
            http,
            store,
            fallback_channel_id,
        }
    }

    async fn target_channel(&self, guild_id: Option<u64>) -> Option<u64> {
        if let Some(guild_id) = guild_id
            && let Some(channel_id) = self.store.get(guild_id).await.log_channel
        {
            return Some(channel_id);
        }

        self.fallback_channel_id
    }
}

#[async_trait]
impl AuditLog for ChannelAuditLog {
    async fn send_log(&self, record: AuditRecord) -> Result<(), Error> {
        let Some(channel_id) = self.target_channel(record.guild_id).await else {
            info!(
                guild_id = ?record.guild_id,
                title = %record.embed.title,
                "no log channel configured; audit record only traced"
            );
            return Ok(());
        };

        serenity::ChannelId::new(channel_id)
            .send_message(
                self.http.as_ref(),
                serenity::CreateMessage::new().embed(record.embed.to_create_embed()),
            )
            .await?;

        Ok(())
    }
}
