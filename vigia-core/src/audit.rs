use async_trait::async_trait;
use tracing::{error, warn};

use vigia_utils::embed::{ColorTag, Embed};
use vigia_utils::formatting::{format_timestamp, user_label};
use vigia_utils::time::now_unix_secs;

use crate::Error;

/// A structured entry for the audit-log channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditRecord {
    /// Guild the event belongs to; `None` for process-wide events.
    pub guild_id: Option<u64>,
    pub embed: Embed,
}

impl AuditRecord {
    pub fn new(guild_id: Option<u64>, embed: Embed) -> Self {
        Self { guild_id, embed }
    }
}

/// A user referenced by a moderation record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditUser {
    pub id: u64,
    pub tag: String,
    pub avatar_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModAction {
    pub guild_id: u64,
    pub moderator: AuditUser,
    pub target: AuditUser,
    pub action: String,
    pub reason: Option<String>,
    pub duration: Option<String>,
}

impl ModAction {
    pub fn to_record(&self) -> AuditRecord {
        let mut embed = Embed::new(format!("Moderation Action: {}", self.action), ColorTag::DarkRed)
            .thumbnail(self.target.avatar_url.clone())
            .field("User", user_label(&self.target.tag, self.target.id), true)
            .field(
                "Moderator",
                user_label(&self.moderator.tag, self.moderator.id),
                true,
            )
            .field("Date", format_timestamp(now_unix_secs()), true);

        if let Some(duration) = &self.duration {
            embed = embed.field("Duration", duration.clone(), true);
        }

        embed = embed
            .field(
                "Reason",
                self.reason
                    .clone()
                    .unwrap_or_else(|| "No reason provided".to_owned()),
                false,
            )
            .timestamp();

        AuditRecord::new(Some(self.guild_id), embed)
    }
}

/// Append-only notification channel for notable events.
///
/// Implementations report their own failures; callers never abort their flow
/// because a log could not be delivered.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn send_log(&self, record: AuditRecord) -> Result<(), Error>;

    async fn log_mod_action(&self, action: &ModAction) -> Result<(), Error> {
        self.send_log(action.to_record()).await
    }

    async fn log_critical_error(&self, error: &Error, context: &str) -> Result<(), Error> {
        error!(?error, context, "critical error");

        let embed = Embed::new("Critical System Error", ColorTag::Red)
            .description(format!("**Context:** {context}\n**Error:** `{error}`"))
            .field("Details", format!("{error:?}"), false)
            .footer(format!("Recorded at {}", now_unix_secs()))
            .timestamp();

        self.send_log(AuditRecord::new(None, embed)).await
    }
}

/// Deliver `record`, reporting a failure instead of returning it.
pub async fn send_log_quietly(audit: &dyn AuditLog, record: AuditRecord) {
    if let Err(source) = audit.send_log(record).await {
        warn!(?source, "failed to deliver audit log record");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingAudit;

    fn user(id: u64) -> AuditUser {
        AuditUser {
            id,
            tag: format!("user{id}"),
            avatar_url: None,
        }
    }

    #[test]
    fn mod_action_record_lists_duration_only_when_present() {
        let mut action = ModAction {
            guild_id: 5,
            moderator: user(1),
            target: user(2),
            action: "Mute".to_owned(),
            reason: None,
            duration: Some("10m".to_owned()),
        };

        let record = action.to_record();
        assert_eq!(record.guild_id, Some(5));
        assert_eq!(record.embed.title, "Moderation Action: Mute");
        assert!(record.embed.fields.iter().any(|field| field.name == "Duration"));
        assert!(record
            .embed
            .fields
            .iter()
            .any(|field| field.name == "Reason" && field.value == "No reason provided"));

        action.duration = None;
        assert!(!action.to_record().embed.fields.iter().any(|field| field.name == "Duration"));
    }

    #[tokio::test]
    async fn critical_errors_are_process_wide() {
        let audit = RecordingAudit::new();

        audit
            .log_critical_error(&anyhow::anyhow!("gateway closed"), "shard runner")
            .await
            .expect("recorded");

        let records = audit.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].guild_id, None);
        assert!(records[0]
            .embed
            .description
            .as_deref()
            .is_some_and(|text| text.contains("shard runner")));
    }

    #[tokio::test]
    async fn quiet_delivery_swallows_failures() {
        let audit = RecordingAudit::failing();

        send_log_quietly(audit.as_ref(), AuditRecord::new(None, Embed::new("x", ColorTag::Grey))).await;

        assert_eq!(audit.records().len(), 1);
    }
}
