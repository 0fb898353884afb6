use std::time::Duration;

use vigia_utils::DEFAULT_PREFIX;

/// How long transient denial/cooldown/error notices stay up.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

/// How long `config reset` waits for its confirmation reply.
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(15);

/// Process-wide settings resolved once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Prefix used by guilds that have not set their own.
    pub default_prefix: String,
    pub super_admin_role_id: Option<u64>,
    /// Fallback audit-log channel for guilds without a `logChannel`.
    pub log_channel_id: Option<u64>,
    pub notice_ttl: Duration,
    pub confirm_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_prefix: DEFAULT_PREFIX.to_owned(),
            super_admin_role_id: None,
            log_channel_id: None,
            notice_ttl: DEFAULT_NOTICE_TTL,
            confirm_timeout: DEFAULT_CONFIRM_TIMEOUT,
        }
    }
}
