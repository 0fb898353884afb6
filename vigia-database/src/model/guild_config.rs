use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::snowflake;

/// Prefix applied to guilds that never configured one.
pub const DEFAULT_PREFIX: &str = "!";

/// Audit-log categories a guild can switch on and off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogCategory {
    Messages,
    Voice,
    Moderation,
    Server,
    Join,
    Leave,
}

impl LogCategory {
    pub const ALL: [LogCategory; 6] = [
        LogCategory::Messages,
        LogCategory::Voice,
        LogCategory::Moderation,
        LogCategory::Server,
        LogCategory::Join,
        LogCategory::Leave,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogCategory::Messages => "messages",
            LogCategory::Voice => "voice",
            LogCategory::Moderation => "moderation",
            LogCategory::Server => "server",
            LogCategory::Join => "join",
            LogCategory::Leave => "leave",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log category `{0}`")]
pub struct UnknownLogCategory(pub String);

impl FromStr for LogCategory {
    type Err = UnknownLogCategory;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        LogCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownLogCategory(wanted.to_owned()))
    }
}

/// Per-category log switches.
///
/// Every known category is always present. Keys written by other versions of
/// the bot are kept as-is so a round trip through the store never loses them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnabledLogs(BTreeMap<String, bool>);

impl Default for EnabledLogs {
    fn default() -> Self {
        Self(
            LogCategory::ALL
                .into_iter()
                .map(|category| (category.as_str().to_owned(), true))
                .collect(),
        )
    }
}

impl EnabledLogs {
    pub fn is_enabled(&self, category: LogCategory) -> bool {
        self.0.get(category.as_str()).copied().unwrap_or(false)
    }

    /// Flip one category and return its new state.
    pub fn toggle(&mut self, category: LogCategory) -> bool {
        let entry = self.0.entry(category.as_str().to_owned()).or_insert(true);
        *entry = !*entry;
        *entry
    }

    /// Known categories in display order.
    pub fn categories(&self) -> impl Iterator<Item = (LogCategory, bool)> + '_ {
        LogCategory::ALL
            .into_iter()
            .map(|category| (category, self.is_enabled(category)))
    }

    /// Keys that are not part of [`LogCategory`].
    pub fn extra_keys(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.0
            .iter()
            .filter(|(key, _)| key.parse::<LogCategory>().is_err())
            .map(|(key, enabled)| (key.as_str(), *enabled))
    }

    fn fill_missing(&mut self) {
        for category in LogCategory::ALL {
            self.0.entry(category.as_str().to_owned()).or_insert(true);
        }
    }
}

impl<'de> Deserialize<'de> for EnabledLogs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = Option::<BTreeMap<String, bool>>::deserialize(deserializer)?;
        let mut logs = EnabledLogs(stored.unwrap_or_default());
        logs.fill_missing();
        Ok(logs)
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeSet<String>, D::Error> {
    Ok(Option::<BTreeSet<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One guild's configuration record, as persisted in the config table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuildConfig {
    pub prefix: String,
    #[serde(with = "snowflake::option")]
    pub log_channel: Option<u64>,
    #[serde(with = "snowflake::option")]
    pub welcome_channel: Option<u64>,
    #[serde(with = "snowflake::option")]
    pub auto_role: Option<u64>,
    #[serde(with = "snowflake::option")]
    pub music_channel: Option<u64>,
    #[serde(with = "snowflake::option")]
    pub dj_role: Option<u64>,
    #[serde(with = "snowflake::set")]
    pub mod_roles: BTreeSet<u64>,
    #[serde(deserialize_with = "null_as_empty")]
    pub disabled_commands: BTreeSet<String>,
    pub enabled_logs: EnabledLogs,
}

impl Default for GuildConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_owned(),
            log_channel: None,
            welcome_channel: None,
            auto_role: None,
            music_channel: None,
            dj_role: None,
            mod_roles: BTreeSet::new(),
            disabled_commands: BTreeSet::new(),
            enabled_logs: EnabledLogs::default(),
        }
    }
}

impl GuildConfig {
    /// The prefix to match against, falling back when the stored one is empty.
    pub fn effective_prefix<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.prefix.trim().is_empty() {
            fallback
        } else {
            &self.prefix
        }
    }

    pub fn is_command_disabled(&self, name: &str) -> bool {
        self.disabled_commands.contains(name)
    }

    pub fn is_mod_role(&self, role_id: u64) -> bool {
        self.mod_roles.contains(&role_id)
    }
}

/// Settable scalar options of a [`GuildConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Prefix,
    LogChannel,
    WelcomeChannel,
    AutoRole,
    MusicChannel,
    DjRole,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::Prefix,
        ConfigKey::LogChannel,
        ConfigKey::WelcomeChannel,
        ConfigKey::AutoRole,
        ConfigKey::MusicChannel,
        ConfigKey::DjRole,
    ];

    /// Option name as typed by users (`config set <option>`).
    pub fn option_name(self) -> &'static str {
        match self {
            ConfigKey::Prefix => "prefix",
            ConfigKey::LogChannel => "logchannel",
            ConfigKey::WelcomeChannel => "welcomechannel",
            ConfigKey::AutoRole => "autorole",
            ConfigKey::MusicChannel => "musicchannel",
            ConfigKey::DjRole => "djrole",
        }
    }

    /// Parse a user-typed option name, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim();
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.option_name().eq_ignore_ascii_case(wanted))
    }

    pub fn is_channel(self) -> bool {
        matches!(
            self,
            ConfigKey::LogChannel | ConfigKey::WelcomeChannel | ConfigKey::MusicChannel
        )
    }

    pub fn is_role(self) -> bool {
        matches!(self, ConfigKey::AutoRole | ConfigKey::DjRole)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.option_name())
    }
}

/// A single-field write to a [`GuildConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigUpdate {
    Prefix(String),
    LogChannel(Option<u64>),
    WelcomeChannel(Option<u64>),
    AutoRole(Option<u64>),
    MusicChannel(Option<u64>),
    DjRole(Option<u64>),
}

impl ConfigUpdate {
    /// Build an identifier update for a channel or role key.
    ///
    /// Returns `None` for [`ConfigKey::Prefix`], which carries text instead.
    pub fn with_id(key: ConfigKey, id: Option<u64>) -> Option<Self> {
        match key {
            ConfigKey::Prefix => None,
            ConfigKey::LogChannel => Some(ConfigUpdate::LogChannel(id)),
            ConfigKey::WelcomeChannel => Some(ConfigUpdate::WelcomeChannel(id)),
            ConfigKey::AutoRole => Some(ConfigUpdate::AutoRole(id)),
            ConfigKey::MusicChannel => Some(ConfigUpdate::MusicChannel(id)),
            ConfigKey::DjRole => Some(ConfigUpdate::DjRole(id)),
        }
    }

    pub fn key(&self) -> ConfigKey {
        match self {
            ConfigUpdate::Prefix(_) => ConfigKey::Prefix,
            ConfigUpdate::LogChannel(_) => ConfigKey::LogChannel,
            ConfigUpdate::WelcomeChannel(_) => ConfigKey::WelcomeChannel,
            ConfigUpdate::AutoRole(_) => ConfigKey::AutoRole,
            ConfigUpdate::MusicChannel(_) => ConfigKey::MusicChannel,
            ConfigUpdate::DjRole(_) => ConfigKey::DjRole,
        }
    }

    /// Apply to `config`, returning whether anything changed.
    pub fn apply(self, config: &mut GuildConfig) -> bool {
        fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                return false;
            }
            *slot = value;
            true
        }

        match self {
            ConfigUpdate::Prefix(prefix) => replace(&mut config.prefix, prefix),
            ConfigUpdate::LogChannel(id) => replace(&mut config.log_channel, id),
            ConfigUpdate::WelcomeChannel(id) => replace(&mut config.welcome_channel, id),
            ConfigUpdate::AutoRole(id) => replace(&mut config.auto_role, id),
            ConfigUpdate::MusicChannel(id) => replace(&mut config.music_channel, id),
            ConfigUpdate::DjRole(id) => replace(&mut config.dj_role, id),
        }
    }
}
