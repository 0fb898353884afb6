pub mod guild_config;
pub(crate) mod snowflake;

pub use guild_config::{ConfigKey, ConfigUpdate, EnabledLogs, GuildConfig, LogCategory};
