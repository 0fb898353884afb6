use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;

use vigia_core::Settings;
use vigia_core::settings::DEFAULT_NOTICE_TTL;
use vigia_utils::DEFAULT_PREFIX;

pub const DEFAULT_CONFIG_PATH: &str = "data/serverConfig.json";
pub const DEFAULT_REDIS_KEY_PREFIX: &str = "vigia:prod";
pub const DEFAULT_COOLDOWN_SWEEP: Duration = Duration::from_secs(60);

/// Everything read from the environment at startup.
#[derive(Clone, Debug)]
pub struct BotConfig {
    pub token: String,
    pub settings: Settings,
    pub config_path: PathBuf,
    pub redis_enabled: bool,
    pub redis_url: Option<String>,
    pub redis_key_prefix: String,
    pub cooldown_sweep: Duration,
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let token = env::var("DISCORD_TOKEN").context("DISCORD_TOKEN is not set")?;

        let default_prefix = env::var("COMMAND_PREFIX")
            .ok()
            .map(|prefix| prefix.trim().to_owned())
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or_else(|| DEFAULT_PREFIX.to_owned());

        let settings = Settings {
            default_prefix,
            super_admin_role_id: env_id("SUPER_ADMIN_ROLE_ID"),
            log_channel_id: env_id("LOG_CHANNEL_ID"),
            notice_ttl: Duration::from_secs(env_u64(
                "NOTICE_TTL_SECONDS",
                DEFAULT_NOTICE_TTL.as_secs(),
            )),
            ..Settings::default()
        };

        Ok(Self {
            token,
            settings,
            config_path: env::var("CONFIG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH)),
            redis_enabled: env_bool("REDIS_ENABLED", false),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
            redis_key_prefix: env::var("REDIS_KEY_PREFIX")
                .unwrap_or_else(|_| DEFAULT_REDIS_KEY_PREFIX.to_owned()),
            cooldown_sweep: Duration::from_secs(
                env_u64("COOLDOWN_SWEEP_SECONDS", DEFAULT_COOLDOWN_SWEEP.as_secs()).max(1),
            ),
        })
    }
}

pub fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => parse_bool(&value),
        Err(_) => default,
    }
}

pub fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

fn env_id(key: &str) -> Option<u64> {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|id| *id != 0)
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::parse_bool;

    #[test]
    fn accepts_common_truthy_spellings() {
        for value in ["1", "true", "YES", " on "] {
            assert!(parse_bool(value), "{value}");
        }
        for value in ["0", "false", "off", "", "enabled"] {
            assert!(!parse_bool(value), "{value}");
        }
    }
}
