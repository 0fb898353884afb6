mod json_store;
mod noop_store;
mod redis_store;

use std::collections::BTreeMap;
use std::path::PathBuf;

use json_store::JsonConfigStore;
use noop_store::NoopConfigStore;
use redis_store::RedisConfigStore;

use crate::error::StorageError;
use crate::model::GuildConfig;

/// Where the config table lives between restarts.
#[derive(Clone, Debug)]
pub enum ConfigBackend {
    Memory(NoopConfigStore),
    JsonFile(JsonConfigStore),
    Redis(RedisConfigStore),
}

impl ConfigBackend {
    pub fn memory() -> Self {
        Self::Memory(NoopConfigStore)
    }

    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self::JsonFile(JsonConfigStore::new(path))
    }

    pub fn redis(redis_url: &str, key_prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self::Redis(RedisConfigStore::from_url(redis_url, key_prefix)?))
    }

    pub fn describe(&self) -> String {
        match self {
            ConfigBackend::Memory(_) => "memory".to_owned(),
            ConfigBackend::JsonFile(store) => format!("json:{}", store.path().display()),
            ConfigBackend::Redis(store) => format!("redis:{}", store.key_prefix()),
        }
    }

    /// Health check; only meaningful for networked backends.
    pub async fn ping(&self) -> anyhow::Result<()> {
        match self {
            ConfigBackend::Redis(store) => store.ping().await,
            _ => Ok(()),
        }
    }

    pub(crate) async fn load_all(&self) -> Result<BTreeMap<u64, GuildConfig>, StorageError> {
        match self {
            ConfigBackend::Memory(store) => store.load_all().await,
            ConfigBackend::JsonFile(store) => store.load_all().await,
            ConfigBackend::Redis(store) => store.load_all().await,
        }
    }

    pub(crate) async fn load_guild(&self, guild_id: u64) -> Result<Option<GuildConfig>, StorageError> {
        match self {
            ConfigBackend::Memory(store) => store.load_guild(guild_id).await,
            ConfigBackend::JsonFile(store) => store.load_guild(guild_id).await,
            ConfigBackend::Redis(store) => store.load_guild(guild_id).await,
        }
    }

    /// Persist after `guild_id` changed. File backends write the whole table,
    /// per-guild backends only the changed record.
    pub(crate) async fn persist(
        &self,
        table: &BTreeMap<u64, GuildConfig>,
        guild_id: u64,
    ) -> Result<(), StorageError> {
        match self {
            ConfigBackend::Memory(store) => store.persist(table, guild_id).await,
            ConfigBackend::JsonFile(store) => store.persist(table, guild_id).await,
            ConfigBackend::Redis(store) => store.persist(table, guild_id).await,
        }
    }
}
