use std::collections::BTreeMap;

use deadpool_redis::{Config, Connection, Pool, Runtime};
use redis::AsyncCommands;

use crate::error::StorageError;
use crate::model::GuildConfig;

/// One Redis string per guild, holding the record as JSON.
#[derive(Clone, Debug)]
pub struct RedisConfigStore {
    pool: Pool,
    key_prefix: String,
}

impl RedisConfigStore {
    pub fn from_url(redis_url: &str, key_prefix: impl Into<String>) -> anyhow::Result<Self> {
        let config = Config::from_url(redis_url);
        let pool = config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| anyhow::anyhow!("failed to create redis pool: {e}"))?;

        Ok(Self {
            pool,
            key_prefix: key_prefix.into(),
        })
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    pub fn key(&self, guild_id: u64) -> String {
        format!("{}:guild_config:{}", self.key_prefix, guild_id)
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| anyhow::anyhow!("failed to get redis connection: {e}"))?;

        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| anyhow::anyhow!("redis PING failed: {e}"))?;

        Ok(())
    }

    /// Records are loaded lazily, guild by guild.
    pub async fn load_all(&self) -> Result<BTreeMap<u64, GuildConfig>, StorageError> {
        Ok(BTreeMap::new())
    }

    pub async fn load_guild(&self, guild_id: u64) -> Result<Option<GuildConfig>, StorageError> {
        let key = self.key(guild_id);
        let mut conn = self.connection(&key, "GET").await?;

        let value = conn
            .get::<_, Option<Vec<u8>>>(&key)
            .await
            .map_err(|e| redis_error("GET", &key, e))?;

        match value {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub async fn persist(
        &self,
        table: &BTreeMap<u64, GuildConfig>,
        guild_id: u64,
    ) -> Result<(), StorageError> {
        let key = self.key(guild_id);
        let Some(config) = table.get(&guild_id) else {
            return Ok(());
        };
        let payload = serde_json::to_vec(config)?;

        let mut conn = self.connection(&key, "SET").await?;
        conn.set::<_, _, ()>(&key, payload)
            .await
            .map_err(|e| redis_error("SET", &key, e))?;

        Ok(())
    }

    async fn connection(&self, key: &str, operation: &'static str) -> Result<Connection, StorageError> {
        self.pool.get().await.map_err(|e| StorageError::Redis {
            operation,
            key: key.to_owned(),
            message: format!("failed to get redis connection: {e}"),
        })
    }
}

fn redis_error(operation: &'static str, key: &str, source: redis::RedisError) -> StorageError {
    StorageError::Redis {
        operation,
        key: key.to_owned(),
        message: source.to_string(),
    }
}
