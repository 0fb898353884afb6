use std::collections::BTreeMap;

use crate::error::StorageError;
use crate::model::GuildConfig;

/// Keeps nothing; the store's in-memory table is the only copy.
#[derive(Clone, Debug, Default)]
pub struct NoopConfigStore;

impl NoopConfigStore {
    pub async fn load_all(&self) -> Result<BTreeMap<u64, GuildConfig>, StorageError> {
        Ok(BTreeMap::new())
    }

    pub async fn load_guild(&self, _guild_id: u64) -> Result<Option<GuildConfig>, StorageError> {
        Ok(None)
    }

    pub async fn persist(
        &self,
        _table: &BTreeMap<u64, GuildConfig>,
        _guild_id: u64,
    ) -> Result<(), StorageError> {
        Ok(())
    }
}
