use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::backend::ConfigBackend;
use crate::error::StorageError;
use crate::model::{ConfigUpdate, GuildConfig, LogCategory};

/// Shared handle to the per-guild configuration table.
///
/// Clones share one table. All access goes through a single async lock that is
/// held across the read-modify-persist sequence, so two writers never
/// interleave their snapshots and lose each other's updates.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    table: Mutex<BTreeMap<u64, GuildConfig>>,
    backend: ConfigBackend,
}

impl ConfigStore {
    /// Open a store, loading whatever the backend already holds.
    pub async fn open(backend: ConfigBackend) -> Result<Self, StorageError> {
        let table = backend.load_all().await?;
        debug!(guilds = table.len(), backend = %backend.describe(), "config table loaded");

        Ok(Self {
            inner: Arc::new(Inner {
                table: Mutex::new(table),
                backend,
            }),
        })
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Inner {
                table: Mutex::new(BTreeMap::new()),
                backend: ConfigBackend::memory(),
            }),
        }
    }

    pub fn backend(&self) -> &ConfigBackend {
        &self.inner.backend
    }

    /// Number of guild records currently materialized.
    pub async fn guild_count(&self) -> usize {
        self.inner.table.lock().await.len()
    }

    /// Return the guild's record, creating it from defaults on first access.
    ///
    /// When the backend cannot load the record, defaults are returned without
    /// being cached so the next call retries the load.
    pub async fn get(&self, guild_id: u64) -> GuildConfig {
        let mut table = self.inner.table.lock().await;
        match materialize(&mut table, &self.inner.backend, guild_id).await {
            Ok(config) => config.clone(),
            Err(source) => {
                warn!(?source, guild_id, "failed to load guild config; serving defaults");
                GuildConfig::default()
            }
        }
    }

    pub async fn set(&self, guild_id: u64, update: ConfigUpdate) -> Result<(), StorageError> {
        self.mutate(guild_id, |config| ((), update.apply(config)))
            .await
    }

    /// Replace the guild's record with a fresh default one.
    ///
    /// The stored record is never loaded, so this also clears one the backend
    /// could not read.
    pub async fn reset(&self, guild_id: u64) -> Result<(), StorageError> {
        let mut table = self.inner.table.lock().await;
        let fresh = GuildConfig::default();
        if table.get(&guild_id) == Some(&fresh) {
            return Ok(());
        }

        table.insert(guild_id, fresh);
        self.persist(&table, guild_id).await
    }

    pub async fn is_log_enabled(&self, guild_id: u64, category: LogCategory) -> bool {
        self.get(guild_id).await.enabled_logs.is_enabled(category)
    }

    /// Flip one log category, returning the new state.
    pub async fn toggle_log(&self, guild_id: u64, category: LogCategory) -> Result<bool, StorageError> {
        self.mutate(guild_id, |config| (config.enabled_logs.toggle(category), true))
            .await
    }

    pub async fn is_command_disabled(&self, guild_id: u64, name: &str) -> bool {
        self.get(guild_id).await.is_command_disabled(name)
    }

    pub async fn disable_command(&self, guild_id: u64, name: &str) -> Result<(), StorageError> {
        self.mutate(guild_id, |config| {
            ((), config.disabled_commands.insert(name.to_owned()))
        })
        .await
    }

    pub async fn enable_command(&self, guild_id: u64, name: &str) -> Result<(), StorageError> {
        self.mutate(guild_id, |config| ((), config.disabled_commands.remove(name)))
            .await
    }

    /// Disable the command if enabled and vice versa. Returns `true` when the
    /// command ends up disabled.
    pub async fn toggle_command(&self, guild_id: u64, name: &str) -> Result<bool, StorageError> {
        self.mutate(guild_id, |config| {
            let now_disabled = if config.disabled_commands.remove(name) {
                false
            } else {
                config.disabled_commands.insert(name.to_owned());
                true
            };
            (now_disabled, true)
        })
        .await
    }

    pub async fn is_mod_role(&self, guild_id: u64, role_id: u64) -> bool {
        self.get(guild_id).await.is_mod_role(role_id)
    }

    pub async fn add_mod_role(&self, guild_id: u64, role_id: u64) -> Result<(), StorageError> {
        self.mutate(guild_id, |config| ((), config.mod_roles.insert(role_id)))
            .await
    }

    pub async fn remove_mod_role(&self, guild_id: u64, role_id: u64) -> Result<(), StorageError> {
        self.mutate(guild_id, |config| ((), config.mod_roles.remove(&role_id)))
            .await
    }

    /// Add the role if absent and vice versa. Returns `true` when the role
    /// ends up in the moderation set.
    pub async fn toggle_mod_role(&self, guild_id: u64, role_id: u64) -> Result<bool, StorageError> {
        self.mutate(guild_id, |config| {
            let now_member = if config.mod_roles.remove(&role_id) {
                false
            } else {
                config.mod_roles.insert(role_id);
                true
            };
            (now_member, true)
        })
        .await
    }

    /// Run `op` against the guild's record and persist if it reports a change.
    ///
    /// Fails without touching anything when the record cannot be loaded. The
    /// in-memory mutation stays in place when persisting fails.
    async fn mutate<T>(
        &self,
        guild_id: u64,
        op: impl FnOnce(&mut GuildConfig) -> (T, bool),
    ) -> Result<T, StorageError> {
        let mut table = self.inner.table.lock().await;
        let config = materialize(&mut table, &self.inner.backend, guild_id)
            .await
            .inspect_err(|source| warn!(?source, guild_id, "config change refused; record not loaded"))?;
        let (value, changed) = op(config);

        if changed {
            self.persist(&table, guild_id).await?;
        }

        Ok(value)
    }

    async fn persist(&self, table: &BTreeMap<u64, GuildConfig>, guild_id: u64) -> Result<(), StorageError> {
        self.inner
            .backend
            .persist(table, guild_id)
            .await
            .inspect_err(|source| warn!(?source, guild_id, "config change kept in memory but not persisted"))
    }
}

/// Insert the guild's stored (or default) record on first access. Nothing is
/// cached when the backend fails.
async fn materialize<'t>(
    table: &'t mut BTreeMap<u64, GuildConfig>,
    backend: &ConfigBackend,
    guild_id: u64,
) -> Result<&'t mut GuildConfig, StorageError> {
    match table.entry(guild_id) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => {
            let loaded = backend.load_guild(guild_id).await?.unwrap_or_default();
            Ok(entry.insert(loaded))
        }
    }
}
