use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::error::StorageError;
use crate::model::GuildConfig;

/// Whole-table JSON snapshot on local disk.
///
/// Top-level keys are guild identifiers, values are [`GuildConfig`] records.
/// Every write replaces the file through a sibling temp file and a rename so a
/// crash mid-write never leaves a truncated table behind.
///
/// Records that do not decode are kept verbatim and written back untouched
/// until the guild is reset.
#[derive(Clone, Debug)]
pub struct JsonConfigStore {
    path: PathBuf,
    unreadable: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            unreadable: Arc::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the table, creating an empty one when the file does not exist yet.
    ///
    /// A file that is not valid JSON is reported and treated as empty; the next
    /// write replaces it.
    pub async fn load_all(&self) -> Result<BTreeMap<u64, GuildConfig>, StorageError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|source| self.io_error(source))?;
        }

        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                fs::write(&self.path, b"{}")
                    .await
                    .map_err(|source| self.io_error(source))?;
                info!(path = %self.path.display(), "created empty config table");
                return Ok(BTreeMap::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        let records = match serde_json::from_slice::<BTreeMap<String, Value>>(&raw) {
            Ok(records) => records,
            Err(source) => {
                error!(?source, path = %self.path.display(), "config table is unreadable; starting empty");
                return Ok(BTreeMap::new());
            }
        };

        let mut table = BTreeMap::new();
        let mut unreadable = BTreeMap::new();
        for (key, value) in records {
            match decode_record(&key, &value) {
                Ok((guild_id, config)) => {
                    table.insert(guild_id, config);
                }
                Err(reason) => {
                    warn!(key = %key, %reason, path = %self.path.display(), "keeping undecodable config record as-is");
                    unreadable.insert(key, value);
                }
            }
        }

        *self.unreadable.write().await = unreadable;
        Ok(table)
    }

    /// Everything decodable was read in `load_all`; only undecodable records
    /// are reported here so they are never replaced by defaults.
    pub async fn load_guild(&self, guild_id: u64) -> Result<Option<GuildConfig>, StorageError> {
        if self.unreadable.read().await.contains_key(&guild_id.to_string()) {
            return Err(StorageError::Unreadable { guild_id });
        }
        Ok(None)
    }

    pub async fn persist(
        &self,
        table: &BTreeMap<u64, GuildConfig>,
        _guild_id: u64,
    ) -> Result<(), StorageError> {
        let mut snapshot = self.unreadable.read().await.clone();
        for (guild_id, config) in table {
            snapshot.insert(guild_id.to_string(), serde_json::to_value(config)?);
        }

        let payload = serde_json::to_vec_pretty(&snapshot)?;
        let staging = self.staging_path();

        fs::write(&staging, payload)
            .await
            .map_err(|source| self.io_error(source))?;
        fs::rename(&staging, &self.path)
            .await
            .map_err(|source| self.io_error(source))?;

        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn decode_record(key: &str, value: &Value) -> Result<(u64, GuildConfig), String> {
    let guild_id = key
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("`{key}` is not a guild id"))?;
    let config = GuildConfig::deserialize(value).map_err(|source| source.to_string())?;
    Ok((guild_id, config))
}
