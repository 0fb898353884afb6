use std::path::PathBuf;

/// Failure to read or write the persisted config table.
///
/// A write failure never rolls back the in-memory table; callers get this
/// error after the mutation is already visible to readers. A load failure
/// leaves the guild unmaterialized and the mutation is not applied.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access config table at `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode config table: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("stored config for guild `{guild_id}` could not be read; `config reset` replaces it")]
    Unreadable { guild_id: u64 },
    #[error("redis {operation} failed for key `{key}`: {message}")]
    Redis {
        operation: &'static str,
        key: String,
        message: String,
    },
}
