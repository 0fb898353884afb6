pub mod backend;
pub mod error;
pub mod model;
pub mod store;

pub use backend::ConfigBackend;
pub use error::StorageError;
pub use model::{ConfigKey, ConfigUpdate, EnabledLogs, GuildConfig, LogCategory};
pub use store::ConfigStore;
