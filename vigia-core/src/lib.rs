pub mod audit;
pub mod cooldown;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod invocation;
pub mod playback;
pub mod registry;
pub mod settings;
pub mod surface;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

use std::sync::Arc;

use vigia_database::ConfigStore;

pub use audit::{AuditLog, AuditRecord, ModAction};
pub use cooldown::{CooldownStatus, CooldownTracker};
pub use dispatch::{CommandDispatcher, InboundMessage, Outcome};
pub use error::{RegistryError, ValidationError};
pub use gate::{ActorContext, AuthorizationGate, Decision, DenyReason};
pub use invocation::Invocation;
pub use playback::{PlayRequest, PlaybackEngine, PlaybackEvent};
pub use registry::{
    Category, CommandHandler, CommandMeta, CommandRecord, CommandRegistry, DEFAULT_COOLDOWN_SECS,
};
pub use settings::Settings;
pub use surface::{ChannelKind, ChatSurface, GuildInfo, MemberInfo, MessageRef};

pub type Error = anyhow::Error;

/// State shared by every event and command.
#[derive(Clone)]
pub struct Data {
    pub store: ConfigStore,
    pub registry: Arc<CommandRegistry>,
    pub cooldowns: CooldownTracker,
    pub audit: Arc<dyn AuditLog>,
    pub playback: Option<Arc<dyn PlaybackEngine>>,
    pub settings: Settings,
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("store", &self.store)
            .field("registry", &self.registry)
            .field("cooldowns", &self.cooldowns)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Data {
    pub fn new(
        store: ConfigStore,
        registry: CommandRegistry,
        audit: Arc<dyn AuditLog>,
        settings: Settings,
    ) -> Self {
        Self {
            store,
            registry: Arc::new(registry),
            cooldowns: CooldownTracker::new(),
            audit,
            playback: None,
            settings,
        }
    }

    pub fn with_playback(mut self, engine: Arc<dyn PlaybackEngine>) -> Self {
        self.playback = Some(engine);
        self
    }

    pub fn gate(&self) -> AuthorizationGate {
        AuthorizationGate::new(self.registry.clone(), self.settings.super_admin_role_id)
    }
}
