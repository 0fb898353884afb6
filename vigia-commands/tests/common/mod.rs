#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::Instant;

use vigia_core::testing::{self, FakeSurface, GUILD, RecordingAudit, RecordingPlayback};
use vigia_core::{CommandDispatcher, Data, MemberInfo, Outcome, Settings};
use vigia_database::{ConfigStore, GuildConfig};

pub use vigia_core::testing::{CHANNEL, OWNER, member};

pub const MEMBER: u64 = 7;
pub const TARGET: u64 = 8;

pub struct Bot {
    pub dispatcher: CommandDispatcher,
    pub surface: Arc<FakeSurface>,
    pub audit: Arc<RecordingAudit>,
    pub playback: Arc<RecordingPlayback>,
    start: Instant,
    next_id: AtomicU64,
}

impl Bot {
    pub fn new() -> Self {
        Self::build(true)
    }

    pub fn without_playback() -> Self {
        Self::build(false)
    }

    fn build(with_playback: bool) -> Self {
        let audit = RecordingAudit::new();
        let playback = RecordingPlayback::new();
        let registry = vigia_commands::registry().expect("unique command names");

        let mut data = Data::new(
            ConfigStore::in_memory(),
            registry,
            audit.clone(),
            Settings::default(),
        );
        if with_playback {
            data = data.with_playback(playback.clone());
        }

        let surface = FakeSurface::new();
        surface
            .with_member(member(OWNER))
            .with_member(member(MEMBER))
            .with_member(member(TARGET));

        Self {
            dispatcher: CommandDispatcher::new(data),
            surface,
            audit,
            playback,
            start: Instant::now(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn add_member(&self, member: MemberInfo) {
        self.surface.with_member(member);
    }

    pub fn data(&self) -> &Data {
        self.dispatcher.data()
    }

    pub async fn config(&self) -> GuildConfig {
        self.data().store.get(GUILD).await
    }

    /// Dispatch `content` from `author`, spaced far enough apart to never hit a cooldown.
    pub async fn send(&self, author: u64, content: &str) -> Outcome {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = self.start + Duration::from_secs(id * 60);
        let message = testing::message(id, author, content);

        self.dispatcher
            .dispatch(self.surface.clone(), &message, now)
            .await
    }

    pub fn last_reply(&self) -> String {
        self.surface.last_text().unwrap_or_default()
    }
}
