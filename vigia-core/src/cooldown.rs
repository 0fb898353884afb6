use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownStatus {
    Ready,
    Wait(Duration),
}

/// Per-command, per-actor rate limiter. In-memory only.
///
/// Each entry stores the instant its cooldown ends; an entry whose end is not
/// in the future behaves exactly like an absent one.
#[derive(Clone, Debug, Default)]
pub struct CooldownTracker {
    entries: Arc<DashMap<(&'static str, u64), Instant>>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self, command: &'static str, actor: u64, now: Instant) -> CooldownStatus {
        match self.entries.get(&(command, actor)) {
            Some(expires_at) if *expires_at > now => CooldownStatus::Wait(*expires_at - now),
            _ => CooldownStatus::Ready,
        }
    }

    pub fn record(&self, command: &'static str, actor: u64, now: Instant, duration: Duration) {
        self.entries.insert((command, actor), now + duration);
    }

    /// Check and, when ready, record in one step under the entry's shard lock,
    /// so two racing invocations cannot both observe `Ready`.
    pub fn acquire(
        &self,
        command: &'static str,
        actor: u64,
        now: Instant,
        duration: Duration,
    ) -> CooldownStatus {
        match self.entries.entry((command, actor)) {
            Entry::Occupied(entry) if *entry.get() > now => {
                CooldownStatus::Wait(*entry.get() - now)
            }
            Entry::Occupied(mut entry) => {
                entry.insert(now + duration);
                CooldownStatus::Ready
            }
            Entry::Vacant(entry) => {
                entry.insert(now + duration);
                CooldownStatus::Ready
            }
        }
    }

    /// Drop expired entries. Returns how many were removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| *expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_SECONDS: Duration = Duration::from_secs(3);

    #[test]
    fn fresh_pair_is_ready() {
        let tracker = CooldownTracker::new();
        assert_eq!(tracker.check("ping", 1, Instant::now()), CooldownStatus::Ready);
    }

    #[test]
    fn waits_for_the_exact_remainder() {
        let tracker = CooldownTracker::new();
        let t0 = Instant::now();
        tracker.record("ping", 1, t0, THREE_SECONDS);

        assert_eq!(
            tracker.check("ping", 1, t0 + Duration::from_millis(1000)),
            CooldownStatus::Wait(Duration::from_secs(2))
        );
        assert_eq!(
            tracker.check("ping", 1, t0 + Duration::from_millis(3001)),
            CooldownStatus::Ready
        );
    }

    #[test]
    fn check_has_no_side_effect() {
        let tracker = CooldownTracker::new();
        let t0 = Instant::now();

        tracker.check("ping", 1, t0);
        assert!(tracker.is_empty());
    }

    #[test]
    fn pairs_are_independent() {
        let tracker = CooldownTracker::new();
        let t0 = Instant::now();
        tracker.record("ping", 1, t0, THREE_SECONDS);

        assert_eq!(tracker.check("ping", 2, t0), CooldownStatus::Ready);
        assert_eq!(tracker.check("help", 1, t0), CooldownStatus::Ready);
    }

    #[test]
    fn acquire_admits_only_the_first_caller() {
        let tracker = CooldownTracker::new();
        let t0 = Instant::now();

        assert_eq!(tracker.acquire("play", 1, t0, THREE_SECONDS), CooldownStatus::Ready);
        assert_eq!(
            tracker.acquire("play", 1, t0 + Duration::from_millis(500), THREE_SECONDS),
            CooldownStatus::Wait(Duration::from_millis(2500))
        );
        assert_eq!(
            tracker.acquire("play", 1, t0 + THREE_SECONDS, THREE_SECONDS),
            CooldownStatus::Ready
        );
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let tracker = CooldownTracker::new();
        let t0 = Instant::now();
        tracker.record("ping", 1, t0, Duration::from_secs(1));
        tracker.record("config", 1, t0, Duration::from_secs(5));

        assert_eq!(tracker.sweep(t0 + Duration::from_secs(2)), 1);
        assert_eq!(tracker.len(), 1);
        assert!(matches!(
            tracker.check("config", 1, t0 + Duration::from_secs(2)),
            CooldownStatus::Wait(_)
        ));
    }
}
