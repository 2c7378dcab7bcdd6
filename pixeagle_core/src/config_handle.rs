//! `ConfigHandle`: the Config task's shared ownership of `ConfigStore`.
//!
//! Grounded on the teacher's "process-wide singleton with snapshot
//! semantics" shared-resource policy: readers get an immutable snapshot,
//! writers synchronize through a single mutation lock, and the lock is never
//! held across the actual config application — `set_parameter` just queues
//! the resulting [`ReloadTier`] for the Control task to pick up at its next
//! tick boundary instead of acting on it inline.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use pixeagle_common::param::ReloadTier;
use pixeagle_config::error::ConfigError;
use pixeagle_config::sections::PixEagleConfig;
use pixeagle_config::store::ConfigStore;

fn tier_rank(tier: ReloadTier) -> u8 {
    match tier {
        ReloadTier::Immediate => 0,
        ReloadTier::FollowerRestart => 1,
        ReloadTier::TrackerRestart => 2,
        ReloadTier::SystemRestart => 3,
    }
}

#[derive(Clone)]
pub struct ConfigHandle {
    store: Arc<RwLock<ConfigStore>>,
    pending_tier: Arc<Mutex<Option<ReloadTier>>>,
}

impl ConfigHandle {
    pub fn new(store: ConfigStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            pending_tier: Arc::new(Mutex::new(None)),
        }
    }

    /// Immutable snapshot of the active config. Never blocks a writer for
    /// longer than a clone.
    pub fn snapshot(&self) -> PixEagleConfig {
        self.store.read().active().clone()
    }

    /// Set a parameter and queue its reload tier for the Control task. Does
    /// not itself restart anything — that is [`Self::take_pending_reload`]'s
    /// caller's job, at the next tick boundary.
    pub fn set_parameter(&self, section: &str, key: &str, value: toml::Value) -> Result<ReloadTier, ConfigError> {
        let tier = self.store.write().set_parameter(section, key, value)?;
        self.queue(tier);
        Ok(tier)
    }

    fn queue(&self, tier: ReloadTier) {
        if tier == ReloadTier::Immediate {
            return;
        }
        let mut pending = self.pending_tier.lock();
        *pending = Some(match *pending {
            Some(existing) if tier_rank(existing) >= tier_rank(tier) => existing,
            _ => tier,
        });
    }

    /// Drain and return the highest-severity reload tier queued since the
    /// last call, or `None` if nothing restart-worthy happened.
    pub fn take_pending_reload(&self) -> Option<ReloadTier> {
        self.pending_tier.lock().take()
    }

    pub fn backup(&self) -> u64 {
        self.store.write().backup()
    }

    pub fn restore(&self, id: u64) -> Result<(), ConfigError> {
        self.store.write().restore(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> ConfigHandle {
        ConfigHandle::new(ConfigStore::load_from_str("").unwrap())
    }

    #[test]
    fn immediate_tier_changes_are_not_queued() {
        let handle = handle();
        handle.set_parameter("follower", "kp", toml::Value::Float(1.0)).unwrap();
        assert!(handle.take_pending_reload().is_none());
    }

    #[test]
    fn restart_tier_changes_are_queued_until_drained() {
        let handle = handle();
        handle
            .set_parameter("tracker", "variant", toml::Value::String("smart_motion".into()))
            .unwrap();
        assert_eq!(handle.take_pending_reload(), Some(ReloadTier::TrackerRestart));
        assert!(handle.take_pending_reload().is_none());
    }

    #[test]
    fn higher_severity_tier_wins_when_both_are_queued() {
        let handle = handle();
        handle
            .set_parameter("follower", "profile", toml::Value::String("velocity_chase".into()))
            .unwrap();
        handle
            .set_parameter("tracker", "variant", toml::Value::String("smart_motion".into()))
            .unwrap();
        assert_eq!(handle.take_pending_reload(), Some(ReloadTier::TrackerRestart));
    }

    #[test]
    fn snapshot_reflects_latest_committed_value() {
        let handle = handle();
        handle.set_parameter("follower", "kp", toml::Value::Float(4.0)).unwrap();
        assert_eq!(handle.snapshot().follower.kp, 4.0);
    }
}
