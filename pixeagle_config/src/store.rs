//! `ConfigStore`: the high-level API every other crate talks to.
//!
//! Bundles loading, single-parameter hot reload, baseline/default diffing,
//! and a bounded backup ring — the ring is sized the way the teacher sizes
//! its fixed-capacity runtime buffers (a configured cap, oldest evicted
//! first), here backed by a plain `VecDeque` since backups are created at
//! human timescale, not once per control cycle.

use std::collections::VecDeque;
use std::path::Path;

use pixeagle_common::param::ReloadTier;

use crate::error::ConfigError;
use crate::loader::{load_config, load_config_from_str};
use crate::reload::{self, ConfigDiffEntry};
use crate::schema::{self};
use crate::sections::PixEagleConfig;

/// A snapshot of the active config at some point in time, identified by a
/// monotonically increasing id.
#[derive(Debug, Clone)]
pub struct ConfigBackup {
    pub id: u64,
    pub config: PixEagleConfig,
}

pub struct ConfigStore {
    active: PixEagleConfig,
    baseline: PixEagleConfig,
    backups: VecDeque<ConfigBackup>,
    next_backup_id: u64,
}

impl ConfigStore {
    /// Load configuration from disk. The loaded config becomes both the
    /// active config and the baseline that `diff_from_baseline` compares
    /// against.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = load_config(path)?;
        Ok(Self::from_config(config))
    }

    /// Load configuration from a TOML string (tests, embedded defaults).
    pub fn load_from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config = load_config_from_str(toml_str)?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: PixEagleConfig) -> Self {
        let ring_size = config.system.backup_ring_size.max(1);
        Self {
            baseline: config.clone(),
            active: config,
            backups: VecDeque::with_capacity(ring_size),
            next_backup_id: 1,
        }
    }

    pub fn active(&self) -> &PixEagleConfig {
        &self.active
    }

    /// Returns the named section as a TOML value, or `None` if the section
    /// doesn't exist. Used by the dashboard-facing read API, which has no
    /// static knowledge of section types.
    pub fn get_section(&self, section: &str) -> Option<toml::Value> {
        let value = toml::Value::try_from(&self.active).ok()?;
        value.as_table()?.get(section).cloned()
    }

    /// Set a single parameter, validating the resulting whole-config tree
    /// and applying it atomically. Returns the reload tier the caller must
    /// act on (`Immediate` requires nothing further).
    pub fn set_parameter(
        &mut self,
        section: &str,
        key: &str,
        value: toml::Value,
    ) -> Result<ReloadTier, ConfigError> {
        let candidate = set_value(&self.active, section, key, value.clone())?;
        candidate.validate().map_err(ConfigError::ValidationError)?;

        let tier = schema::reload_tier_for(section, key);
        if self.active.system.backup_on_reload {
            self.push_backup();
        }
        self.active = candidate;
        Ok(tier)
    }

    pub fn diff_from_baseline(&self) -> Vec<ConfigDiffEntry> {
        reload::diff(&self.baseline, &self.active).unwrap_or_default()
    }

    pub fn diff_from_defaults(&self) -> Vec<ConfigDiffEntry> {
        reload::diff(&PixEagleConfig::default(), &self.active).unwrap_or_default()
    }

    pub fn search(&self, query: &str) -> Vec<pixeagle_common::param::ParameterMetadata> {
        schema::search(query)
    }

    /// Push a backup of the current active config onto the ring, evicting
    /// the oldest entry if at capacity.
    pub fn backup(&mut self) -> u64 {
        self.push_backup()
    }

    fn push_backup(&mut self) -> u64 {
        let id = self.next_backup_id;
        self.next_backup_id += 1;
        let capacity = self.active.system.backup_ring_size.max(1);
        if self.backups.len() >= capacity {
            self.backups.pop_front();
        }
        self.backups.push_back(ConfigBackup {
            id,
            config: self.active.clone(),
        });
        id
    }

    pub fn restore(&mut self, id: u64) -> Result<(), ConfigError> {
        let backup = self
            .backups
            .iter()
            .find(|b| b.id == id)
            .ok_or(ConfigError::BackupNotFound(id))?;
        self.active = backup.config.clone();
        Ok(())
    }

    pub fn backups(&self) -> impl Iterator<Item = &ConfigBackup> {
        self.backups.iter()
    }

    /// Parameters whose active value differs from the compiled-in default,
    /// without applying anything — the caller reviews the plan before
    /// calling [`ConfigStore::apply_defaults_sync`].
    pub fn defaults_sync_plan(&self) -> Vec<ConfigDiffEntry> {
        reload::diff(&self.active, &PixEagleConfig::default()).unwrap_or_default()
    }

    /// Reset exactly the parameters named in `plan` to their default value.
    pub fn apply_defaults_sync(&mut self, plan: &[ConfigDiffEntry]) -> Result<(), ConfigError> {
        let mut candidate = self.active.clone();
        for entry in plan {
            candidate = set_value(&candidate, &entry.section, &entry.key, entry.new_value.clone())?;
        }
        candidate.validate().map_err(ConfigError::ValidationError)?;
        self.active = candidate;
        Ok(())
    }
}

fn set_value(
    config: &PixEagleConfig,
    section: &str,
    key: &str,
    value: toml::Value,
) -> Result<PixEagleConfig, ConfigError> {
    let mut table = match toml::Value::try_from(config) {
        Ok(toml::Value::Table(t)) => t,
        _ => return Err(ConfigError::ValidationError("internal: config is not a table".into())),
    };

    let section_table = table
        .get_mut(section)
        .and_then(|v| v.as_table_mut())
        .ok_or_else(|| ConfigError::UnknownParameter(format!("{section}.{key}")))?;

    if !section_table.contains_key(key) {
        return Err(ConfigError::UnknownParameter(format!("{section}.{key}")));
    }
    section_table.insert(key.to_string(), value);

    toml::Value::Table(table)
        .try_into()
        .map_err(|e| ConfigError::ValidationError(format!("internal: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_parameter_applies_immediately_reloadable_field() {
        let mut store = ConfigStore::load_from_str("").unwrap();
        let tier = store.set_parameter("follower", "kp", toml::Value::Float(1.5)).unwrap();
        assert_eq!(tier, ReloadTier::Immediate);
        assert_eq!(store.active().follower.kp, 1.5);
    }

    #[test]
    fn set_parameter_reports_restart_tier_for_topology_fields() {
        let mut store = ConfigStore::load_from_str("").unwrap();
        let tier = store
            .set_parameter("tracker", "variant", toml::Value::String("smart_multi_object".into()))
            .unwrap();
        assert_eq!(tier, ReloadTier::TrackerRestart);
    }

    #[test]
    fn set_parameter_rejects_unknown_key() {
        let mut store = ConfigStore::load_from_str("").unwrap();
        let err = store.set_parameter("follower", "does_not_exist", toml::Value::Float(1.0));
        assert!(matches!(err, Err(ConfigError::UnknownParameter(_))));
    }

    #[test]
    fn set_parameter_rejects_out_of_bounds_value() {
        let mut store = ConfigStore::load_from_str("").unwrap();
        let err = store.set_parameter(
            "tracker",
            "drift_confidence_threshold",
            toml::Value::Float(5.0),
        );
        assert!(err.is_err());
        // Active config must be unchanged on rejection.
        assert_eq!(store.active().tracker.drift_confidence_threshold, 0.4);
    }

    #[test]
    fn backup_then_restore_roundtrips() {
        let mut store = ConfigStore::load_from_str("").unwrap();
        let id = store.backup();
        store.set_parameter("follower", "kp", toml::Value::Float(9.0)).unwrap();
        assert_eq!(store.active().follower.kp, 9.0);
        store.restore(id).unwrap();
        assert_eq!(store.active().follower.kp, 0.6);
    }

    #[test]
    fn backup_ring_evicts_oldest_past_capacity() {
        let mut store = ConfigStore::load_from_str("[system]\nbackup_ring_size = 2\n").unwrap();
        let first = store.backup();
        store.backup();
        store.backup();
        assert!(store.restore(first).is_err());
    }

    #[test]
    fn diff_from_baseline_is_empty_right_after_load() {
        let store = ConfigStore::load_from_str("").unwrap();
        assert!(store.diff_from_baseline().is_empty());
    }

    #[test]
    fn diff_from_baseline_reflects_later_changes() {
        let mut store = ConfigStore::load_from_str("").unwrap();
        store.set_parameter("follower", "kp", toml::Value::Float(2.0)).unwrap();
        let diff = store.diff_from_baseline();
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].key, "kp");
    }

    #[test]
    fn defaults_sync_plan_and_apply_resets_changed_field() {
        let mut store = ConfigStore::load_from_str("[follower]\nkp = 3.3\n").unwrap();
        let plan = store.defaults_sync_plan();
        assert!(plan.iter().any(|e| e.key == "kp"));
        store.apply_defaults_sync(&plan).unwrap();
        assert_eq!(store.active().follower.kp, PixEagleConfig::default().follower.kp);
    }

    #[test]
    fn get_section_returns_requested_table() {
        let store = ConfigStore::load_from_str("").unwrap();
        let section = store.get_section("safety").unwrap();
        assert!(section.as_table().unwrap().contains_key("max_forward_velocity"));
        assert!(store.get_section("not_a_section").is_none());
    }
}
