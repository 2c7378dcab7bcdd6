//! Hot-reload scope analysis and atomic config swap.
//!
//! Generalizes the teacher's `parse_shadow_config` / `validate_reload_scope`
//! / `atomic_config_swap` pipeline (`evo_control_unit::config`): where the
//! teacher rejects a reload outright if it touches non-reloadable axis
//! topology, PixEagle's config tree has no such structural graph to protect,
//! so instead every changed parameter is classified by
//! [`crate::schema::reload_tier_for`] and the swap always succeeds once the
//! new config validates — the caller (`AppController`) is told the highest
//! tier among the changed parameters and decides what to restart.

use pixeagle_common::param::ReloadTier;

use crate::error::ConfigError;
use crate::schema::reload_tier_for;
use crate::sections::PixEagleConfig;

/// One changed parameter between an active config and a candidate config.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDiffEntry {
    pub section: String,
    pub key: String,
    pub old_value: toml::Value,
    pub new_value: toml::Value,
    pub reload_tier: ReloadTier,
}

/// Result of [`atomic_config_swap`].
#[derive(Debug, PartialEq)]
pub enum ReloadResult {
    /// Swap applied. Carries the highest reload tier among changed
    /// parameters, telling the caller what (if anything) must restart.
    Applied {
        highest_tier: ReloadTier,
        changed: Vec<ConfigDiffEntry>,
    },
    /// The candidate config failed parsing or bounds validation; the active
    /// config is unchanged.
    ValidationFailed(String),
}

fn highest_tier(tiers: impl Iterator<Item = ReloadTier>) -> ReloadTier {
    tiers.fold(ReloadTier::Immediate, |acc, tier| match (acc, tier) {
        (ReloadTier::SystemRestart, _) | (_, ReloadTier::SystemRestart) => ReloadTier::SystemRestart,
        (ReloadTier::TrackerRestart, _) | (_, ReloadTier::TrackerRestart) => ReloadTier::TrackerRestart,
        (ReloadTier::FollowerRestart, _) | (_, ReloadTier::FollowerRestart) => ReloadTier::FollowerRestart,
        _ => ReloadTier::Immediate,
    })
}

/// Compute per-parameter differences between two configs, tagged with the
/// reload tier each change requires.
pub fn diff(active: &PixEagleConfig, candidate: &PixEagleConfig) -> Result<Vec<ConfigDiffEntry>, ConfigError> {
    let active_value = toml::Value::try_from(active)
        .map_err(|e| ConfigError::ValidationError(format!("internal: {e}")))?;
    let candidate_value = toml::Value::try_from(candidate)
        .map_err(|e| ConfigError::ValidationError(format!("internal: {e}")))?;

    let (active_table, candidate_table) = match (active_value, candidate_value) {
        (toml::Value::Table(a), toml::Value::Table(b)) => (a, b),
        _ => return Ok(Vec::new()),
    };

    let mut entries = Vec::new();
    for (section, candidate_section_value) in &candidate_table {
        let candidate_section = match candidate_section_value.as_table() {
            Some(t) => t,
            None => continue,
        };
        let active_section = active_table
            .get(section)
            .and_then(|v| v.as_table())
            .cloned()
            .unwrap_or_default();

        for (key, new_value) in candidate_section {
            let old_value = active_section.get(key).cloned().unwrap_or(toml::Value::Boolean(false));
            if &old_value != new_value {
                entries.push(ConfigDiffEntry {
                    section: section.clone(),
                    key: key.clone(),
                    old_value,
                    new_value: new_value.clone(),
                    reload_tier: reload_tier_for(section, key),
                });
            }
        }
    }
    Ok(entries)
}

/// Validate a candidate config and, if it passes, atomically swap it into
/// `active`. On failure `active` is left untouched.
pub fn atomic_config_swap(active: &mut PixEagleConfig, candidate_toml: &str) -> ReloadResult {
    let candidate: PixEagleConfig = match toml::from_str(candidate_toml) {
        Ok(c) => c,
        Err(e) => return ReloadResult::ValidationFailed(format!("parse error: {e}")),
    };
    if let Err(e) = candidate.validate() {
        return ReloadResult::ValidationFailed(e);
    }

    let changed = match diff(active, &candidate) {
        Ok(c) => c,
        Err(e) => return ReloadResult::ValidationFailed(e.to_string()),
    };
    let highest = highest_tier(changed.iter().map(|e| e.reload_tier));

    *active = candidate;
    ReloadResult::Applied {
        highest_tier: highest,
        changed,
    }
}
