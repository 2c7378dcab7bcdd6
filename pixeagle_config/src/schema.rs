//! Reload-tier classification and the parameter metadata registry backing
//! `ConfigStore::search`.
//!
//! Mirrors the teacher's FR-145 distinction (reloadable PID gains/timings vs
//! restart-required axis topology) but expressed per-parameter instead of
//! per-axis-topology, since PixEagle's config tree has no analogous graph
//! structure to validate.

use pixeagle_common::param::{ParameterMetadata, ReloadTier};

/// Returns the reload tier for a `section.key` pair. Keys not listed here
/// default to [`ReloadTier::Immediate`], since most tuning parameters (PID
/// gains, thresholds, timeouts) take effect on the next read.
pub fn reload_tier_for(section: &str, key: &str) -> ReloadTier {
    match (section, key) {
        ("video", "source_uri") => ReloadTier::SystemRestart,
        ("detector", "backend") => ReloadTier::SystemRestart,
        ("tracker", "variant") => ReloadTier::TrackerRestart,
        ("follower", "profile") => ReloadTier::FollowerRestart,
        ("system", "control_rate_hz") => ReloadTier::SystemRestart,
        _ => ReloadTier::Immediate,
    }
}

/// Static description of every known parameter, used by `search` and by the
/// dashboard-facing schema export. Bounds mirror each section's `validate()`.
pub fn registry() -> Vec<ParameterMetadata> {
    let p = |section: &str, key: &str, doc: &str, min: Option<f64>, max: Option<f64>| {
        ParameterMetadata {
            section: section.to_string(),
            key: key.to_string(),
            doc: doc.to_string(),
            reload_tier: reload_tier_for(section, key),
            min,
            max,
        }
    };

    vec![
        p("video", "source_uri", "URI-scheme-selected capture backend", None, None),
        p("video", "stall_timeout_ms", "no-frame timeout before reopen", Some(1.0), None),
        p("detector", "backend", "detector backend name", None, None),
        p(
            "detector",
            "inference_timeout_ms",
            "per-frame inference deadline before skip/degrade",
            Some(1.0),
            None,
        ),
        p("tracker", "variant", "active tracker implementation", None, None),
        p(
            "tracker",
            "drift_confidence_threshold",
            "confidence below which Tracking -> Drifting",
            Some(0.0),
            Some(1.0),
        ),
        p("follower", "profile", "active follower control law", None, None),
        p("follower", "kp", "PID proportional gain", Some(0.0), None),
        p("follower", "ki", "PID integral gain", Some(0.0), None),
        p("follower", "kd", "PID derivative gain", Some(0.0), None),
        p(
            "follower",
            "smoothing_alpha",
            "EMA smoothing coefficient applied before safety clamping",
            Some(0.0),
            Some(1.0),
        ),
        p(
            "follower",
            "target_loss_action",
            "one-shot action fired when a follower's target-loss timeout elapses",
            None,
            None,
        ),
        p(
            "follower",
            "fw_tecs_weight",
            "TECS altitude/speed priority weight, 1.0 is balanced",
            Some(0.0),
            Some(2.0),
        ),
        p(
            "follower",
            "distance_standoff_m",
            "desired standoff distance held by velocity_distance",
            Some(0.0),
            None,
        ),
        p(
            "safety",
            "max_forward_velocity",
            "global forward velocity limit (m/s)",
            Some(0.0),
            None,
        ),
        p(
            "safety",
            "max_lateral_velocity",
            "global lateral velocity limit (m/s)",
            Some(0.0),
            None,
        ),
        p(
            "safety",
            "max_vertical_velocity",
            "global vertical velocity limit (m/s)",
            Some(0.0),
            None,
        ),
        p(
            "safety",
            "max_velocity_magnitude",
            "uniform-scaling bound on the combined forward/lateral/vertical velocity vector (m/s)",
            Some(0.0),
            None,
        ),
        p(
            "safety",
            "max_yaw_rate_deg_s",
            "global yaw rate limit (deg/s)",
            Some(0.0),
            None,
        ),
        p(
            "safety",
            "max_pitch_rate_deg_s",
            "global pitch rate limit (deg/s)",
            Some(0.0),
            None,
        ),
        p(
            "safety",
            "max_roll_rate_deg_s",
            "global roll rate limit (deg/s)",
            Some(0.0),
            None,
        ),
        p(
            "safety",
            "altitude_warning_buffer_m",
            "altitude band below max_altitude_m / above min_altitude_m that warns instead of halting",
            Some(0.0),
            None,
        ),
        p(
            "safety",
            "on_violation_action",
            "action taken once an altitude breach passes the warning buffer: clamp, halt, or rtl",
            None,
            None,
        ),
        p(
            "bridge",
            "stale_after_ms",
            "telemetry age beyond which AutopilotBridge reports stale",
            Some(1.0),
            None,
        ),
        p(
            "bridge",
            "cmd_max_age_ms",
            "command age beyond which AutopilotBridge drops it instead of sending",
            Some(1.0),
            None,
        ),
        p(
            "system",
            "control_rate_hz",
            "AppController tick rate",
            Some(1.0),
            Some(1000.0),
        ),
    ]
}

/// Case-insensitive substring search over `section.key` and each
/// parameter's doc string.
pub fn search(query: &str) -> Vec<ParameterMetadata> {
    let needle = query.to_lowercase();
    registry()
        .into_iter()
        .filter(|meta| {
            meta.full_name().to_lowercase().contains(&needle) || meta.doc.to_lowercase().contains(&needle)
        })
        .collect()
}
