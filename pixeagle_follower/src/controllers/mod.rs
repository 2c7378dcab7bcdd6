//! One module per follower control law, named after its `spec.md` profile.

pub mod attitude_rate_fw;
pub mod attitude_rate_mc;
pub mod gimbal_pid_pursuit;
pub mod gimbal_velocity_vector;
pub mod velocity_baseline;
pub mod velocity_chase;
pub mod velocity_distance;
pub mod velocity_ground;
pub mod velocity_position;

/// Normalized tracker position defaults to frame center `(0, 0)` when a
/// tracker output carries no `position_2d` (e.g. a fresh `Idle` output);
/// every controller treats a missing position as "target centered" rather
/// than special-casing `None` at every call site.
pub(crate) fn position_or_center(position: Option<(f32, f32)>) -> (f32, f32) {
    position.unwrap_or((0.0, 0.0))
}
