//! Follower control laws and the manager that dispatches through them.
//!
//! # Module Structure
//!
//! - [`pid`] - backward-Euler PID with anti-windup, shared by every profile
//! - [`smoothing`] - optional exponential moving average on raw output
//! - [`oscillation`] - sign-change guard for the adaptive chase profile
//! - [`mount`] - mount-aware gimbal yaw/pitch transform
//! - [`target_loss`] - edge-triggered target-loss action and suppression
//! - [`controllers`] - the nine control laws named by `spec.md`
//! - [`follower`] - `Follower`, the closed-enum dispatch over all nine
//! - [`setpoint_handler`] - field-set enforcement on the way out
//! - [`manager`] - `FollowerManager`: active follower, safety clamping, switch
//! - [`error`] - `FollowerError`

pub mod controllers;
pub mod error;
pub mod follower;
pub mod manager;
pub mod mount;
pub mod oscillation;
pub mod pid;
pub mod setpoint_handler;
pub mod smoothing;
pub mod target_loss;

pub use error::FollowerError;
pub use follower::Follower;
pub use manager::FollowerManager;
