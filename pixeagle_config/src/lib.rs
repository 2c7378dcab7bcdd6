//! `ConfigStore`: layered TOML configuration with per-parameter hot reload.
//!
//! # Module Structure
//!
//! - [`sections`] - typed configuration sections
//! - [`schema`] - reload-tier classification and the parameter metadata registry
//! - [`loader`] - defaults-then-overrides TOML loading
//! - [`reload`] - diffing and atomic whole-config swap
//! - [`store`] - `ConfigStore`, the API every other crate uses
//! - [`error`] - `ConfigError`

pub mod error;
pub mod loader;
pub mod reload;
pub mod schema;
pub mod sections;
pub mod store;

pub use error::ConfigError;
pub use reload::{ConfigDiffEntry, ReloadResult};
pub use sections::PixEagleConfig;
pub use store::{ConfigBackup, ConfigStore};
