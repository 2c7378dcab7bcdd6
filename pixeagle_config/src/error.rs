//! Configuration loading/validation error.
//!
//! Matches a manual `Display` impl rather than a `thiserror` derive: this
//! crate's errors are matched on exhaustively by `AppController` for control
//! flow (denied vs validation-failed vs scope-violation), not surfaced
//! directly to a human, so the extra ergonomics of the derive buys little.

#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    ValidationError(String),
    ReloadValidationFailed(String),
    ReloadScopeViolation(String),
    UnknownParameter(String),
    BackupNotFound(u64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "config I/O error: {e}"),
            Self::ParseError(e) => write!(f, "config parse error: {e}"),
            Self::ValidationError(e) => write!(f, "config validation: {e}"),
            Self::ReloadValidationFailed(detail) => {
                write!(f, "ERR_RELOAD_VALIDATION_FAILED: {detail}")
            }
            Self::ReloadScopeViolation(detail) => {
                write!(f, "ERR_RELOAD_SCOPE_VIOLATION: {detail}")
            }
            Self::UnknownParameter(name) => write!(f, "unknown parameter: {name}"),
            Self::BackupNotFound(id) => write!(f, "no backup with id {id}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_scope_violation_message_is_tagged() {
        let err = ConfigError::ReloadScopeViolation("tracker.variant changed".into());
        assert!(err.to_string().contains("RELOAD_SCOPE_VIOLATION"));
    }
}
