//! Errors raised by configuration lookups and removals.

use std::fmt;

/// Which table of a node was missing the requested key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyKind {
    Component,
    Alias,
    Setting,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyKind::Component => "component",
            KeyKind::Alias => "alias",
            KeyKind::Setting => "setting",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A component, alias, or setting did not exist on the node that was asked.
    #[error("missing {kind} '{key}'")]
    MissingKey { kind: KeyKind, key: String },

    /// A `KEY=VALUE` (or `ALIAS=TARGET`) string could not be split.
    #[error("invalid assignment '{0}': expected KEY=VALUE")]
    InvalidAssignment(String),
}

impl ConfigError {
    pub(crate) fn missing(kind: KeyKind, key: impl Into<String>) -> Self {
        ConfigError::MissingKey {
            kind,
            key: key.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message() {
        let err = ConfigError::missing(KeyKind::Alias, "colour");
        assert_eq!(err.to_string(), "missing alias 'colour'");
    }

    #[test]
    fn test_invalid_assignment_message() {
        let err = ConfigError::InvalidAssignment("=x".into());
        assert!(err.to_string().contains("expected KEY=VALUE"));
    }
}
