//! Loaders: turn `KEY=VALUE` strings and environment variables into settings.
//!
//! These sit in front of [`Configuration::configure`]; the tree itself never
//! reads the environment.
//!
//! # Value parsing
//! A raw value that parses as JSON is stored as that JSON value
//! (`42`, `true`, `null`, `[1,2]`, `"quoted"`). Anything else is kept as a
//! plain string.

use serde_json::Value;
use tracing::{debug, warn};

use super::Configuration;
use crate::error::{ConfigError, Result};
use crate::setting::Setting;

/// Parse a raw value: JSON if it parses, the raw string otherwise.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Parse `KEY=VALUE`.
///
/// - `key=` stores an empty string
/// - a bare `key` yields [`Setting::Keep`]
/// - an empty key is an error
pub fn parse_assignment(raw: &str) -> Result<(String, Setting)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => {
            Ok((key.to_string(), Setting::Set(parse_value(value))))
        }
        None if !raw.is_empty() => Ok((raw.to_string(), Setting::Keep)),
        _ => Err(ConfigError::InvalidAssignment(raw.to_string())),
    }
}

/// Parse `ALIAS=TARGET`. Both sides must be non-empty.
pub fn parse_alias(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((alias, target)) if !alias.is_empty() && !target.is_empty() => {
            Ok((alias.to_string(), target.to_string()))
        }
        _ => Err(ConfigError::InvalidAssignment(raw.to_string())),
    }
}

/// Collect settings from environment variables named `{prefix}{NAME}`.
///
/// `NAME` is lowercased to form the key (`APP_SUB_LEAF` → `sub_leaf` with
/// prefix `APP_`). Results are sorted by key.
pub fn env_settings(prefix: &str) -> Vec<(String, Setting)> {
    let mut settings: Vec<(String, Setting)> = std::env::vars_os()
        .filter_map(|(name, value)| {
            let name = name.to_str()?;
            let key = name.strip_prefix(prefix)?;
            if key.is_empty() {
                return None;
            }
            let Some(value) = value.to_str() else {
                warn!(var = name, "skipping non-UTF-8 environment value");
                return None;
            };
            Some((key.to_lowercase(), Setting::Set(parse_value(value))))
        })
        .collect();
    settings.sort_by(|a, b| a.0.cmp(&b.0));
    settings
}

/// Apply [`env_settings`] to `config`. Returns how many variables matched.
pub fn apply_env(config: &Configuration, prefix: &str) -> usize {
    let settings = env_settings(prefix);
    let count = settings.len();
    debug!(prefix = prefix, count = count, "applying environment settings");
    config.configure(settings);
    count
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_value_json() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value("null"), Value::Null);
        assert_eq!(parse_value("[1, 2]"), json!([1, 2]));
        assert_eq!(parse_value("\"quoted\""), json!("quoted"));
    }

    #[test]
    fn test_parse_value_plain_string() {
        assert_eq!(parse_value("faint green"), json!("faint green"));
        assert_eq!(parse_value(""), json!(""));
    }

    #[test]
    fn test_parse_assignment() {
        let (key, setting) = parse_assignment("sub_leaf=yellow").unwrap();
        assert_eq!(key, "sub_leaf");
        assert_eq!(setting, Setting::value("yellow"));
    }

    #[test]
    fn test_parse_assignment_splits_once() {
        let (key, setting) = parse_assignment("expr=a=b").unwrap();
        assert_eq!(key, "expr");
        assert_eq!(setting, Setting::value("a=b"));
    }

    #[test]
    fn test_parse_assignment_empty_value() {
        let (_, setting) = parse_assignment("leaf=").unwrap();
        assert_eq!(setting, Setting::value(""));
    }

    #[test]
    fn test_parse_assignment_bare_key_keeps() {
        let (key, setting) = parse_assignment("leaf").unwrap();
        assert_eq!(key, "leaf");
        assert!(setting.is_keep());
    }

    #[test]
    fn test_parse_assignment_invalid() {
        assert!(parse_assignment("=value").is_err());
        assert!(parse_assignment("").is_err());
    }

    #[test]
    fn test_parse_alias() {
        assert_eq!(
            parse_alias("colour=sub_leaf").unwrap(),
            ("colour".to_string(), "sub_leaf".to_string())
        );
        assert!(parse_alias("colour=").is_err());
        assert!(parse_alias("colour").is_err());
    }

    #[test]
    fn test_env_settings() {
        std::env::set_var("KEYCONF_TEST_ENV_SUB_LEAF", "yellow");
        std::env::set_var("KEYCONF_TEST_ENV_PORT", "8080");
        let settings = env_settings("KEYCONF_TEST_ENV_");
        assert_eq!(
            settings,
            vec![
                ("port".to_string(), Setting::value(8080)),
                ("sub_leaf".to_string(), Setting::value("yellow")),
            ]
        );
        std::env::remove_var("KEYCONF_TEST_ENV_SUB_LEAF");
        std::env::remove_var("KEYCONF_TEST_ENV_PORT");
    }

    #[test]
    fn test_apply_env_forwards() {
        std::env::set_var("KEYCONF_TEST_APPLY_SUB_LEAF", "green");
        let sub = Configuration::new();
        let top = Configuration::with_components([("sub", sub.clone())]);
        let count = apply_env(&top, "KEYCONF_TEST_APPLY_");
        assert_eq!(count, 1);
        assert_eq!(sub.get_config("leaf").unwrap(), json!("green"));
        assert!(top.is_empty());
        std::env::remove_var("KEYCONF_TEST_APPLY_SUB_LEAF");
    }
}
