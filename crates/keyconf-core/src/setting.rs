//! Values handed to [`Configuration::configure`](crate::Configuration::configure).
//!
//! Stored values are opaque `serde_json::Value`s, so `null` is a real value.
//! "Leave this key alone" is spelled [`Setting::Keep`] instead.

use serde_json::Value;

/// A value to store, or the marker that leaves the current value untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum Setting {
    /// Store the value, overwriting whatever was there.
    Set(Value),
    /// Explicit no-op: an existing value stays, an absent key stays absent.
    Keep,
}

impl Setting {
    /// Shorthand for `Setting::Set(value.into())`.
    pub fn value(value: impl Into<Value>) -> Self {
        Setting::Set(value.into())
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, Setting::Keep)
    }
}

impl From<Value> for Setting {
    fn from(value: Value) -> Self {
        Setting::Set(value)
    }
}

/// `None` maps to [`Setting::Keep`].
impl From<Option<Value>> for Setting {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Setting::Keep, Setting::Set)
    }
}

impl From<&str> for Setting {
    fn from(value: &str) -> Self {
        Setting::Set(Value::from(value))
    }
}

impl From<String> for Setting {
    fn from(value: String) -> Self {
        Setting::Set(Value::from(value))
    }
}

impl From<bool> for Setting {
    fn from(value: bool) -> Self {
        Setting::Set(Value::from(value))
    }
}

impl From<i64> for Setting {
    fn from(value: i64) -> Self {
        Setting::Set(Value::from(value))
    }
}

impl From<f64> for Setting {
    fn from(value: f64) -> Self {
        Setting::Set(Value::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_none_is_keep() {
        assert!(Setting::from(None::<Value>).is_keep());
    }

    #[test]
    fn test_null_is_a_value() {
        assert_eq!(Setting::from(Value::Null), Setting::Set(Value::Null));
        assert!(!Setting::from(Some(Value::Null)).is_keep());
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Setting::from("green"), Setting::Set(json!("green")));
        assert_eq!(Setting::from(3i64), Setting::Set(json!(3)));
        assert_eq!(Setting::from(true), Setting::Set(json!(true)));
        assert_eq!(Setting::value(vec![1, 2]), Setting::Set(json!([1, 2])));
    }
}
