//! The configuration node — own settings, named components, and aliases.
//!
//! # Key resolution
//! Every operation resolves its key against the tables as they are *now*:
//! 1. A key that exactly names an alias is replaced by the alias target (one hop)
//! 2. If `{component}_` prefixes the key, the stripped key goes to that component
//! 3. Otherwise the key belongs to this node
//!
//! A forwarded key is resolved again by the component, so `a_b_key` reaches
//! component `b` of component `a` one level at a time.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{ConfigError, KeyKind, Result};
use crate::setting::Setting;

// ─────────────────────────────────────────────
// Node state
// ─────────────────────────────────────────────

#[derive(Default)]
struct Node {
    settings: HashMap<String, Value>,
    /// Ordered by name: the first matching prefix in name order wins.
    components: BTreeMap<String, Configuration>,
    aliases: HashMap<String, String>,
}

/// Outcome of resolving a key.
enum Target {
    /// The key is stored on this node under the given name.
    Local(String),
    /// The stripped key belongs to a component.
    Forward {
        name: String,
        key: String,
        component: Configuration,
    },
}

// ─────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────

/// A node in the configuration tree.
///
/// Cloning yields another handle to the *same* node, so a component can be
/// kept by its creator and registered under one or more parents at once.
/// Handles are `!Send`: a tree belongs to a single thread.
///
/// The graph must stay acyclic. A node registered below itself makes
/// forwarding recurse without end.
#[derive(Clone, Default)]
pub struct Configuration {
    inner: Rc<RefCell<Node>>,
}

impl Configuration {
    /// Create an empty node with no components.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node with initial components.
    pub fn with_components<I, K>(components: I) -> Self
    where
        I: IntoIterator<Item = (K, Configuration)>,
        K: Into<String>,
    {
        let config = Self::new();
        config.add_components(components);
        config
    }

    /// Register components. A name already in use is replaced.
    pub fn add_components<I, K>(&self, components: I)
    where
        I: IntoIterator<Item = (K, Configuration)>,
        K: Into<String>,
    {
        for (name, component) in components {
            let name = name.into();
            info!(component = %name, "added component");
            self.inner.borrow_mut().components.insert(name, component);
        }
    }

    /// Remove components by name.
    ///
    /// Stops at the first unknown name with [`ConfigError::MissingKey`].
    /// Names removed before that point stay removed.
    pub fn remove_components<I, K>(&self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            let removed = self.inner.borrow_mut().components.remove(name);
            if removed.is_none() {
                return Err(ConfigError::missing(KeyKind::Component, name));
            }
            info!(component = name, "removed component");
        }
        Ok(())
    }

    /// Define aliases (`alias -> target key`). An existing alias is replaced.
    pub fn set_aliases<I, K, V>(&self, aliases: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (alias, target) in aliases {
            let (alias, target) = (alias.into(), target.into());
            info!(alias = %alias, target = %target, "set alias");
            self.inner.borrow_mut().aliases.insert(alias, target);
        }
    }

    /// Remove aliases by name. Same partial-completion rules as
    /// [`remove_components`](Self::remove_components).
    pub fn unset_aliases<I, K>(&self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            let removed = self.inner.borrow_mut().aliases.remove(name);
            if removed.is_none() {
                return Err(ConfigError::missing(KeyKind::Alias, name));
            }
            info!(alias = name, "unset alias");
        }
        Ok(())
    }

    /// Resolve a key against the current alias and component tables.
    ///
    /// The borrow ends before the caller acts on the target.
    fn resolve(&self, key: &str) -> Target {
        let node = self.inner.borrow();
        let key = node.aliases.get(key).map(String::as_str).unwrap_or(key);

        for (name, component) in &node.components {
            let stripped = key
                .strip_prefix(name.as_str())
                .and_then(|rest| rest.strip_prefix('_'));
            if let Some(rest) = stripped {
                return Target::Forward {
                    name: name.clone(),
                    key: rest.to_string(),
                    component: component.clone(),
                };
            }
        }

        Target::Local(key.to_string())
    }

    // ─────────────────────────────────────────
    // Routed operations
    // ─────────────────────────────────────────

    /// Store settings, forwarding prefixed keys to components.
    ///
    /// A [`Setting::Keep`] leaves the current value (or its absence) as is.
    pub fn configure<I, K, S>(&self, settings: I)
    where
        I: IntoIterator<Item = (K, S)>,
        K: AsRef<str>,
        S: Into<Setting>,
    {
        for (key, setting) in settings {
            self.configure_one(key.as_ref(), setting.into());
        }
    }

    fn configure_one(&self, key: &str, setting: Setting) {
        match self.resolve(key) {
            Target::Forward {
                name,
                key,
                component,
            } => {
                debug!(component = %name, key = %key, "forwarding configure");
                component.configure_one(&key, setting);
            }
            Target::Local(key) => match setting {
                Setting::Set(value) => {
                    debug!(key = %key, "stored setting");
                    self.inner.borrow_mut().settings.insert(key, value);
                }
                Setting::Keep => debug!(key = %key, "left setting unchanged"),
            },
        }
    }

    /// Delete settings. Keys that are not set are ignored.
    pub fn unconfigure<I, K>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for key in keys {
            self.unconfigure_one(key.as_ref());
        }
    }

    fn unconfigure_one(&self, key: &str) {
        match self.resolve(key) {
            Target::Forward {
                name,
                key,
                component,
            } => {
                debug!(component = %name, key = %key, "forwarding unconfigure");
                component.unconfigure_one(&key);
            }
            Target::Local(key) => {
                if self.inner.borrow_mut().settings.remove(&key).is_some() {
                    debug!(key = %key, "removed setting");
                }
            }
        }
    }

    /// Read a setting through aliases and components.
    ///
    /// Fails with [`ConfigError::MissingKey`] naming the key as the owning
    /// node saw it.
    pub fn get_config(&self, key: &str) -> Result<Value> {
        match self.resolve(key) {
            Target::Forward { key, component, .. } => component.get_config(&key),
            Target::Local(key) => self
                .inner
                .borrow()
                .settings
                .get(&key)
                .cloned()
                .ok_or_else(|| ConfigError::missing(KeyKind::Setting, key)),
        }
    }

    /// Whether a setting exists, resolved like [`get_config`](Self::get_config).
    pub fn is_configured(&self, key: &str) -> bool {
        match self.resolve(key) {
            Target::Forward { key, component, .. } => component.is_configured(&key),
            Target::Local(key) => self.inner.borrow().settings.contains_key(&key),
        }
    }

    // ─────────────────────────────────────────
    // Local inspection (no resolution)
    // ─────────────────────────────────────────

    /// This node's own value for `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.borrow().settings.get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.borrow().settings.contains_key(key)
    }

    /// This node's own setting keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.borrow().settings.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().settings.is_empty()
    }

    /// This node's own settings as `(key, value)` pairs, sorted by key.
    pub fn items(&self) -> Vec<(String, Value)> {
        let mut items: Vec<(String, Value)> = self
            .inner
            .borrow()
            .settings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        items.sort_by(|a, b| a.0.cmp(&b.0));
        items
    }

    /// Copy of this node's own settings.
    pub fn to_map(&self) -> HashMap<String, Value> {
        self.inner.borrow().settings.clone()
    }

    /// Handle to a direct component.
    pub fn component(&self, name: &str) -> Option<Configuration> {
        self.inner.borrow().components.get(name).cloned()
    }

    /// Names of the direct components, in resolution order.
    pub fn component_names(&self) -> Vec<String> {
        self.inner.borrow().components.keys().cloned().collect()
    }

    pub fn alias(&self, name: &str) -> Option<String> {
        self.inner.borrow().aliases.get(name).cloned()
    }

    pub fn aliases(&self) -> HashMap<String, String> {
        self.inner.borrow().aliases.clone()
    }

    /// JSON object of this node's settings, with each component nested
    /// under its name. A component shadows a setting of the same name.
    pub fn snapshot(&self) -> Value {
        let node = self.inner.borrow();
        let mut object: Map<String, Value> = node
            .settings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (name, component) in &node.components {
            object.insert(name.clone(), component.snapshot());
        }
        Value::Object(object)
    }

    /// Whether two handles point at the same node.
    pub fn ptr_eq(a: &Configuration, b: &Configuration) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.inner.borrow();
        f.debug_struct("Configuration")
            .field("settings", &node.settings)
            .field("components", &node.components)
            .field("aliases", &node.aliases)
            .finish()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
