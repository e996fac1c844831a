//! Configuration tree and the helpers that feed it.
//!
//! # Usage
//! ```
//! use keyconf_core::Configuration;
//!
//! let sub = Configuration::new();
//! let top = Configuration::with_components([("sub", sub.clone())]);
//! top.configure([("sub_leaf", "yellow")]);
//! assert_eq!(sub.get_config("leaf").unwrap(), "yellow");
//! ```

pub mod configuration;
pub mod loader;

// Re-export key types
pub use configuration::Configuration;
pub use loader::{apply_env, env_settings, parse_alias, parse_assignment, parse_value};
